use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("{0}")]
    Network(String),

    #[error("could not read response body")]
    InvalidBody,

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl DownloadError {
    /// Failures that happened while talking to the remote server.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            DownloadError::Status(_) | DownloadError::Network(_) | DownloadError::InvalidBody
        )
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SkipReason {
    NotAnImage { content_type: String },
    Duplicate { digest: String },
}

/// Result of processing a single URL.
#[derive(Debug)]
pub enum Outcome {
    Saved(PathBuf),
    Skipped(SkipReason),
    Failed(DownloadError),
}

impl Outcome {
    pub fn saved_path(&self) -> Option<&PathBuf> {
        match self {
            Outcome::Saved(path) => Some(path),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct UrlOutcome {
    pub url: String,
    pub outcome: Outcome,
}

impl fmt::Display for UrlOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let url = &self.url;

        match &self.outcome {
            Outcome::Saved(path) => {
                let name = path
                    .file_name()
                    .map(|name| name.to_string_lossy())
                    .unwrap_or_default();

                writeln!(f, "✓ Successfully fetched: {name}")?;
                write!(f, "✓ Image saved to {}", path.display())
            }
            Outcome::Skipped(SkipReason::NotAnImage { .. }) => {
                write!(f, "✗ Skipping URL (not an image): {url}")
            }
            Outcome::Skipped(SkipReason::Duplicate { .. }) => {
                write!(f, "✗ Duplicate image detected, skipping download: {url}")
            }
            Outcome::Failed(err) if err.is_network() => {
                write!(f, "✗ Connection error for URL {url}: {err}")
            }
            Outcome::Failed(err) => write!(f, "✗ An error occurred for URL {url}: {err}"),
        }
    }
}

/// Every URL of a batch with its outcome, in input order.
#[derive(Debug, Default)]
pub struct Report {
    pub outcomes: Vec<UrlOutcome>,
}

impl Report {
    pub fn saved(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Saved(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Failed(_)))
    }

    fn count(&self, predicate: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|entry| predicate(&entry.outcome))
            .count()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {} URL(s): {} saved, {} skipped, {} failed.",
            self.outcomes.len(),
            self.saved(),
            self.skipped(),
            self.failed()
        )
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn entry(url: &str, outcome: Outcome) -> UrlOutcome {
        UrlOutcome {
            url: url.to_string(),
            outcome,
        }
    }

    #[test]
    fn test_console_lines() {
        let saved = entry(
            "https://example.com/cat.jpg",
            Outcome::Saved(PathBuf::from("Fetched_Images/cat.jpg")),
        );
        assert_eq!(
            saved.to_string(),
            "✓ Successfully fetched: cat.jpg\n✓ Image saved to Fetched_Images/cat.jpg"
        );

        let html = entry(
            "https://example.com/",
            Outcome::Skipped(SkipReason::NotAnImage {
                content_type: "text/html".to_string(),
            }),
        );
        assert_eq!(
            html.to_string(),
            "✗ Skipping URL (not an image): https://example.com/"
        );

        let timeout = entry(
            "https://slow.example.com/a.png",
            Outcome::Failed(DownloadError::Network("timed out".to_string())),
        );
        assert_eq!(
            timeout.to_string(),
            "✗ Connection error for URL https://slow.example.com/a.png: timed out"
        );

        let io = entry(
            "https://example.com/a.png",
            Outcome::Failed(DownloadError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "denied",
            ))),
        );
        assert_eq!(
            io.to_string(),
            "✗ An error occurred for URL https://example.com/a.png: denied"
        );
    }

    #[test]
    fn test_report_counts() {
        let report = Report {
            outcomes: vec![
                entry("a", Outcome::Saved(PathBuf::from("a.jpg"))),
                entry(
                    "b",
                    Outcome::Skipped(SkipReason::Duplicate {
                        digest: "00".to_string(),
                    }),
                ),
                entry("c", Outcome::Failed(DownloadError::Status(404))),
                entry("d", Outcome::Saved(PathBuf::from("d.jpg"))),
            ],
        };

        assert_eq!(report.saved(), 2);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(
            report.to_string(),
            "Processed 4 URL(s): 2 saved, 1 skipped, 1 failed."
        );
    }
}
