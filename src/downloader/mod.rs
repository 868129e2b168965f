mod digests;
mod fetcher;
mod outcome;

use std::env;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use url::Url;

use crate::checksum::sha256_bytes;
use crate::config::Config;
use crate::naming::{filename_for_url, unique_path};

pub use digests::DigestSet;
pub use fetcher::{FileDownloader, Response, UReqFetcher};
pub use outcome::{DownloadError, Outcome, Report, SkipReason, UrlOutcome};

/// Fetches URLs one at a time and stores each new image once.
pub struct Downloader<T: FileDownloader> {
    fetcher: T,
    path: PathBuf,
    digests: DigestSet,
}

impl<T> Downloader<T>
where
    T: FileDownloader,
{
    /// Uses `digests` as the starting set of known images; the output
    /// directory is created if missing but not scanned.
    pub fn with_fetcher(path: impl AsRef<Path>, fetcher: T, digests: DigestSet) -> io::Result<Self> {
        let path = create_path(path.as_ref())?;

        Ok(Downloader {
            fetcher,
            path,
            digests,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn digests(&self) -> &DigestSet {
        &self.digests
    }

    /// Processes `urls` in order. A failing URL never stops the batch.
    pub fn download_all<I, S>(&mut self, urls: I) -> Report
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.download_all_with(urls, |_| {})
    }

    /// Like [`Downloader::download_all`], calling `on_outcome` as soon as each
    /// URL has been handled.
    pub fn download_all_with<I, S, F>(&mut self, urls: I, mut on_outcome: F) -> Report
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnMut(&UrlOutcome),
    {
        let outcomes = urls
            .into_iter()
            .map(|url| {
                let url = url.as_ref();

                let entry = UrlOutcome {
                    url: url.to_string(),
                    outcome: self.download(url),
                };

                on_outcome(&entry);

                entry
            })
            .collect();

        Report { outcomes }
    }

    pub fn download(&mut self, url: &str) -> Outcome {
        match self.try_download(url) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(url, error = %err, "download failed");
                Outcome::Failed(err)
            }
        }
    }

    fn try_download(&mut self, raw_url: &str) -> Result<Outcome, DownloadError> {
        let parsed = Url::parse(raw_url).map_err(|err| DownloadError::InvalidUrl(err.to_string()))?;

        let url = parsed.as_str();

        let (body, content_type) = match self.fetcher.fetch(url) {
            Response::Ok { body, content_type } => (body, content_type.unwrap_or_default()),
            Response::Status(code) => return Err(DownloadError::Status(code)),
            Response::InvalidBody => return Err(DownloadError::InvalidBody),
            Response::NetworkError(reason) => return Err(DownloadError::Network(reason)),
        };

        if !content_type.starts_with("image/") {
            tracing::debug!(url, %content_type, "not an image");
            return Ok(Outcome::Skipped(SkipReason::NotAnImage { content_type }));
        }

        let digest = sha256_bytes(&body);

        if self.digests.contains(&digest) {
            tracing::debug!(url, %digest, "duplicate content");
            return Ok(Outcome::Skipped(SkipReason::Duplicate { digest }));
        }

        let file_path = self.save(&filename_for_url(raw_url), &body)?;

        self.digests.insert(digest);

        tracing::info!(url, path = %file_path.display(), bytes = body.len(), "saved image");

        Ok(Outcome::Saved(file_path))
    }

    fn save(&self, name: &str, body: &[u8]) -> io::Result<PathBuf> {
        let file_path = unique_path(&self.path, name);

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&file_path)?;

        if let Err(err) = file.write_all(body).and_then(|_| file.flush()) {
            drop(file);
            if let Err(cleanup) = fs::remove_file(&file_path) {
                tracing::warn!(path = %file_path.display(), error = %cleanup, "failed to remove partial file");
            }
            return Err(err);
        }

        Ok(file_path)
    }
}

impl Downloader<UReqFetcher> {
    /// Creates the configured output directory and seeds the digest set from
    /// the files already in it.
    pub fn new(config: &Config) -> io::Result<Self> {
        let fetcher = UReqFetcher::new(config.timeout(), &config.user_agent);

        let mut downloader = Downloader::with_fetcher(&config.output_dir, fetcher, DigestSet::new())?;

        downloader.digests = DigestSet::scan(&downloader.path)?;

        Ok(downloader)
    }
}

fn create_path(path: &Path) -> io::Result<PathBuf> {
    let absolute_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()?.join(path)
    };

    if !absolute_path.exists() {
        fs::create_dir_all(&absolute_path)?;
    }

    Ok(absolute_path)
}

#[cfg(test)]
use fetcher::MockFetcher;
