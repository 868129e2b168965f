//! Local filename derivation for fetched images.
//!
//! A name is taken from the last URL path segment, filtered down to a safe
//! character set, and suffixed with `_1`, `_2`, ... when it would collide
//! with a file already in the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use url::Url;

/// Used when the URL has no usable filename.
pub const DEFAULT_FILENAME: &str = "downloaded_image.jpg";

/// Extracts a candidate filename from the final path segment of `url`.
///
/// The segment is taken from the text as given, so spaces and non-ASCII
/// characters are not percent-encoded. Falls back to [`DEFAULT_FILENAME`]
/// when the segment is empty or has no extension, or when `url` does not
/// parse.
pub fn derive_filename(url: &str) -> String {
    if Url::parse(url).is_err() {
        return DEFAULT_FILENAME.to_string();
    }

    let segment = raw_path(url).rsplit('/').next().unwrap_or_default();

    if segment.is_empty() || !segment.contains('.') {
        DEFAULT_FILENAME.to_string()
    } else {
        segment.to_string()
    }
}

/// The path of `url` without scheme, authority, query or fragment.
fn raw_path(url: &str) -> &str {
    let url = url.split(['#', '?']).next().unwrap_or_default();

    match url.split_once("://") {
        Some((_, rest)) => rest.find('/').map_or("", |i| &rest[i..]),
        None => url.split_once(':').map_or(url, |(_, rest)| rest),
    }
}

/// Keeps alphanumerics plus space, `.`, `_` and `-`, then trims trailing
/// whitespace. Everything else is dropped, not replaced.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '.' | '_' | '-'))
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Derives and sanitizes the filename for `url`, never returning a name that
/// cannot be created as a regular file.
pub fn filename_for_url(url: &str) -> String {
    let sanitized = sanitize_filename(&derive_filename(url));

    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}

/// Splits `name` into base and extension, the extension keeping its dot.
///
/// Leading dots belong to the base, so `.hidden` has no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    let leading = name.len() - name.trim_start_matches('.').len();

    match name[leading..].rfind('.') {
        Some(i) => name.split_at(leading + i),
        None => (name, ""),
    }
}

/// Returns `dir/name`, or the first `dir/{base}_{n}{ext}` that is not taken.
///
/// Any directory entry counts as taken, including dangling symlinks.
pub fn unique_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !is_taken(&candidate) {
        return candidate;
    }

    let (base, ext) = split_extension(name);
    let mut counter = 1u64;

    loop {
        let path = dir.join(format!("{base}_{counter}{ext}"));
        if !is_taken(&path) {
            return path;
        }
        counter += 1;
    }
}

fn is_taken(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
