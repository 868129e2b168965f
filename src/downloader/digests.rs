use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use crate::checksum::sha256_path;

/// Content digests already present in the output directory plus those saved
/// during the current run. Never shrinks.
#[derive(Debug, Default, Clone)]
pub struct DigestSet {
    digests: HashSet<String>,
}

impl DigestSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashes every file directly inside `dir`, following symlinks.
    ///
    /// Entries that vanish or cannot be read during the scan are skipped.
    pub fn scan(dir: &Path) -> io::Result<Self> {
        let mut set = Self::new();

        for entry in fs::read_dir(dir)? {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(err) => {
                    tracing::warn!(dir = %dir.display(), error = %err, "skipping unreadable entry");
                    continue;
                }
            };

            match fs::metadata(&path) {
                Ok(meta) if meta.is_file() => {}
                Ok(_) => continue,
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable entry");
                    continue;
                }
            }

            match sha256_path(&path) {
                Ok(Some(digest)) => {
                    set.insert(digest);
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable file");
                }
            }
        }

        tracing::debug!(dir = %dir.display(), count = set.len(), "scanned existing images");

        Ok(set)
    }

    pub fn contains(&self, digest: &str) -> bool {
        self.digests.contains(digest)
    }

    /// Returns `false` if the digest was already present.
    pub fn insert(&mut self, digest: String) -> bool {
        self.digests.insert(digest)
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }
}

impl FromIterator<String> for DigestSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            digests: iter.into_iter().collect(),
        }
    }
}
