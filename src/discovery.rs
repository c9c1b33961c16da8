use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::diagnostics::ScanError;

/// Default suffix of scanned unit test sources.
pub const DEFAULT_EXTENSION: &str = "cc";

/// Finds unit test sources under a root directory.
#[derive(Debug, Clone)]
pub struct SourceDiscoverer {
    suffix: String,
}

impl Default for SourceDiscoverer {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION)
    }
}

impl SourceDiscoverer {
    /// `extension` may be given with or without its leading dot.
    pub fn new(extension: &str) -> Self {
        Self {
            suffix: format!(".{}", extension.trim_start_matches('.')),
        }
    }

    /// Returns true for dot-prefixed entries below the root.
    pub fn is_hidden(entry: &DirEntry) -> bool {
        entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
    }

    /// Returns true if the file name ends with the configured suffix.
    pub fn has_extension(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| name.to_string_lossy().ends_with(&self.suffix))
    }

    /// Lazily yields matching files under `root` in walk order.
    ///
    /// Hidden entries are pruned before descent, so nothing under `.git` and the
    /// like is ever visited. Siblings are visited in file name order, which makes
    /// the sequence a depth-first listing that is stable across runs. A walk error
    /// is yielded at the point the walk reaches it; files before it are unaffected.
    pub fn sources<P: AsRef<Path>>(
        &self,
        root: P,
    ) -> impl Iterator<Item = Result<PathBuf, ScanError>> + '_ {
        WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !Self::is_hidden(e))
            .filter_map(move |entry| match entry {
                Err(e) => Some(Err(ScanError::from(e))),
                Ok(entry) if entry.file_type().is_file() && self.has_extension(entry.path()) => {
                    debug!(file = %entry.path().display(), "discovered source");
                    Some(Ok(entry.into_path()))
                }
                Ok(_) => None,
            })
    }

    /// Recursively collects matching files under `root`.
    pub fn discover<P: AsRef<Path>>(&self, root: P) -> Result<Vec<PathBuf>, ScanError> {
        self.sources(root).collect()
    }
}
