//! Handle to the checker-label definitions shipped with the package.
//!
//! Label semantics live in the checker-label subsystem; the context only
//! resolves which directory they come from and hands out this handle.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CheckerLabels {
    dir: PathBuf,
}

impl CheckerLabels {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory the labels were resolved from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The label definition files in the directory, sorted. An unreadable
    /// directory yields an empty list.
    pub fn label_files(&self) -> Vec<PathBuf> {
        let pattern = self.dir.join("*.json");
        let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
            .map(|paths| paths.filter_map(std::result::Result::ok).collect())
            .unwrap_or_default();
        files.sort();
        files
    }
}
