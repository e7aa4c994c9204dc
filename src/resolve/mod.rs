//! Analyzer and replacer binary resolution.
//!
//! Resolution runs an ordered list of strategies; the first one that accepts
//! a candidate wins:
//!
//! 1. an explicit `CC_ANALYZER_BIN` override,
//! 2. a package-relative path (the configured value has a directory
//!    component),
//! 3. a search over the (possibly extended) execution PATH.
//!
//! A bare name that cannot be found on the PATH means the analyzer is
//! unavailable, never a fatal condition.

mod overrides;

pub use overrides::{parse_analyzer_overrides, OVERRIDE_FORMAT_HINT};

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Resolves configured tool values to absolute binary paths.
#[derive(Debug, Clone)]
pub struct BinaryResolver {
    data_files_dir: PathBuf,
    from_path: bool,
    search_path: Option<OsString>,
    overrides: BTreeMap<String, PathBuf>,
}

impl BinaryResolver {
    /// `search_path` is the `PATH` value of the extended analyzer
    /// environment, computed once by the caller and reused for every
    /// lookup. It is `None` in PATH-mode, where the plain execution PATH
    /// applies.
    pub fn new(
        data_files_dir: impl Into<PathBuf>,
        from_path: bool,
        search_path: Option<OsString>,
        overrides: BTreeMap<String, PathBuf>,
    ) -> Self {
        Self {
            data_files_dir: data_files_dir.into(),
            from_path,
            search_path,
            overrides,
        }
    }

    /// Resolve every analyzer known to the package layout. Analyzers whose
    /// binary cannot be located are absent from the result.
    pub fn resolve_analyzers(
        &self,
        analyzers: &BTreeMap<String, String>,
    ) -> BTreeMap<String, PathBuf> {
        analyzers
            .iter()
            .filter_map(|(name, value)| {
                self.resolve_analyzer(name, value)
                    .map(|path| (name.clone(), path))
            })
            .collect()
    }

    fn resolve_analyzer(&self, name: &str, value: &str) -> Option<PathBuf> {
        if let Some(path) = self.try_override(name) {
            return Some(path);
        }

        // In PATH-mode the bundled location is ignored entirely; only the
        // executable name survives.
        let value = if self.from_path {
            file_name_of(value)
        } else {
            value.to_string()
        };

        self.try_package_relative(&value)
            .or_else(|| self.try_path_search(&value))
    }

    fn try_override(&self, name: &str) -> Option<PathBuf> {
        self.overrides.get(name).cloned()
    }

    /// A value with a directory component is taken relative to the
    /// data-files root, without verifying it exists.
    fn try_package_relative(&self, value: &str) -> Option<PathBuf> {
        if has_dir_component(value) {
            Some(self.data_files_dir.join(value))
        } else {
            None
        }
    }

    fn try_path_search(&self, value: &str) -> Option<PathBuf> {
        let located = match lookup_on_path(value, self.search_path.as_deref()) {
            Some(path) => path,
            None => {
                log::debug!("'{value}' binary can not be found in your PATH!");
                return None;
            }
        };

        let real = located.canonicalize().unwrap_or_else(|_| located.clone());

        // A binary that resolves to ccache is a wrapper; keeping the
        // pre-resolution path preserves the wrapping.
        if real.file_name().is_some_and(|name| name == "ccache") {
            Some(located)
        } else {
            Some(real)
        }
    }

    /// Resolve the replacement tool. Same directory-vs-bare-name logic as
    /// the analyzers, but against the plain execution PATH and without an
    /// override mechanism.
    pub fn resolve_replacer(&self, value: &str) -> Option<PathBuf> {
        if has_dir_component(value) {
            Some(self.data_files_dir.join(value))
        } else {
            which::which(value).ok()
        }
    }
}

fn has_dir_component(value: &str) -> bool {
    Path::new(value)
        .parent()
        .is_some_and(|parent| !parent.as_os_str().is_empty())
}

fn file_name_of(value: &str) -> String {
    Path::new(value)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| value.to_string())
}

fn lookup_on_path(name: &str, search_path: Option<&std::ffi::OsStr>) -> Option<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
    match search_path {
        Some(paths) => which::which_in(name, Some(paths), cwd).ok(),
        None => which::which(name).ok(),
    }
}
