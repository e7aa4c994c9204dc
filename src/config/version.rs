//! Package version metadata (`analyzer_version.json`).

use std::path::Path;

use serde::Deserialize;

use super::loader::load_json_file;
use crate::errors::{ContextError, Result};

/// Root structure of `<data_files>/config/analyzer_version.json`.
///
/// The file is generated at package-build time; nothing in it is derived
/// from the environment at load time.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionFile {
    pub version: VersionParts,
    pub package_build_date: String,
    #[serde(default)]
    pub git_hash: Option<String>,
    #[serde(default)]
    pub git_describe: Option<GitDescribe>,
}

/// Structured version number. The parts are stored as strings in the file
/// and only ever concatenated.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionParts {
    pub major: String,
    pub minor: String,
    pub revision: String,
    #[serde(default)]
    pub rc: Option<String>,
}

/// Output of `git describe` at package-build time. `tag` is the clean
/// variant, `dirty` carries the local-modification suffix.
#[derive(Debug, Clone, Deserialize)]
pub struct GitDescribe {
    pub tag: String,
    pub dirty: String,
}

impl VersionFile {
    /// Load the version metadata. A missing or empty file is reported as a
    /// distinct error kind so callers can tell it apart from a missing
    /// field in an otherwise present file.
    pub fn load(path: &Path) -> Result<Self> {
        match load_json_file(path) {
            Err(ContextError::MissingConfig { path }) => {
                Err(ContextError::MissingVersionFile { path })
            }
            other => other,
        }
    }

    /// The externally visible version string: `major.minor.revision`, with
    /// a `-rc<N>` suffix only when a non-empty release-candidate marker is
    /// present.
    pub fn version_string(&self) -> String {
        let v = &self.version;
        let mut out = format!("{}.{}.{}", v.major, v.minor, v.revision);
        if let Some(rc) = &v.rc {
            if !rc.is_empty() {
                out.push_str("-rc");
                out.push_str(rc);
            }
        }
        out
    }

    /// Select the git tag to expose: the dirty variant when running with
    /// debug verbosity, the clean tag otherwise.
    pub fn select_git_tag(&self, debug: bool) -> Option<&str> {
        self.git_describe.as_ref().map(|describe| {
            if debug {
                describe.dirty.as_str()
            } else {
                describe.tag.as_str()
            }
        })
    }

    /// [`select_git_tag`](Self::select_git_tag) driven by the effective log
    /// verbosity of the process.
    pub fn active_git_tag(&self) -> Option<&str> {
        self.select_git_tag(log::max_level() >= log::LevelFilter::Debug)
    }
}
