//! Package layout configuration (`package_layout.json`).

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::loader::load_json_file;
use crate::errors::Result;

/// Root structure of `<data_files>/config/package_layout.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageLayout {
    pub runtime: RuntimeLayout,
}

/// Runtime section of the package layout: where the bundled tools live.
///
/// An analyzer value is either a path containing a directory component
/// (relative to the data-files root, or absolute) or a bare executable name
/// to be located on the PATH.
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeLayout {
    pub analyzers: BTreeMap<String, String>,

    /// Path of the tool that applies analyzer-suggested fixes.
    #[serde(rename = "clang-apply-replacements")]
    pub clang_apply_replacements: String,

    /// Extra PATH fragments, relative to the data-files root.
    #[serde(default)]
    pub path_env_extra: Vec<String>,

    /// Extra library-path fragments, relative to the data-files root.
    #[serde(default)]
    pub ld_lib_path_extra: Vec<String>,
}

impl PackageLayout {
    pub fn load(data_files_dir: &Path) -> Result<Self> {
        load_json_file(&data_files_dir.join("config").join("package_layout.json"))
    }
}
