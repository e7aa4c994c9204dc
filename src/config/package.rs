//! General package configuration (`config.json`).

use std::path::Path;

use serde::Deserialize;

use super::loader::load_json_file;
use crate::errors::Result;

/// Root structure of `<data_files>/config/config.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageConfig {
    pub environment_variables: EnvVarRoles,
}

/// Maps logical roles to the concrete environment-variable names the
/// build-log capture library listens on. Every field is required: a package
/// shipped without one of them cannot drive the logger at all.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvVarRoles {
    /// Name of the variable holding the logger binary path.
    pub cc_logger_bin: String,
    /// Name of the variable holding the capture output file.
    pub cc_logger_file: String,
    /// Name of the variable holding the compiler list.
    pub cc_logger_compiles: String,
    /// Name of the variable used for LD_PRELOAD injection.
    pub ld_preload: String,
    /// Name of the dynamic-linker library-path variable.
    pub env_ld_lib_path: String,
}

impl PackageConfig {
    pub fn load(data_files_dir: &Path) -> Result<Self> {
        load_json_file(&data_files_dir.join("config").join("config.json"))
    }
}
