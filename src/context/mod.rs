//! Package runtime context.
//!
//! [`Context`] gathers everything the orchestration layer needs to know
//! about the installed package: where the analyzer binaries are, which
//! environment variables drive the build-log capture library, and what
//! version of the package is running. It is loaded once per process and
//! read-only afterwards; all accessors are pure reads of already-resolved
//! state, and no JSON source is ever re-read.

use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::config::{EnvVarRoles, PackageConfig, PackageLayout, VersionFile};
use crate::env::{self, Environment, ProcessEnv};
use crate::errors::{ContextError, Result};
use crate::labels::CheckerLabels;
use crate::resolve::{parse_analyzer_overrides, BinaryResolver, OVERRIDE_FORMAT_HINT};

const LOGGER_LIB_NAME: &str = "ldlogger.so";

/// Process-wide package context, immutable once loaded.
#[derive(Debug)]
pub struct Context {
    bin_dir_path: PathBuf,
    lib_dir_path: PathBuf,
    data_files_dir_path: PathBuf,

    env_var_roles: EnvVarRoles,
    checker_labels: CheckerLabels,
    logger_lib_dir_path: PathBuf,

    // Values of the dynamically-named logger variables at load time.
    logger_bin: Option<String>,
    logger_file: Option<String>,
    logger_compilers: Option<String>,
    ld_preload: Option<String>,

    package_version: String,
    package_build_date: String,
    package_git_hash: Option<String>,
    package_git_tag: Option<String>,

    from_path: bool,
    path_env_extra: Vec<PathBuf>,
    ld_lib_path_extra: Vec<PathBuf>,
    base_env: HashMap<String, String>,
    analyzer_env: OnceLock<HashMap<String, String>>,

    analyzers: BTreeMap<String, PathBuf>,
    replacer: Option<PathBuf>,
}

impl Context {
    /// Build the context from the given environment.
    ///
    /// Reads the three package JSON files, applies the environment-variable
    /// overrides and resolves every configured binary. The returned context
    /// never touches the filesystem again.
    pub fn load(env: &dyn Environment) -> Result<Self> {
        let bin_dir_path = PathBuf::from(env.var(env::CC_BIN_DIR).unwrap_or_default());
        let lib_dir_path = PathBuf::from(env.var(env::CC_LIB_DIR).unwrap_or_default());
        let data_files_dir_path =
            PathBuf::from(env.var(env::CC_DATA_FILES_DIR).unwrap_or_default());

        let labels_dir = match env.var(env::CC_TEST_LABELS_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => data_files_dir_path.join("config").join("labels"),
        };

        let package_config = PackageConfig::load(&data_files_dir_path)?;
        let layout = PackageLayout::load(&data_files_dir_path)?;

        let checker_labels = CheckerLabels::new(labels_dir);
        let logger_lib_dir_path = logger_lib_dir(&data_files_dir_path, &lib_dir_path);

        let roles = package_config.environment_variables;
        let logger_bin = env.var(&roles.cc_logger_bin);
        let logger_file = env.var(&roles.cc_logger_file);
        let logger_compilers = env.var(&roles.cc_logger_compiles);
        let ld_preload = env.var(&roles.ld_preload);

        let version_file = version_file_path(&data_files_dir_path);
        let version = VersionFile::load(&version_file)?;
        let package_git_tag = version.active_git_tag().map(String::from);

        let from_path = env::is_analyzers_from_path(env);
        let (path_env_extra, ld_lib_path_extra) = if from_path {
            (Vec::new(), Vec::new())
        } else {
            (
                join_fragments(&data_files_dir_path, &layout.runtime.path_env_extra),
                join_fragments(&data_files_dir_path, &layout.runtime.ld_lib_path_extra),
            )
        };

        let overrides = match env.var(env::CC_ANALYZER_BIN) {
            Some(raw) => parse_analyzer_overrides(&raw).map_err(|errors| {
                log::info!("{OVERRIDE_FORMAT_HINT}");
                ContextError::InvalidOverride { errors }
            })?,
            None => BTreeMap::new(),
        };

        let base_env = env.snapshot();
        let analyzer_env = OnceLock::new();

        // The extended environment is built once and its PATH reused for
        // every lookup. In PATH-mode the plain execution PATH applies.
        let search_path = if from_path {
            None
        } else {
            let extended = env::extend(base_env.clone(), &path_env_extra, &ld_lib_path_extra);
            let path = extended.get("PATH").map(OsString::from);
            let _ = analyzer_env.set(extended);
            path
        };

        let resolver =
            BinaryResolver::new(&data_files_dir_path, from_path, search_path, overrides);
        let analyzers = resolver.resolve_analyzers(&layout.runtime.analyzers);
        let replacer = resolver.resolve_replacer(&layout.runtime.clang_apply_replacements);

        Ok(Self {
            bin_dir_path,
            lib_dir_path,
            data_files_dir_path,
            env_var_roles: roles,
            checker_labels,
            logger_lib_dir_path,
            logger_bin,
            logger_file,
            logger_compilers,
            ld_preload,
            package_version: version.version_string(),
            package_build_date: version.package_build_date,
            package_git_hash: version.git_hash,
            package_git_tag,
            from_path,
            path_env_extra,
            ld_lib_path_extra,
            base_env,
            analyzer_env,
            analyzers,
            replacer,
        })
    }

    pub fn version(&self) -> &str {
        &self.package_version
    }

    pub fn package_build_date(&self) -> &str {
        &self.package_build_date
    }

    pub fn package_git_hash(&self) -> Option<&str> {
        self.package_git_hash.as_deref()
    }

    pub fn package_git_tag(&self) -> Option<&str> {
        self.package_git_tag.as_deref()
    }

    pub fn version_file(&self) -> PathBuf {
        version_file_path(&self.data_files_dir_path)
    }

    /// Name of the variable holding the logger binary path.
    pub fn env_var_cc_logger_bin(&self) -> &str {
        &self.env_var_roles.cc_logger_bin
    }

    /// Name of the variable holding the capture output file.
    pub fn env_var_cc_logger_file(&self) -> &str {
        &self.env_var_roles.cc_logger_file
    }

    /// Name of the variable used for LD_PRELOAD injection.
    pub fn env_var_ld_preload(&self) -> &str {
        &self.env_var_roles.ld_preload
    }

    pub fn logger_bin(&self) -> Option<&str> {
        self.logger_bin.as_deref()
    }

    pub fn logger_file(&self) -> Option<&str> {
        self.logger_file.as_deref()
    }

    pub fn logger_compilers(&self) -> Option<&str> {
        self.logger_compilers.as_deref()
    }

    pub fn ld_preload(&self) -> Option<&str> {
        self.ld_preload.as_deref()
    }

    /// Name of the dynamic-linker library-path variable.
    pub fn ld_lib_path_var(&self) -> &str {
        &self.env_var_roles.env_ld_lib_path
    }

    pub fn path_logger_bin(&self) -> PathBuf {
        self.bin_dir_path.join("ld_logger")
    }

    pub fn logger_lib_name(&self) -> &'static str {
        LOGGER_LIB_NAME
    }

    /// Absolute path to the logger library.
    pub fn logger_lib_path(&self) -> PathBuf {
        let path = self.logger_lib_dir_path.join(LOGGER_LIB_NAME);
        std::path::absolute(&path).unwrap_or(path)
    }

    /// Static assets used when rendering analyzer reports as HTML.
    pub fn path_html_static(&self) -> PathBuf {
        self.lib_dir_path
            .join("scanmux_report")
            .join("output")
            .join("html")
            .join("static")
    }

    /// Extra PATH fragments for bundled binaries. Empty in PATH-mode.
    pub fn path_env_extra(&self) -> &[PathBuf] {
        &self.path_env_extra
    }

    /// Extra library-path fragments for bundled binaries. Empty in
    /// PATH-mode.
    pub fn ld_lib_path_extra(&self) -> &[PathBuf] {
        &self.ld_lib_path_extra
    }

    /// The extended analyzer environment, built on first use.
    pub fn analyzer_env(&self) -> &HashMap<String, String> {
        self.analyzer_env.get_or_init(|| {
            env::extend(
                self.base_env.clone(),
                &self.path_env_extra,
                &self.ld_lib_path_extra,
            )
        })
    }

    /// Resolved analyzer binaries. An analyzer missing from this mapping is
    /// unavailable on this installation.
    pub fn analyzer_binaries(&self) -> &BTreeMap<String, PathBuf> {
        &self.analyzers
    }

    pub fn replacer_binary(&self) -> Option<&Path> {
        self.replacer.as_deref()
    }

    pub fn data_files_dir_path(&self) -> &Path {
        &self.data_files_dir_path
    }

    /// Directory of bundled checker plugins. Not exposed in PATH-mode: a
    /// plugin built for the bundled analyzer may be incompatible with
    /// whatever the PATH provides.
    pub fn checker_plugin(&self) -> Option<PathBuf> {
        if self.from_path {
            None
        } else {
            Some(self.data_files_dir_path.join("plugin"))
        }
    }

    pub fn checker_labels(&self) -> &CheckerLabels {
        &self.checker_labels
    }
}

fn version_file_path(data_files_dir: &Path) -> PathBuf {
    data_files_dir.join("config").join("analyzer_version.json")
}

fn join_fragments(data_files_dir: &Path, fragments: &[String]) -> Vec<PathBuf> {
    fragments
        .iter()
        .map(|fragment| data_files_dir.join(fragment))
        .collect()
}

/// The bundled-data logger library directory is preferred; installations
/// that keep the logger next to the package libraries fall back to the
/// lib-relative location.
fn logger_lib_dir(data_files_dir: &Path, lib_dir: &Path) -> PathBuf {
    let machine = std::env::consts::ARCH;

    let bundled = data_files_dir.join("ld_logger").join("lib").join(machine);
    if bundled.exists() {
        return bundled;
    }

    lib_dir
        .join("scanmux")
        .join("ld_logger")
        .join("lib")
        .join(machine)
}

static CONTEXT: OnceLock<Context> = OnceLock::new();

/// The process-wide context instance.
///
/// Constructed on first call from the process environment; every later call
/// returns the same instance. Any unrecoverable configuration problem is
/// logged and terminates the process with a non-zero exit, so callers never
/// observe a partially-constructed context.
pub fn get_context() -> &'static Context {
    CONTEXT.get_or_init(|| match Context::load(&ProcessEnv) {
        Ok(context) => context,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    })
}
