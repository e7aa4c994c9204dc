//! Process-environment access for analyzer discovery.
//!
//! All environment reads go through the [`Environment`] trait so that
//! resolution logic can be driven by a map-backed environment in tests
//! instead of mutating the process-wide variable table.

use std::collections::HashMap;
use std::path::PathBuf;

/// Root directory of the installed package binaries.
pub const CC_BIN_DIR: &str = "CC_BIN_DIR";
/// Root directory of the installed package libraries.
pub const CC_LIB_DIR: &str = "CC_LIB_DIR";
/// Root directory of the installed package data files.
pub const CC_DATA_FILES_DIR: &str = "CC_DATA_FILES_DIR";
/// Overrides the checker-labels directory. Testing only.
pub const CC_TEST_LABELS_DIR: &str = "CC_TEST_LABELS_DIR";
/// Semicolon-separated `<analyzer>:<path>` binary overrides.
pub const CC_ANALYZER_BIN: &str = "CC_ANALYZER_BIN";
/// When truthy, analyzers are located through the plain execution PATH
/// instead of the bundled package layout.
pub const CC_ANALYZERS_FROM_PATH: &str = "CC_ANALYZERS_FROM_PATH";

/// Read access to an environment-variable table.
///
/// [`ProcessEnv`] is the production implementation; [`MapEnv`] backs tests.
pub trait Environment {
    /// Look up a single variable.
    fn var(&self, name: &str) -> Option<String>;

    /// Snapshot the whole table.
    fn snapshot(&self) -> HashMap<String, String>;
}

/// Production environment backed by `std::env`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn snapshot(&self) -> HashMap<String, String> {
        std::env::vars().collect()
    }
}

/// Map-backed environment for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, builder style.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl Environment for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn snapshot(&self) -> HashMap<String, String> {
        self.vars.clone()
    }
}

/// Whether analyzers should be located through the plain execution PATH.
pub fn is_analyzers_from_path(env: &dyn Environment) -> bool {
    env.var(CC_ANALYZERS_FROM_PATH)
        .map(|value| {
            matches!(
                value.to_lowercase().as_str(),
                "1" | "yes" | "true" | "on"
            )
        })
        .unwrap_or(false)
}

/// Build the extended analyzer environment: the full variable table with the
/// extra search-path fragments prepended to `PATH` and the extra library-path
/// fragments prepended to `LD_LIBRARY_PATH`.
pub fn extend(
    base: HashMap<String, String>,
    path_extras: &[PathBuf],
    ld_lib_extras: &[PathBuf],
) -> HashMap<String, String> {
    let mut merged = base;
    prepend_paths(&mut merged, "PATH", path_extras);
    prepend_paths(&mut merged, "LD_LIBRARY_PATH", ld_lib_extras);
    merged
}

fn prepend_paths(env: &mut HashMap<String, String>, name: &str, extras: &[PathBuf]) {
    if extras.is_empty() {
        return;
    }

    let joined = extras
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(":");

    let value = match env.get(name) {
        Some(existing) if !existing.is_empty() => format!("{joined}:{existing}"),
        _ => joined,
    };
    env.insert(name.to_string(), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_path_accepts_truthy_values() {
        for value in ["1", "yes", "YES", "true", "On"] {
            let env = MapEnv::new().set(CC_ANALYZERS_FROM_PATH, value);
            assert!(is_analyzers_from_path(&env), "{value} should be truthy");
        }
    }

    #[test]
    fn test_from_path_rejects_other_values() {
        assert!(!is_analyzers_from_path(&MapEnv::new()));
        for value in ["0", "no", "false", ""] {
            let env = MapEnv::new().set(CC_ANALYZERS_FROM_PATH, value);
            assert!(!is_analyzers_from_path(&env), "{value} should be falsy");
        }
    }

    #[test]
    fn test_extend_prepends_extras_before_existing_path() {
        let env = MapEnv::new()
            .set("PATH", "/usr/bin:/bin")
            .set("HOME", "/home/user");

        let merged = extend(
            env.snapshot(),
            &[PathBuf::from("/opt/pkg/bin")],
            &[PathBuf::from("/opt/pkg/lib")],
        );

        assert_eq!(merged["PATH"], "/opt/pkg/bin:/usr/bin:/bin");
        assert_eq!(merged["LD_LIBRARY_PATH"], "/opt/pkg/lib");
        assert_eq!(merged["HOME"], "/home/user");
    }

    #[test]
    fn test_extend_without_extras_leaves_base_untouched() {
        let env = MapEnv::new().set("PATH", "/usr/bin");
        let merged = extend(env.snapshot(), &[], &[]);

        assert_eq!(merged["PATH"], "/usr/bin");
        assert!(!merged.contains_key("LD_LIBRARY_PATH"));
    }

    #[test]
    fn test_extend_joins_multiple_fragments() {
        let merged = extend(
            HashMap::new(),
            &[PathBuf::from("/a"), PathBuf::from("/b")],
            &[],
        );
        assert_eq!(merged["PATH"], "/a:/b");
    }
}
