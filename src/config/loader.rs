//! JSON configuration loading shared by the package config, layout and
//! version files.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::errors::{ContextError, Result};

/// Read and deserialize a required JSON configuration file.
///
/// A missing file and an empty file are the same failure: the package
/// installation is incomplete, and the error names the offending path. A
/// file that exists but does not match the expected shape is a parse error
/// instead, so a missing required field is reported at load time rather than
/// at first access.
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    log::debug!("Reading config: {}", path.display());

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ContextError::MissingConfig {
                path: path.to_path_buf(),
            })
        }
        Err(source) => {
            return Err(ContextError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if contents.trim().is_empty() {
        return Err(ContextError::MissingConfig {
            path: path.to_path_buf(),
        });
    }

    serde_json::from_str(&contents).map_err(|source| ContextError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reports_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        let result: Result<BTreeMap<String, String>> = load_json_file(&path);
        match result {
            Err(ContextError::MissingConfig { path: reported }) => {
                assert_eq!(reported, path);
            }
            other => panic!("expected MissingConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_file_reports_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "  \n").unwrap();

        let result: Result<BTreeMap<String, String>> = load_json_file(&path);
        assert!(matches!(result, Err(ContextError::MissingConfig { .. })));
    }

    #[test]
    fn test_malformed_json_reports_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result: Result<BTreeMap<String, String>> = load_json_file(&path);
        assert!(matches!(result, Err(ContextError::Parse { .. })));
    }

    #[test]
    fn test_valid_json_deserializes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"key": "value"}"#).unwrap();

        let result: BTreeMap<String, String> = load_json_file(&path).unwrap();
        assert_eq!(result["key"], "value");
    }

    #[test]
    fn test_error_message_names_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        let err = load_json_file::<BTreeMap<String, String>>(&path).unwrap_err();
        assert!(err.to_string().contains("config.json"));
    }
}
