//! End-to-end context loading against on-disk package fixtures.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use scanmux::env::{CC_ANALYZERS_FROM_PATH, CC_ANALYZER_BIN, CC_DATA_FILES_DIR};
use scanmux::{Context, ContextError, MapEnv};
use tempfile::TempDir;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Write a complete installed-package fixture rooted at `root`.
fn write_package(root: &Path, analyzers: &BTreeMap<&str, &str>) {
    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    fs::write(
        config_dir.join("config.json"),
        r#"{
            "environment_variables": {
                "cc_logger_bin": "CC_LOGGER_BIN",
                "cc_logger_file": "CC_LOGGER_FILE",
                "cc_logger_compiles": "CC_LOGGER_GCC_LIKE",
                "ld_preload": "LD_PRELOAD",
                "env_ld_lib_path": "LD_LIBRARY_PATH"
            }
        }"#,
    )
    .unwrap();

    let analyzer_entries: Vec<String> = analyzers
        .iter()
        .map(|(name, value)| format!(r#""{name}": "{value}""#))
        .collect();
    fs::write(
        config_dir.join("package_layout.json"),
        format!(
            r#"{{
                "runtime": {{
                    "analyzers": {{{}}},
                    "clang-apply-replacements": "cc-bin/clang-apply-replacements",
                    "path_env_extra": ["cc-bin"],
                    "ld_lib_path_extra": ["cc-lib"]
                }}
            }}"#,
            analyzer_entries.join(", ")
        ),
    )
    .unwrap();

    fs::write(
        config_dir.join("analyzer_version.json"),
        r#"{
            "version": {"major": "6", "minor": "12", "revision": "0", "rc": "1"},
            "package_build_date": "2026-08-07 12:00",
            "git_hash": "4e4b8f7"
        }"#,
    )
    .unwrap();
}

fn package_env(root: &Path) -> MapEnv {
    MapEnv::new()
        .set(CC_DATA_FILES_DIR, root.to_string_lossy())
        .set("PATH", "/usr/bin:/bin")
}

#[cfg(unix)]
fn install_executable(dir: &Path, name: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, "#!/bin/sh\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[test]
fn test_full_load_round_trip() {
    init_logging();
    let root = TempDir::new().unwrap();
    let analyzers = BTreeMap::from([("clangsa", "cc-bin/clang"), ("infer", "tools/infer")]);
    write_package(root.path(), &analyzers);

    let context = Context::load(&package_env(root.path())).unwrap();

    assert_eq!(context.version(), "6.12.0-rc1");
    assert_eq!(context.package_git_hash(), Some("4e4b8f7"));
    // No git_describe block in the fixture.
    assert_eq!(context.package_git_tag(), None);

    let binaries = context.analyzer_binaries();
    assert_eq!(binaries["clangsa"], root.path().join("cc-bin/clang"));
    assert_eq!(binaries["infer"], root.path().join("tools/infer"));
    assert_eq!(
        context.replacer_binary().unwrap(),
        root.path().join("cc-bin/clang-apply-replacements")
    );
}

#[cfg(unix)]
#[test]
fn test_bare_name_resolved_through_bundled_path_extras() {
    init_logging();
    let root = TempDir::new().unwrap();
    let analyzers = BTreeMap::from([("cppcheck", "cppcheck")]);
    write_package(root.path(), &analyzers);
    let installed = install_executable(&root.path().join("cc-bin"), "cppcheck");

    let context = Context::load(&package_env(root.path())).unwrap();

    // The bundled cc-bin fragment is prepended to the search PATH, so the
    // bare name resolves to the packaged binary.
    assert_eq!(
        context.analyzer_binaries()["cppcheck"],
        installed.canonicalize().unwrap()
    );
}

#[cfg(unix)]
#[test]
fn test_ccache_symlink_keeps_wrapper() {
    use std::os::unix::fs::symlink;

    init_logging();
    let root = TempDir::new().unwrap();
    let analyzers = BTreeMap::from([("gcc", "gcc")]);
    write_package(root.path(), &analyzers);

    let bin_dir = root.path().join("cc-bin");
    install_executable(&bin_dir, "ccache");
    symlink(bin_dir.join("ccache"), bin_dir.join("gcc")).unwrap();

    let context = Context::load(&package_env(root.path())).unwrap();

    let resolved = &context.analyzer_binaries()["gcc"];
    assert_eq!(resolved.file_name().unwrap(), "gcc");
}

#[test]
fn test_unavailable_analyzer_is_soft() {
    init_logging();
    let root = TempDir::new().unwrap();
    let analyzers = BTreeMap::from([
        ("clang-tidy", "no-such-analyzer-binary"),
        ("infer", "tools/infer"),
    ]);
    write_package(root.path(), &analyzers);

    let context = Context::load(&package_env(root.path())).unwrap();

    assert!(!context.analyzer_binaries().contains_key("clang-tidy"));
    assert!(context.analyzer_binaries().contains_key("infer"));
}

#[cfg(unix)]
#[test]
fn test_partial_override_failure_is_fatal() {
    init_logging();
    let root = TempDir::new().unwrap();
    let analyzers = BTreeMap::from([("clangsa", "cc-bin/clang"), ("cppcheck", "cppcheck")]);
    write_package(root.path(), &analyzers);
    let clang = install_executable(&root.path().join("override-bin"), "clang");

    let env = package_env(root.path()).set(
        CC_ANALYZER_BIN,
        format!("clangsa:{};cppcheck:/bad/path", clang.display()),
    );

    // The good entry is accepted in isolation, but the bad entry fails the
    // whole parse after the scan completes.
    match Context::load(&env).unwrap_err() {
        ContextError::InvalidOverride { errors } => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("/bad/path"));
        }
        other => panic!("expected InvalidOverride, got {other:?}"),
    }
}

#[test]
fn test_path_mode_round_trip() {
    init_logging();
    let root = TempDir::new().unwrap();
    let analyzers = BTreeMap::from([("clang-tidy", "cc-bin/no-such-analyzer-binary")]);
    write_package(root.path(), &analyzers);

    let env = package_env(root.path()).set(CC_ANALYZERS_FROM_PATH, "1");
    let context = Context::load(&env).unwrap();

    // Layout fragments are configured but must not surface in PATH-mode.
    assert!(context.path_env_extra().is_empty());
    assert!(context.ld_lib_path_extra().is_empty());
    assert!(context.checker_plugin().is_none());
    // The bundled value is reduced to its filename; with no such binary on
    // the PATH the analyzer is simply unavailable.
    assert!(!context.analyzer_binaries().contains_key("clang-tidy"));
}

#[test]
fn test_empty_layout_file_is_fatal() {
    init_logging();
    let root = TempDir::new().unwrap();
    write_package(root.path(), &BTreeMap::new());
    fs::write(root.path().join("config/package_layout.json"), "").unwrap();

    let err = Context::load(&package_env(root.path())).unwrap_err();
    assert!(matches!(err, ContextError::MissingConfig { .. }));
    assert!(err.to_string().contains("package_layout.json"));
}

#[test]
fn test_checker_labels_listing() {
    init_logging();
    let root = TempDir::new().unwrap();
    write_package(root.path(), &BTreeMap::new());
    let labels_dir = root.path().join("config/labels");
    fs::create_dir_all(&labels_dir).unwrap();
    fs::write(labels_dir.join("clangsa.json"), "{}").unwrap();

    let context = Context::load(&package_env(root.path())).unwrap();

    assert_eq!(context.checker_labels().dir(), labels_dir);
    assert_eq!(context.checker_labels().label_files().len(), 1);
}
