//! Integration tests for Settings layered loading.
//!
//! Precedence: defaults < global < local (`<docs_dir>/.navtree.toml`) < env < CLI.
//! These tests pass explicit layers, so the user's real global config is never read.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use navtree::application::ApplicationError;
use navtree::config::{local_config_path, RawSettings, Settings};

#[test]
fn given_all_layers_when_loading_then_higher_layers_win() {
    let global_dir = TempDir::new().unwrap();
    let global = global_dir.path().join("navtree.toml");
    fs::write(&global, "max_depth = 3\nfragment_extension = \"json\"\n").unwrap();

    let docs = TempDir::new().unwrap();
    fs::write(
        local_config_path(docs.path()),
        "navtree_file = \"nav.js\"\nmax_depth = 4\n",
    )
    .unwrap();

    let env = RawSettings {
        max_depth: Some(5),
        ..RawSettings::default()
    };

    let settings = Settings::load_layers(Some(&global), Some(docs.path()), &env).unwrap();

    assert_eq!(settings.max_depth, Some(5));
    assert_eq!(settings.fragment_extension, "json");
    assert_eq!(settings.navtree_file, "nav.js");
    assert_eq!(settings.docs_dir.as_deref(), Some(docs.path()));
}

#[test]
fn given_docs_dir_in_global_config_when_loading_then_reads_local_config_there() {
    let docs = TempDir::new().unwrap();
    fs::write(local_config_path(docs.path()), "max_depth = 2\n").unwrap();

    let global_dir = TempDir::new().unwrap();
    let global = global_dir.path().join("navtree.toml");
    fs::write(
        &global,
        format!("docs_dir = {:?}\n", docs.path().to_string_lossy()),
    )
    .unwrap();

    let settings = Settings::load_layers(Some(&global), None, &RawSettings::default()).unwrap();

    assert_eq!(settings.docs_dir.as_deref(), Some(docs.path()));
    assert_eq!(settings.max_depth, Some(2));
}

#[test]
fn given_cli_docs_dir_when_env_also_sets_one_then_cli_wins() {
    let cli_docs = TempDir::new().unwrap();
    let env = RawSettings {
        docs_dir: Some(PathBuf::from("/env/docs")),
        ..RawSettings::default()
    };

    let settings = Settings::load_layers(None, Some(cli_docs.path()), &env).unwrap();

    assert_eq!(settings.docs_dir.as_deref(), Some(cli_docs.path()));
}

#[test]
fn given_docs_dir_in_local_config_when_loading_then_it_is_ignored() {
    let docs = TempDir::new().unwrap();
    fs::write(local_config_path(docs.path()), "docs_dir = \"/elsewhere\"\n").unwrap();

    let settings = Settings::load_layers(None, Some(docs.path()), &RawSettings::default()).unwrap();

    assert_eq!(settings.docs_dir.as_deref(), Some(docs.path()));
}

#[test]
fn given_missing_global_file_when_loading_then_defaults_apply() {
    let dir = TempDir::new().unwrap();
    let absent = dir.path().join("navtree.toml");

    let settings = Settings::load_layers(Some(&absent), None, &RawSettings::default()).unwrap();

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_invalid_toml_when_loading_then_config_error() {
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("navtree.toml");
    fs::write(&global, "max_depth = \"deep\"\n").unwrap();

    let err = Settings::load_layers(Some(&global), None, &RawSettings::default()).unwrap_err();

    assert!(
        matches!(err, ApplicationError::Config { ref message } if message.contains("navtree.toml")),
        "unexpected: {err:?}"
    );
}

#[test]
fn given_settings_when_round_tripping_through_toml_then_unchanged() {
    let settings = Settings {
        docs_dir: Some(PathBuf::from("/srv/docs/html")),
        max_depth: Some(3),
        ..Settings::default()
    };

    let parsed: Settings = toml::from_str(&settings.to_toml().unwrap()).unwrap();

    assert_eq!(parsed, settings);
}
