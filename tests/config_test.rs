//! Integration tests for Settings loading with layered precedence.
//!
//! These tests pass config files explicitly and feed env overrides from a map,
//! so they never depend on the user's global config or process environment.

use std::collections::HashMap;
use std::fs;

use tempfile::TempDir;

use animal_guess::application::ApplicationError;
use animal_guess::config::Settings;

fn write_config(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write config");
    path
}

#[test]
fn given_no_files_when_loading_then_uses_defaults() {
    let settings = Settings::load_files(None, None).expect("load settings");

    assert_eq!(settings, Settings::default());
    assert_eq!(settings.max_reprompts, 10);
    assert!(!settings.show_tree);
}

#[test]
fn given_explicit_file_when_loading_then_overrides_global() {
    let dir = TempDir::new().unwrap();
    let global = write_config(&dir, "global.toml", "max_reprompts = 3\nshow_tree = true\n");
    let local = write_config(&dir, "local.toml", "max_reprompts = 5\n");

    let settings = Settings::load_files(Some(&global), Some(&local)).expect("load settings");

    assert_eq!(settings.max_reprompts, 5, "explicit file wins");
    assert!(settings.show_tree, "unset field inherits from global");
    assert_eq!(settings.greeting, "Welcome to The Animal Game!");
}

#[test]
fn given_missing_explicit_file_when_loading_then_config_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");

    let err = Settings::load_files(None, Some(&missing)).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains("nope.toml"));
}

#[test]
fn given_malformed_file_when_loading_then_config_error() {
    let dir = TempDir::new().unwrap();
    let bad = write_config(&dir, "bad.toml", "max_reprompts = \"lots\"\n");

    let err = Settings::load_files(None, Some(&bad)).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_env_vars_when_applying_then_replace_file_values() {
    let dir = TempDir::new().unwrap();
    let local = write_config(&dir, "local.toml", "max_reprompts = 5\ngreeting = \"Hi\"\n");
    let vars = HashMap::from([
        ("ANIMAL_GUESS_MAX_REPROMPTS".to_string(), "7".to_string()),
        ("ANIMAL_GUESS_SHOW_TREE".to_string(), "true".to_string()),
        ("UNRELATED".to_string(), "x".to_string()),
    ]);

    let settings = Settings::load_files(None, Some(&local))
        .and_then(|s| s.apply_env(Some(vars)))
        .expect("load settings");

    assert_eq!(settings.max_reprompts, 7);
    assert!(settings.show_tree);
    assert_eq!(settings.greeting, "Hi");
}

#[test]
fn given_settings_when_serializing_then_round_trips_through_file() {
    let dir = TempDir::new().unwrap();
    let original = Settings {
        max_reprompts: 2,
        show_tree: true,
        greeting: "Hello zoo".to_string(),
    };
    let path = write_config(&dir, "saved.toml", &original.to_toml().unwrap());

    let loaded = Settings::load_files(None, Some(&path)).unwrap();

    assert_eq!(loaded, original);
}
