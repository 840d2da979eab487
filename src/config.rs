//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/animal-guess/animal-guess.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `ANIMAL_GUESS_*` prefix
//!
//! Only game behaviour is configured here; the tree itself always starts
//! from the default and lives in memory.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, Map};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;

const APP_NAME: &str = "animal-guess";
const ENV_PREFIX: &str = "ANIMAL_GUESS";

/// Unified configuration for animal-guess.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Consecutive invalid answers tolerated for one prompt before giving up
    pub max_reprompts: usize,
    /// Render the question tree when listing animals
    pub show_tree: bool,
    /// Line printed when the game starts
    pub greeting: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_reprompts: 10,
            show_tree: false,
            greeting: "Welcome to The Animal Game!".into(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub max_reprompts: Option<usize>,
    pub show_tree: Option<bool>,
    pub greeting: Option<String>,
}

/// Get the XDG config directory for animal-guess.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(format!("{APP_NAME}.toml")))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge overlay config onto self (base): overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            max_reprompts: overlay.max_reprompts.unwrap_or(self.max_reprompts),
            show_tree: overlay.show_tree.unwrap_or(self.show_tree),
            greeting: overlay
                .greeting
                .clone()
                .unwrap_or_else(|| self.greeting.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; must exist when given
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|path| path.exists());
        let current = Self::load_files(global.as_deref(), config_file)?;
        current.apply_env(None)
    }

    /// Merge defaults, the global file and the explicit file, without env vars.
    pub fn load_files(
        global_file: Option<&Path>,
        config_file: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(path) = global_file {
            debug!("global config: {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 3. Explicit config file
        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            debug!("explicit config: {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        Ok(current)
    }

    /// Apply `ANIMAL_GUESS_*` environment variables as explicit overrides.
    ///
    /// `vars` replaces the process environment as source, which keeps tests
    /// independent of each other.
    pub fn apply_env(mut self, vars: Option<Map<String, String>>) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(vars),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get::<usize>("max_reprompts") {
            self.max_reprompts = val;
        }
        if let Ok(val) = config.get_bool("show_tree") {
            self.show_tree = val;
        }
        if let Ok(val) = config.get_string("greeting") {
            self.greeting = val;
        }

        Ok(self)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# animal-guess configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/animal-guess/animal-guess.toml
#   Explicit: file passed with --config
#   Env:      ANIMAL_GUESS_* environment variables

# Consecutive invalid answers accepted for one prompt before the game aborts
# max_reprompts = 10

# Also draw the question tree when listing animals
# show_tree = false

# Greeting printed at startup
# greeting = "Welcome to The Animal Game!"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_partial_overlay_when_merging_then_keeps_unspecified_fields() {
        let overlay = RawSettings {
            show_tree: Some(true),
            ..Default::default()
        };

        let merged = Settings::default().merge_with(&overlay);

        assert!(merged.show_tree);
        assert_eq!(merged.max_reprompts, 10);
        assert_eq!(merged.greeting, "Welcome to The Animal Game!");
    }

    #[test]
    fn given_template_when_parsing_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.max_reprompts.is_none());
    }
}
