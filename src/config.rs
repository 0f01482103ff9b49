//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/partyguests/partyguests.toml`
//! 3. Local config: `<dir>/.partyguests.toml`
//! 4. Environment variables: `PARTYGUESTS_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::services::{DEFAULT_EXPORT_PREFIX, DEFAULT_STORAGE_KEY};
use crate::application::ApplicationError;
use crate::domain::ValidationMode;

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory export files are written to
    pub dir: PathBuf,
    /// File name prefix, followed by `-<timestamp>.<ext>`
    pub prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            prefix: DEFAULT_EXPORT_PREFIX.into(),
        }
    }
}

/// Validation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ValidationConfig {
    /// Reject unknown fields instead of dropping them
    pub strict: bool,
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_dir: Option<PathBuf>,
    pub storage_key: Option<String>,
    pub export: RawExportConfig,
    pub validation: RawValidationConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawExportConfig {
    pub dir: Option<PathBuf>,
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawValidationConfig {
    pub strict: Option<bool>,
}

/// Unified configuration for partyguests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the storage slot (default: platform data dir)
    pub data_dir: PathBuf,
    /// Key the document is stored under
    pub storage_key: String,
    pub export: ExportConfig,
    pub validation: ValidationConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_key: DEFAULT_STORAGE_KEY.into(),
            export: ExportConfig::default(),
            validation: ValidationConfig::default(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "partyguests")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.partyguests"))
}

/// Get the XDG config directory for partyguests.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "partyguests").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("partyguests.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".partyguests.toml")
}

fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; leaves the input alone if expansion fails.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl Settings {
    pub fn validation_mode(&self) -> ValidationMode {
        ValidationMode::from_strict(self.validation.strict)
    }

    fn expand_paths(&mut self) {
        self.data_dir = expand_path(&self.data_dir);
        self.export.dir = expand_path(&self.export.dir);
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_dir: overlay
                .data_dir
                .clone()
                .unwrap_or_else(|| self.data_dir.clone()),
            storage_key: overlay
                .storage_key
                .clone()
                .unwrap_or_else(|| self.storage_key.clone()),
            export: ExportConfig {
                dir: overlay
                    .export
                    .dir
                    .clone()
                    .unwrap_or_else(|| self.export.dir.clone()),
                prefix: overlay
                    .export
                    .prefix
                    .clone()
                    .unwrap_or_else(|| self.export.prefix.clone()),
            },
            validation: ValidationConfig {
                strict: overlay.validation.strict.unwrap_or(self.validation.strict),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.partyguests.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply PARTYGUESTS_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("PARTYGUESTS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_dir") {
            settings.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("storage_key") {
            settings.storage_key = val;
        }
        if let Ok(val) = config.get_string("export.dir") {
            settings.export.dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("export.prefix") {
            settings.export.prefix = val;
        }
        if let Ok(val) = config.get_bool("validation.strict") {
            settings.validation.strict = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# partyguests configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/partyguests/partyguests.toml
#   Local:  ./.partyguests.toml
#   Env:    PARTYGUESTS_* environment variables (nested keys use "__",
#           e.g. PARTYGUESTS_EXPORT__DIR)

# Directory holding the stored guest list
# data_dir = "~/.local/share/partyguests"

# Storage key (file <data_dir>/<storage_key>.json)
# storage_key = "formData"

[export]
# Where export files are written
# dir = "."

# Export file name prefix: <prefix>-<yyyy-MM-dd HH:mm:ss>.<json|csv>
# prefix = "partyguests"

[validation]
# Reject unknown fields instead of silently dropping them
# strict = false
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
    fn given_defaults_when_created_then_uses_form_storage_key() {
        let settings = Settings::default();
        assert_eq!(settings.storage_key, "formData");
        assert_eq!(settings.export.prefix, "partyguests");
        assert_eq!(settings.validation_mode(), ValidationMode::Lenient);
    }

    #[test]
    fn given_tilde_in_data_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            data_dir: PathBuf::from("~/.partyguests"),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let data_dir = settings.data_dir.to_string_lossy();
        assert!(data_dir.starts_with(&home), "data_dir: {}", data_dir);
        assert!(!data_dir.contains('~'));
    }

    #[test]
    fn given_partial_overlay_when_merging_then_keeps_unspecified() {
        let base = Settings::default();
        let overlay = RawSettings {
            storage_key: Some("party".into()),
            validation: RawValidationConfig { strict: Some(true) },
            ..RawSettings::default()
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.storage_key, "party");
        assert!(merged.validation.strict);
        assert_eq!(merged.export, base.export);
        assert_eq!(merged.data_dir, base.data_dir);
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("template parses");
        assert!(raw.storage_key.is_none());
    }
}
