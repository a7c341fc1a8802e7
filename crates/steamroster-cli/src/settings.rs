//! Persistent CLI settings with environment overrides.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use steamroster_core::config::ApiCredentials;
use steamroster_core::util::normalize_text_option;

use crate::error::CliError;

const APP_DIR_NAME: &str = "steamroster";
const SETTINGS_FILE_NAME: &str = "settings.json";

pub const ENV_API_KEY: &str = "STEAM_API_KEY";
pub const ENV_STEAM_ID: &str = "STEAM_ID";
pub const ENV_PROXY: &str = "STEAM_PROXY";
pub const ENV_DATA_DIR: &str = "STEAMROSTER_DATA_DIR";

#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliSettings {
    #[serde(default = "default_settings_version")]
    pub version: u32,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub steam_id: Option<String>,
    #[serde(default)]
    pub proxy: Option<String>,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl fmt::Debug for CliSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CliSettings")
            .field("version", &self.version)
            .field("api_key", &self.redacted_api_key())
            .field("steam_id", &self.steam_id)
            .field("proxy", &self.proxy)
            .field("data_dir", &self.data_dir)
            .finish()
    }
}

const fn default_settings_version() -> u32 {
    1
}

pub fn default_settings_path() -> Result<PathBuf, CliError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME))
        .ok_or_else(|| CliError::Config("Failed to resolve config directory".to_string()))
}

pub fn default_data_dir() -> Result<PathBuf, CliError> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| CliError::Config("Failed to resolve data directory".to_string()))
}

/// Settings path from `--config`, falling back to the platform default.
pub fn resolve_settings_path(explicit: Option<&Path>) -> Result<PathBuf, CliError> {
    explicit.map_or_else(default_settings_path, |path| Ok(path.to_path_buf()))
}

impl CliSettings {
    pub fn load_from_path(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            return Ok(Self {
                version: default_settings_version(),
                ..Self::default()
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|error| {
            CliError::Config(format!(
                "Failed to read settings at {}: {error}",
                path.display()
            ))
        })?;
        let mut settings = serde_json::from_str::<Self>(&raw).map_err(|error| {
            CliError::Config(format!(
                "Failed to parse settings at {}: {error}",
                path.display()
            ))
        })?;
        settings.normalize();
        Ok(settings)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), CliError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                CliError::Config(format!(
                    "Failed to create settings directory {}: {error}",
                    parent.display()
                ))
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)?;
        std::fs::write(path, serialized).map_err(|error| {
            CliError::Config(format!(
                "Failed to write settings at {}: {error}",
                path.display()
            ))
        })
    }

    /// Apply `STEAM_*` environment overrides.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = normalize_text_option(lookup(ENV_API_KEY)) {
            self.api_key = Some(value);
        }
        if let Some(value) = normalize_text_option(lookup(ENV_STEAM_ID)) {
            self.steam_id = Some(value);
        }
        if let Some(value) = normalize_text_option(lookup(ENV_PROXY)) {
            self.proxy = Some(value);
        }
        if let Some(value) = normalize_text_option(lookup(ENV_DATA_DIR)) {
            self.data_dir = Some(PathBuf::from(value));
        }
    }

    /// Validated API credentials, or [`CliError::NotConfigured`] when either
    /// the key or the account id is missing.
    pub fn credentials(&self) -> Result<ApiCredentials, CliError> {
        let (Some(api_key), Some(steam_id)) = (self.api_key.as_deref(), self.steam_id.as_deref())
        else {
            return Err(CliError::NotConfigured);
        };
        Ok(ApiCredentials::new(api_key, steam_id, self.proxy.clone())?)
    }

    /// `--data-dir` wins over the stored or environment value.
    pub fn resolve_data_dir(&self, explicit: Option<&Path>) -> Result<PathBuf, CliError> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = &self.data_dir {
            return Ok(path.clone());
        }
        default_data_dir()
    }

    pub fn redacted_api_key(&self) -> Option<String> {
        self.api_key.as_deref().map(redact_secret)
    }

    fn normalize(&mut self) {
        self.api_key = normalize_text_option(self.api_key.take());
        self.steam_id = normalize_text_option(self.steam_id.take());
        self.proxy = normalize_text_option(self.proxy.take());
        self.data_dir = self
            .data_dir
            .take()
            .filter(|path| !path.as_os_str().is_empty());
    }
}

/// Keep the last four characters of a secret.
pub fn redact_secret(value: &str) -> String {
    let count = value.chars().count();
    if count <= 4 {
        return "****".to_string();
    }
    let tail = value.chars().skip(count - 4).collect::<String>();
    format!("****{tail}")
}
