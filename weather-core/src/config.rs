use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{
    history::RecentStore,
    provider::{OpenWeatherProvider, openweather::DEFAULT_BASE_URL},
    storage::FileStore,
};

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// # base_url = "https://api.openweathermap.org"
/// # data_dir = "/home/me/.local/share/weatherdash"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Override for the OpenWeather host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Where recent searches are persisted; defaults to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "weatherdash", "weatherdash")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Directory holding persisted dashboard state.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::project_dirs()?.data_dir().to_path_buf()),
        }
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }

    /// API key to use, preferring the environment over the stored value.
    /// Blank values count as absent.
    pub fn resolve_api_key(&self) -> Option<String> {
        Self::pick_api_key(std::env::var(API_KEY_ENV).ok(), self.api_key.as_deref())
    }

    fn pick_api_key(from_env: Option<String>, stored: Option<&str>) -> Option<String> {
        from_env
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .or_else(|| stored.map(str::trim).filter(|k| !k.is_empty()).map(str::to_owned))
    }

    /// Build the weather provider. A missing key is not an error here: the
    /// provider reports it as an invalid key on the first search.
    pub fn build_provider(&self) -> OpenWeatherProvider {
        let api_key = self.resolve_api_key().unwrap_or_default();
        let base_url = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        OpenWeatherProvider::with_base_url(api_key, base_url)
    }

    pub fn recent_store(&self) -> Result<RecentStore<FileStore>> {
        Ok(RecentStore::new(FileStore::new(self.data_dir()?)))
    }
}
