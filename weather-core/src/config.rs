use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{ConfigError, prompt::DEFAULT_PROMPT_PATH};

pub const WEATHER_API_KEY_VAR: &str = "WEATHER_API_KEY";
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub const DEFAULT_CITIES: &[&str] = &["London", "New York", "Tokyo", "Paris", "Sydney"];

/// Top-level configuration stored on disk. Every field is optional.
///
/// Example TOML:
/// ```toml
/// weather_api_key = "..."
/// model = "gemini-2.5-flash"
/// cities = ["Berlin", "Oslo"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_base_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cities: Vec<String>,
}

/// Fully resolved settings handed to component constructors.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub weather_api_key: String,
    /// Only needed by commands that call the model.
    pub gemini_api_key: Option<String>,
    pub model: String,
    pub prompt_path: PathBuf,
    pub weather_base_url: String,
    pub gemini_base_url: String,
    pub cities: Vec<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::ReadFile {
            path: path.clone(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::ParseFile { path, source })
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::WriteFile {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let toml = toml::to_string_pretty(self)?;

        fs::write(&path, toml).map_err(|source| ConfigError::WriteFile {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        let dirs = ProjectDirs::from("dev", "weather-insights", "weather-insights")
            .ok_or(ConfigError::NoConfigDir)?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Merge the file settings with the environment into an [`AppConfig`].
    ///
    /// `env` is consulted for the two credentials and wins over file values;
    /// empty values count as unset. The weather key is required here; the
    /// Gemini key is checked when the Gemini client is built.
    pub fn resolve<F>(self, env: F) -> Result<AppConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |var: &str, file_value: Option<String>| {
            env(var)
                .filter(|v| !v.trim().is_empty())
                .or(file_value.filter(|v| !v.trim().is_empty()))
        };

        let weather_api_key = pick(WEATHER_API_KEY_VAR, self.weather_api_key)
            .ok_or(ConfigError::MissingCredential(WEATHER_API_KEY_VAR))?;
        let gemini_api_key = pick(GEMINI_API_KEY_VAR, self.gemini_api_key);

        let cities = if self.cities.is_empty() {
            DEFAULT_CITIES.iter().map(|c| c.to_string()).collect()
        } else {
            self.cities
        };

        Ok(AppConfig {
            weather_api_key,
            gemini_api_key,
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            prompt_path: self
                .prompt_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PROMPT_PATH)),
            weather_base_url: self
                .weather_base_url
                .unwrap_or_else(|| DEFAULT_WEATHER_BASE_URL.to_string()),
            gemini_base_url: self
                .gemini_base_url
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            cities,
        })
    }

    /// Resolve against the process environment.
    pub fn resolve_from_env(self) -> Result<AppConfig, ConfigError> {
        self.resolve(|var| std::env::var(var).ok())
    }
}
