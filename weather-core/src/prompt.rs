use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{ConfigError, WeatherError, model::WeatherRecord};

/// Marker in the template replaced by the serialized weather record.
pub const WEATHER_DATA_PLACEHOLDER: &str = "{weather_data}";

/// Default location of the template, relative to the working directory.
pub const DEFAULT_PROMPT_PATH: &str = "prompt.txt";

/// Prompt text loaded once at startup.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Read the template from disk, trimming surrounding whitespace.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::TemplateLoad {
            path: PathBuf::from(path),
            source,
        })?;

        debug!(path = %path.display(), bytes = text.len(), "loaded prompt template");
        Ok(Self::new(text.trim()))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Substitute the pretty-printed record for every placeholder occurrence.
    pub fn render(&self, record: &WeatherRecord) -> Result<String, WeatherError> {
        let weather_data = serde_json::to_string_pretty(record).map_err(|e| {
            WeatherError::Generation(format!("failed to serialize weather record: {e}"))
        })?;
        Ok(self.text.replace(WEATHER_DATA_PLACEHOLDER, &weather_data))
    }
}
