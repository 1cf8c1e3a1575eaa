use std::path::PathBuf;

use thiserror::Error;

/// Startup failures. Any of these aborts the run before a city is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "No API key provided: set {0} in the environment (or .env), \
         or run `weather-insights configure`"
    )]
    MissingCredential(&'static str),

    #[error("prompt template file not found or unreadable at {}", path.display())]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine platform config directory")]
    NoConfigDir,

    #[error("Failed to read config file: {}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {}", path.display())]
    ParseFile {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize configuration to TOML")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write config file: {}", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
}

/// Per-city failures, reported by the orchestrator and never fatal to the run.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Error fetching weather data: {0}")]
    Fetch(String),

    #[error("Invalid weather data - missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Error generating insights: {0}")]
    Generation(String),

    #[error("Error parsing insights - AI response is not valid JSON: {0}")]
    Parse(String),
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
