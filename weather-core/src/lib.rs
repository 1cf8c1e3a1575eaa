//! Core library for the `weather-insights` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather fetcher and response normalization
//! - Prompt rendering, the Gemini client and reply parsing
//! - [`WeatherAssistant`], which chains them for one city
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod assistant;
pub mod config;
pub mod error;
pub mod insight;
pub mod llm;
pub mod model;
pub mod normalize;
pub mod prompt;
pub mod provider;

pub use assistant::{WeatherAssistant, fetch_weather};
pub use config::{AppConfig, Config};
pub use error::{ConfigError, WeatherError};
pub use insight::{InsightGenerator, parse_insight, strip_code_fences};
pub use llm::{GeminiClient, TextGenerator};
pub use model::{Insight, NOT_AVAILABLE, WeatherRecord};
pub use normalize::normalize;
pub use prompt::PromptTemplate;
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
