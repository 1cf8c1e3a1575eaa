use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::{AppConfig, ConfigError, WeatherError, provider::openweather::OpenWeatherProvider};

pub mod openweather;

/// Source of raw current-weather payloads.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch the provider's raw response for `city`, in metric units.
    async fn fetch_current(&self, city: &str) -> Result<Value, WeatherError>;
}

/// Construct the weather provider from resolved configuration.
pub fn provider_from_config(config: &AppConfig) -> Result<Box<dyn WeatherProvider>, ConfigError> {
    let provider = OpenWeatherProvider::new(
        config.weather_api_key.clone(),
        config.weather_base_url.clone(),
    )?;
    Ok(Box::new(provider))
}
