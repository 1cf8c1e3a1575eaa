use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::{ConfigError, WeatherError, error::truncate_body};

use super::WeatherProvider;

/// OpenWeatherMap "current weather" client.
#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl std::fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: String) -> Result<Self, ConfigError> {
        let http = Client::builder().build().map_err(ConfigError::HttpClient)?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn current_url(&self) -> String {
        format!("{}/data/2.5/weather", self.base_url)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self))]
    async fn fetch_current(&self, city: &str) -> Result<Value, WeatherError> {
        let res = self
            .http
            .get(self.current_url())
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::Fetch(format!("request to OpenWeather failed: {e}")))?;

        let status = res.status();
        debug!(%status, "OpenWeather responded");

        match status {
            StatusCode::UNAUTHORIZED => return Err(WeatherError::InvalidApiKey),
            StatusCode::NOT_FOUND => return Err(WeatherError::CityNotFound(city.to_string())),
            StatusCode::TOO_MANY_REQUESTS => return Err(WeatherError::RateLimited),
            _ => {}
        }

        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::Fetch(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            warn!(%status, "OpenWeather request failed");
            return Err(WeatherError::Fetch(format!(
                "status {}: {}",
                status,
                truncate_body(&body)
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| WeatherError::Fetch(format!("response is not valid JSON: {e}")))
    }
}
