use tracing::{info, instrument};

use crate::{
    AppConfig, ConfigError, WeatherError,
    insight::InsightGenerator,
    llm::{GeminiClient, TextGenerator},
    model::{Insight, WeatherRecord},
    normalize::normalize,
    prompt::PromptTemplate,
    provider::{WeatherProvider, provider_from_config},
};

/// Fetch and normalize only; needs no model credentials or prompt template.
pub async fn fetch_weather(
    provider: &dyn WeatherProvider,
    city: &str,
) -> Result<WeatherRecord, WeatherError> {
    let raw = provider.fetch_current(city).await?;
    normalize(&raw)
}

/// Runs fetch → normalize → insight generation for one city at a time.
#[derive(Debug)]
pub struct WeatherAssistant<G> {
    provider: Box<dyn WeatherProvider>,
    insights: InsightGenerator<G>,
}

impl WeatherAssistant<GeminiClient> {
    /// Build the production assistant: OpenWeather + Gemini.
    ///
    /// Fails if the prompt template cannot be loaded or an HTTP client
    /// cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let template = PromptTemplate::load(&config.prompt_path)?;
        let provider = provider_from_config(config)?;
        let gemini = GeminiClient::from_config(config)?;

        Ok(Self::new(provider, InsightGenerator::new(gemini, template)))
    }
}

impl<G: TextGenerator> WeatherAssistant<G> {
    pub fn new(provider: Box<dyn WeatherProvider>, insights: InsightGenerator<G>) -> Self {
        Self { provider, insights }
    }

    pub async fn get_weather(&self, city: &str) -> Result<WeatherRecord, WeatherError> {
        fetch_weather(self.provider.as_ref(), city).await
    }

    #[instrument(skip(self))]
    pub async fn get_weather_insights(&self, city: &str) -> Result<Insight, WeatherError> {
        let record = self.get_weather(city).await?;
        info!(
            temperature = record.temperature,
            description = %record.description,
            "weather normalized"
        );

        self.insights.generate_insights(&record).await
    }
}
