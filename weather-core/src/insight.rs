use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    WeatherError,
    llm::TextGenerator,
    model::{Insight, WeatherRecord},
    prompt::PromptTemplate,
};

/// Remove a leading "```json" or "```" fence and a trailing "```" fence.
pub fn strip_code_fences(reply: &str) -> &str {
    let mut text = reply.trim();

    if let Some(rest) = text.strip_prefix("```json") {
        text = rest.trim();
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest.trim();
    }

    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim();
    }

    text
}

/// Parse a model reply as a JSON object, after fence stripping.
pub fn parse_insight(reply: &str) -> Result<Insight, WeatherError> {
    let cleaned = strip_code_fences(reply);

    match serde_json::from_str::<Value>(cleaned) {
        Ok(Value::Object(fields)) => Ok(Insight::new(fields)),
        Ok(other) => Err(WeatherError::Parse(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(WeatherError::Parse(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Prompts a [`TextGenerator`] with a rendered weather record.
#[derive(Debug)]
pub struct InsightGenerator<G> {
    generator: G,
    template: PromptTemplate,
}

impl<G: TextGenerator> InsightGenerator<G> {
    pub fn new(generator: G, template: PromptTemplate) -> Self {
        Self {
            generator,
            template,
        }
    }

    /// Render, generate, parse. One attempt; no retry on either failure.
    #[instrument(skip_all, fields(city = %record.city))]
    pub async fn generate_insights(&self, record: &WeatherRecord) -> Result<Insight, WeatherError> {
        let prompt = self.template.render(record)?;
        debug!(chars = prompt.len(), "rendered prompt");

        let reply = self.generator.generate(&prompt).await?;
        parse_insight(&reply)
    }
}
