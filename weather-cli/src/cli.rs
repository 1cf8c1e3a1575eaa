use std::{io::Write, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use tracing::{info, warn};
use weather_core::{
    AppConfig, Config, Insight, TextGenerator, WeatherAssistant, WeatherRecord,
    config::DEFAULT_MODEL, fetch_weather, provider_from_config,
};

const RULE_WIDTH: usize = 50;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-insights",
    version,
    about = "Weather data parser & LLM-backed recommendations"
)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch weather and generate insights for each city in turn.
    Run {
        /// Cities to process; defaults to the configured or built-in list.
        cities: Vec<String>,

        /// Path to the prompt template.
        #[arg(long)]
        prompt: Option<PathBuf>,
    },

    /// Show normalized weather for a city without calling the model.
    Show {
        /// City name, e.g. "London".
        city: String,
    },

    /// Store API keys and the model name in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let command = self.command.unwrap_or(Command::Run {
            cities: Vec::new(),
            prompt: None,
        });

        match command {
            Command::Run { cities, prompt } => {
                let config = resolve_config(prompt)?;
                let assistant = WeatherAssistant::from_config(&config)?;
                let cities = if cities.is_empty() {
                    config.cities.clone()
                } else {
                    cities
                };
                run_cities(&assistant, &cities, &mut std::io::stdout()).await?;
            }
            Command::Show { city } => {
                let config = resolve_config(None)?;
                let record = show_weather(&config, &city).await?;
                println!("{record}");
            }
            Command::Configure => configure()?,
        }

        Ok(())
    }
}

fn resolve_config(prompt: Option<PathBuf>) -> anyhow::Result<AppConfig> {
    let mut file = Config::load()?;
    if prompt.is_some() {
        file.prompt_path = prompt;
    }
    Ok(file.resolve_from_env()?)
}

/// Weather only: no Gemini key or prompt template involved.
async fn show_weather(config: &AppConfig, city: &str) -> anyhow::Result<WeatherRecord> {
    let provider = provider_from_config(config)?;
    fetch_weather(provider.as_ref(), city)
        .await
        .with_context(|| format!("Failed to get weather for {city}"))
}

/// Sequential demo loop: one city at a time, failures reported and skipped.
///
/// Returns the number of cities that failed.
async fn run_cities<G, W>(
    assistant: &WeatherAssistant<G>,
    cities: &[String],
    out: &mut W,
) -> std::io::Result<usize>
where
    G: TextGenerator,
    W: Write,
{
    writeln!(out, "Weather Data Parser & API Assistant")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;

    let mut failures = 0usize;
    for city in cities {
        writeln!(out, "\nGetting weather insights for {city}...")?;
        match assistant.get_weather_insights(city).await {
            Ok(insight) => {
                for line in summary_lines(&insight) {
                    writeln!(out, "{line}")?;
                }
            }
            Err(err) => {
                failures += 1;
                warn!(%city, error = %err, "city failed");
                writeln!(out, "Error: {err}")?;
            }
        }
        writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    }

    info!(total = cities.len(), failures, "run complete");
    Ok(failures)
}

fn summary_lines(insight: &Insight) -> [String; 4] {
    [
        format!("Temperature: {}°C", insight.display_field("temperature")),
        format!("Description: {}", insight.display_field("description")),
        format!("Recommendation: {}", insight.display_field("recommendation")),
        format!("Insights: {}", insight.display_field("insights")),
    ]
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let weather_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current value")
        .prompt()?;
    if !weather_key.trim().is_empty() {
        config.weather_api_key = Some(weather_key.trim().to_string());
    }

    let gemini_key = Password::new("Gemini API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current value")
        .prompt()?;
    if !gemini_key.trim().is_empty() {
        config.gemini_api_key = Some(gemini_key.trim().to_string());
    }

    let current_model = config.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let model = Text::new("Gemini model:")
        .with_default(&current_model)
        .prompt()?;
    config.model = Some(model.trim().to_string()).filter(|m| !m.is_empty());

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}
