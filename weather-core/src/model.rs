use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// Placeholder printed for fields that are absent.
pub const NOT_AVAILABLE: &str = "N/A";

/// Normalized, validated weather observation for one city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherRecord {
    pub city: String,
    pub country: Option<String>,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Degrees Celsius.
    pub feels_like: Option<f64>,
    /// Percent.
    pub humidity: i64,
    pub description: String,
    /// Metres per second.
    pub wind_speed: f64,
}

impl fmt::Display for WeatherRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let country = self.country.as_deref().unwrap_or(NOT_AVAILABLE);
        let feels_like = self
            .feels_like
            .map(|t| t.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        writeln!(f, "City: {}", self.city)?;
        writeln!(f, "Country: {country}")?;
        writeln!(f, "Temperature: {}°C", self.temperature)?;
        writeln!(f, "Feels Like: {feels_like}°C")?;
        writeln!(f, "Description: {}", self.description)?;
        writeln!(f, "Humidity: {}%", self.humidity)?;
        write!(f, "Wind Speed: {} m/s", self.wind_speed)
    }
}

/// Free-form recommendation payload produced by the language model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Insight(Map<String, Value>);

impl Insight {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Value of `key` rendered for humans, or [`NOT_AVAILABLE`] when absent.
    ///
    /// Strings are printed without quotes; anything else as compact JSON.
    pub fn display_field(&self, key: &str) -> String {
        match self.0.get(key) {
            None | Some(Value::Null) => NOT_AVAILABLE.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn london() -> WeatherRecord {
        WeatherRecord {
            city: "London".into(),
            country: Some("GB".into()),
            temperature: 15.2,
            feels_like: Some(14.0),
            humidity: 70,
            description: "light rain".into(),
            wind_speed: 4.1,
        }
    }

    #[test]
    fn record_serializes_absent_optionals_as_null() {
        let record = WeatherRecord {
            country: None,
            feels_like: None,
            ..london()
        };
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["country"], Value::Null);
        assert_eq!(value["feels_like"], Value::Null);
        assert_eq!(value["city"], "London");
    }

    #[test]
    fn record_display_uses_placeholder_for_missing_country() {
        let record = WeatherRecord {
            country: None,
            ..london()
        };
        let text = record.to_string();

        assert!(text.contains("Country: N/A"));
        assert!(text.contains("Temperature: 15.2°C"));
        assert!(text.contains("Wind Speed: 4.1 m/s"));
    }

    #[test]
    fn insight_display_field_defaults_and_formats() {
        let Value::Object(map) = json!({
            "temperature": 15.2,
            "recommendation": "Bring an umbrella",
            "insights": ["windy", "wet"],
            "description": null,
        }) else {
            unreachable!()
        };
        let insight = Insight::new(map);

        assert_eq!(insight.display_field("temperature"), "15.2");
        assert_eq!(insight.display_field("recommendation"), "Bring an umbrella");
        assert_eq!(insight.display_field("insights"), r#"["windy","wet"]"#);
        assert_eq!(insight.display_field("description"), NOT_AVAILABLE);
        assert_eq!(insight.display_field("missing"), NOT_AVAILABLE);
    }
}
