//! Turns a raw OpenWeather "current weather" payload into a [`WeatherRecord`].

use serde_json::Value;

use crate::{WeatherError, model::WeatherRecord};

/// Extract and validate the fields we care about.
///
/// Missing objects, `null` and wrong-typed values are all treated as absent.
/// `city`, `temperature`, `description`, `humidity` and `wind_speed` are
/// required; `country` and `feels_like` are not.
pub fn normalize(raw: &Value) -> Result<WeatherRecord, WeatherError> {
    let city = raw.get("name").and_then(Value::as_str);
    let country = raw.pointer("/sys/country").and_then(Value::as_str);
    let temperature = raw.pointer("/main/temp").and_then(Value::as_f64);
    let feels_like = raw.pointer("/main/feels_like").and_then(Value::as_f64);
    let humidity = raw.pointer("/main/humidity").and_then(as_integer);
    // An empty weather list leaves this absent instead of faulting.
    let description = raw.pointer("/weather/0/description").and_then(Value::as_str);
    let wind_speed = raw.pointer("/wind/speed").and_then(Value::as_f64);

    let mut missing = Vec::new();
    if city.is_none() {
        missing.push("city");
    }
    if temperature.is_none() {
        missing.push("temperature");
    }
    if description.is_none() {
        missing.push("description");
    }
    if humidity.is_none() {
        missing.push("humidity");
    }
    if wind_speed.is_none() {
        missing.push("wind_speed");
    }

    match (city, temperature, description, humidity, wind_speed) {
        (Some(city), Some(temperature), Some(description), Some(humidity), Some(wind_speed)) => {
            Ok(WeatherRecord {
                city: city.to_string(),
                country: country.map(str::to_string),
                temperature,
                feels_like,
                humidity,
                description: description.to_string(),
                wind_speed,
            })
        }
        _ => Err(WeatherError::MissingFields(missing)),
    }
}

// OpenWeather sends humidity as an integer, but accept a whole float too.
fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
    })
}
