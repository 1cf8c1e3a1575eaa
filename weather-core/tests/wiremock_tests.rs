//! Integration tests for the weather and Gemini clients using wiremock.
//!
//! These tests exercise the HTTP-facing pieces against a mock server,
//! covering status-code mapping, reply cleanup and the full per-city pipeline.

use serde_json::json;
use weather_core::{
    GeminiClient, InsightGenerator, OpenWeatherProvider, PromptTemplate, TextGenerator,
    WeatherAssistant, WeatherError, WeatherProvider,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path, query_param},
};

const MODEL: &str = "gemini-2.5-flash";

fn london_payload() -> serde_json::Value {
    json!({
        "coord": { "lon": -0.1257, "lat": 51.5085 },
        "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }],
        "main": { "temp": 15.2, "feels_like": 14.0, "humidity": 70, "pressure": 1012 },
        "wind": { "speed": 4.1, "deg": 240 },
        "sys": { "country": "GB" },
        "name": "London",
        "cod": 200
    })
}

fn gemini_reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

#[allow(clippy::expect_used)]
fn weather_client(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::new("TEST_KEY".into(), server.uri()).expect("Failed to create client")
}

#[allow(clippy::expect_used)]
fn gemini_client(server: &MockServer) -> GeminiClient {
    GeminiClient::new("GEMINI_KEY".into(), server.uri(), MODEL.into())
        .expect("Failed to create client")
}

async fn mount_weather(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_gemini(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(format!("/v1beta/models/{MODEL}:generateContent")))
        .respond_with(response)
        .mount(server)
        .await;
}

// ============================================================================
// Weather fetcher
// ============================================================================

#[tokio::test]
async fn fetch_sends_metric_query_and_returns_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "London"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let raw = weather_client(&server).fetch_current("London").await.unwrap();
    assert_eq!(raw["name"], "London");
    assert_eq!(raw["main"]["temp"], 15.2);
}

#[tokio::test]
async fn fetch_maps_401_to_invalid_api_key() {
    let server = MockServer::start().await;
    mount_weather(
        &server,
        ResponseTemplate::new(401).set_body_json(json!({ "cod": 401, "message": "Invalid API key" })),
    )
    .await;

    let err = weather_client(&server).fetch_current("London").await.unwrap_err();
    assert!(matches!(err, WeatherError::InvalidApiKey));
}

#[tokio::test]
async fn fetch_maps_404_to_city_not_found() {
    let server = MockServer::start().await;
    mount_weather(
        &server,
        ResponseTemplate::new(404).set_body_json(json!({ "cod": "404", "message": "city not found" })),
    )
    .await;

    let err = weather_client(&server).fetch_current("Atlantis").await.unwrap_err();
    assert!(matches!(err, WeatherError::CityNotFound(ref c) if c == "Atlantis"));
}

#[tokio::test]
async fn fetch_maps_429_to_rate_limited() {
    let server = MockServer::start().await;
    mount_weather(&server, ResponseTemplate::new(429)).await;

    let err = weather_client(&server).fetch_current("London").await.unwrap_err();
    assert!(matches!(err, WeatherError::RateLimited));
}

#[tokio::test]
async fn fetch_maps_other_statuses_to_generic_error() {
    let server = MockServer::start().await;
    mount_weather(
        &server,
        ResponseTemplate::new(503).set_body_string("upstream unavailable"),
    )
    .await;

    let err = weather_client(&server).fetch_current("London").await.unwrap_err();
    match err {
        WeatherError::Fetch(msg) => {
            assert!(msg.contains("503"));
            assert!(msg.contains("upstream unavailable"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_rejects_non_json_body() {
    let server = MockServer::start().await;
    mount_weather(&server, ResponseTemplate::new(200).set_body_string("<html></html>")).await;

    let err = weather_client(&server).fetch_current("London").await.unwrap_err();
    assert!(matches!(err, WeatherError::Fetch(_)));
}

#[tokio::test]
async fn fetch_surfaces_transport_failure() {
    // Nothing listens on port 1.
    let client = OpenWeatherProvider::new("KEY".into(), "http://127.0.0.1:1".into()).unwrap();
    let err = client.fetch_current("London").await.unwrap_err();
    assert!(matches!(err, WeatherError::Fetch(_)));
}

// ============================================================================
// Gemini client
// ============================================================================

#[tokio::test]
async fn gemini_sends_prompt_with_key_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v1beta/models/{MODEL}:generateContent")))
        .and(header("x-goog-api-key", "GEMINI_KEY"))
        .and(body_partial_json(json!({
            "contents": [{ "parts": [{ "text": "hello model" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("hi there")))
        .expect(1)
        .mount(&server)
        .await;

    let text = gemini_client(&server).generate("hello model").await.unwrap();
    assert_eq!(text, "hi there");
}

#[tokio::test]
async fn gemini_concatenates_parts() {
    let server = MockServer::start().await;
    mount_gemini(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] } }]
        })),
    )
    .await;

    let text = gemini_client(&server).generate("p").await.unwrap();
    assert_eq!(text, "{\"a\":1}");
}

#[tokio::test]
async fn gemini_error_status_is_generation_failure() {
    let server = MockServer::start().await;
    mount_gemini(
        &server,
        ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT" }
        })),
    )
    .await;

    let err = gemini_client(&server).generate("p").await.unwrap_err();
    match err {
        WeatherError::Generation(msg) => assert!(msg.contains("API key not valid")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn gemini_empty_candidates_is_generation_failure() {
    let server = MockServer::start().await;
    mount_gemini(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })),
    )
    .await;

    let err = gemini_client(&server).generate("p").await.unwrap_err();
    assert!(matches!(err, WeatherError::Generation(_)));
}

// ============================================================================
// Full pipeline
// ============================================================================

fn assistant_for(
    weather: &MockServer,
    gemini: &MockServer,
) -> WeatherAssistant<GeminiClient> {
    let template = PromptTemplate::new("Weather report:\n{weather_data}\nReply with JSON.");
    WeatherAssistant::new(
        Box::new(weather_client(weather)),
        InsightGenerator::new(gemini_client(gemini), template),
    )
}

#[tokio::test]
async fn pipeline_produces_insight_from_fenced_reply() {
    let weather = MockServer::start().await;
    let gemini = MockServer::start().await;

    mount_weather(&weather, ResponseTemplate::new(200).set_body_json(london_payload())).await;

    Mock::given(method("POST"))
        .and(path(format!("/v1beta/models/{MODEL}:generateContent")))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(
            "```json\n{\"temperature\": 15.2, \"description\": \"light rain\", \
             \"recommendation\": \"Carry an umbrella\", \"insights\": \"Damp but mild\"}\n```",
        )))
        .expect(1)
        .mount(&gemini)
        .await;

    let assistant = assistant_for(&weather, &gemini);
    let insight = assistant.get_weather_insights("London").await.unwrap();

    assert_eq!(insight.display_field("temperature"), "15.2");
    assert_eq!(insight.display_field("recommendation"), "Carry an umbrella");
    assert_eq!(insight.display_field("insights"), "Damp but mild");

    let requests = gemini.received_requests().await.unwrap();
    let body: serde_json::Value = requests[0].body_json().unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains(r#""city": "London""#));
    assert!(prompt.contains(r#""wind_speed": 4.1"#));
}

#[tokio::test]
async fn pipeline_stops_before_model_when_validation_fails() {
    let weather = MockServer::start().await;
    let gemini = MockServer::start().await;

    let mut payload = london_payload();
    payload["weather"] = json!([]);
    mount_weather(&weather, ResponseTemplate::new(200).set_body_json(payload)).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("{}")))
        .expect(0)
        .mount(&gemini)
        .await;

    let assistant = assistant_for(&weather, &gemini);
    let err = assistant.get_weather_insights("London").await.unwrap_err();
    assert!(matches!(err, WeatherError::MissingFields(_)));
}

#[tokio::test]
async fn pipeline_reports_unparseable_reply() {
    let weather = MockServer::start().await;
    let gemini = MockServer::start().await;

    mount_weather(&weather, ResponseTemplate::new(200).set_body_json(london_payload())).await;
    mount_gemini(
        &gemini,
        ResponseTemplate::new(200).set_body_json(gemini_reply("It will rain, bring a coat.")),
    )
    .await;

    let assistant = assistant_for(&weather, &gemini);
    let err = assistant.get_weather_insights("London").await.unwrap_err();
    assert!(matches!(err, WeatherError::Parse(_)));
}

#[tokio::test]
async fn get_weather_skips_the_model() {
    let weather = MockServer::start().await;
    let gemini = MockServer::start().await;

    mount_weather(&weather, ResponseTemplate::new(200).set_body_json(london_payload())).await;

    let assistant = assistant_for(&weather, &gemini);
    let record = assistant.get_weather("London").await.unwrap();

    assert_eq!(record.city, "London");
    assert_eq!(record.country.as_deref(), Some("GB"));
    assert!(gemini.received_requests().await.unwrap().is_empty());
}
