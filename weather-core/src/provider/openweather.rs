use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{FetchError, WeatherSnapshot};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the provider at another host (a proxy, or a mock server in tests).
    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn current_url(&self) -> String {
        format!("{}{CURRENT_WEATHER_PATH}", self.base_url)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: Option<i64>,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city: &str) -> Result<WeatherSnapshot, FetchError> {
        if self.api_key.trim().is_empty() {
            warn!("no OpenWeather API key configured");
            return Err(FetchError::InvalidApiKey);
        }

        debug!(city, "requesting current weather");

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
            .map_err(|e| {
                warn!(city, error = %e, "OpenWeather request failed");
                FetchError::RequestFailed(e.to_string())
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            warn!(city, error = %e, "failed to read OpenWeather response body");
            FetchError::RequestFailed(e.to_string())
        })?;

        if status == StatusCode::UNAUTHORIZED {
            warn!(city, "OpenWeather rejected the API key");
            return Err(FetchError::InvalidApiKey);
        }

        if !status.is_success() {
            warn!(city, %status, body = %truncate_body(&body), "OpenWeather returned an error status");
            return Err(FetchError::RequestFailed(status_message(status, &body)));
        }

        parse_current(&body)
    }
}

/// Map a 2xx body to a snapshot. The payload's own `cod` field decides
/// whether the city was found.
fn parse_current(body: &str) -> Result<WeatherSnapshot, FetchError> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, "OpenWeather response is not JSON");
        FetchError::RequestFailed(format!("Invalid response from weather service: {e}"))
    })?;

    if !is_ok_code(value.get("cod")) {
        debug!(cod = ?value.get("cod"), "OpenWeather payload reports a non-OK status");
        return Err(FetchError::CityNotFound);
    }

    let parsed: OwCurrentResponse = serde_json::from_value(value).map_err(|e| {
        warn!(error = %e, "unexpected OpenWeather payload shape");
        FetchError::RequestFailed(format!("Invalid response from weather service: {e}"))
    })?;

    Ok(snapshot_from(parsed))
}

fn snapshot_from(parsed: OwCurrentResponse) -> WeatherSnapshot {
    let (condition_main, condition_description, condition_icon_id) = parsed
        .weather
        .into_iter()
        .next()
        .map(|w| (w.main, w.description, w.icon))
        .unwrap_or_else(|| ("Unknown".to_string(), "Unknown".to_string(), String::new()));

    WeatherSnapshot {
        location_name: parsed.name,
        temperature_c: parsed.main.temp,
        humidity_pct: parsed.main.humidity.clamp(0.0, 100.0).round() as u8,
        wind_speed: parsed.wind.speed.max(0.0),
        condition_main,
        condition_description,
        condition_icon_id,
        observed_at: parsed.dt.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
    }
}

/// OpenWeather sends `cod` as a number on success and as a string on errors.
fn is_ok_code(cod: Option<&Value>) -> bool {
    match cod {
        Some(Value::Number(n)) => n.as_i64() == Some(200),
        Some(Value::String(s)) => s == "200",
        _ => false,
    }
}

fn status_message(status: StatusCode, body: &str) -> String {
    let base = format!("Request failed with status code {}", status.as_u16());

    let provider_message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned))
        .filter(|m| !m.is_empty());

    match provider_message {
        Some(msg) => format!("{base}: {msg}"),
        None => base,
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paris_payload() -> Value {
        json!({
            "cod": 200,
            "name": "Paris",
            "dt": 1_700_000_000,
            "main": { "temp": 11.6, "humidity": 87 },
            "weather": [
                { "main": "Rain", "description": "light rain", "icon": "10d" },
                { "main": "Mist", "description": "mist", "icon": "50d" }
            ],
            "wind": { "speed": 5.14 }
        })
    }

    #[test]
    fn ok_code_accepts_number_and_string() {
        assert!(is_ok_code(Some(&json!(200))));
        assert!(is_ok_code(Some(&json!("200"))));
        assert!(!is_ok_code(Some(&json!("404"))));
        assert!(!is_ok_code(None));
    }

    #[test]
    fn parses_first_condition() {
        let snap = parse_current(&paris_payload().to_string()).expect("payload should parse");

        assert_eq!(snap.location_name, "Paris");
        assert_eq!(snap.humidity_pct, 87);
        assert_eq!(snap.condition_main, "Rain");
        assert_eq!(snap.condition_description, "light rain");
        assert_eq!(snap.condition_icon_id, "10d");
        assert_eq!(snap.observed_at.map(|t| t.timestamp()), Some(1_700_000_000));
    }

    #[test]
    fn non_ok_cod_is_city_not_found() {
        let body = json!({ "cod": "404", "message": "city not found" }).to_string();
        assert_eq!(parse_current(&body), Err(FetchError::CityNotFound));
    }

    #[test]
    fn garbage_body_is_request_failure() {
        let err = parse_current("<html>oops</html>").unwrap_err();
        assert!(matches!(err, FetchError::RequestFailed(_)));
    }

    #[test]
    fn empty_condition_list_falls_back_to_unknown() {
        let mut payload = paris_payload();
        payload["weather"] = json!([]);

        let snap = parse_current(&payload.to_string()).expect("payload should parse");
        assert_eq!(snap.condition_main, "Unknown");
        assert_eq!(snap.condition_icon_id, "");
        assert_eq!(snap.icon_url(), None);
    }

    #[test]
    fn status_message_appends_provider_message() {
        let body = json!({ "cod": "404", "message": "city not found" }).to_string();
        assert_eq!(
            status_message(StatusCode::NOT_FOUND, &body),
            "Request failed with status code 404: city not found"
        );
        assert_eq!(
            status_message(StatusCode::BAD_GATEWAY, "bad gateway"),
            "Request failed with status code 502"
        );
    }

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let provider = OpenWeatherProvider::with_base_url("KEY".into(), "http://localhost:1234/");
        assert_eq!(provider.current_url(), "http://localhost:1234/data/2.5/weather");
    }
}
