use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::application::WeatherProvider;
use crate::domain::WeatherReading;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Deserialize)]
struct ApiResponse {
    name: String,
    main: MainBlock,
    weather: Vec<ConditionBlock>,
    wind: WindBlock,
}

#[derive(Deserialize)]
struct MainBlock {
    temp: f32,
    feels_like: f32,
    humidity: u8,
}

#[derive(Deserialize)]
struct ConditionBlock {
    description: String,
}

#[derive(Deserialize)]
struct WindBlock {
    speed: f32,
}

/// [`WeatherProvider`] over the OpenWeatherMap current-conditions endpoint
/// (metric units).
///
/// Per the provider contract, every failure (missing key, unknown location,
/// network error, unparseable body) collapses to `None` with a `warn!`;
/// callers own the fallback.
pub struct OpenWeatherClient {
    client: reqwest::Client,
    api_key: String,
    url: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        let url = format!("{}{CURRENT_WEATHER_PATH}", base.trim_end_matches('/'));
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            url,
        }
    }

    /// Reads `OPENWEATHER_API_KEY` (may be empty; every fetch then fails
    /// over to the generated fallback) and optional `OPENWEATHER_BASE_URL`.
    pub fn from_env() -> Self {
        let key = std::env::var("OPENWEATHER_API_KEY").unwrap_or_default();
        let base =
            std::env::var("OPENWEATHER_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(key, base)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn fetch_current(&self, location: &str) -> Option<WeatherReading> {
        if self.api_key.is_empty() {
            warn!("OpenWeatherClient: no API key configured");
            return None;
        }

        let response = match self
            .client
            .get(&self.url)
            .query(&[
                ("q", location),
                ("units", "metric"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("OpenWeatherClient: request failed for '{location}': {e}");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                "OpenWeatherClient: API returned {} for '{location}'",
                response.status()
            );
            return None;
        }

        let parsed: ApiResponse = match response.json().await {
            Ok(p) => p,
            Err(e) => {
                warn!("OpenWeatherClient: failed to parse response for '{location}': {e}");
                return None;
            }
        };

        let description = parsed
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .unwrap_or_else(|| "unknown conditions".to_string());

        Some(WeatherReading {
            location: parsed.name,
            temp_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            description,
            humidity: parsed.main.humidity,
            wind_speed: parsed.wind.speed,
        })
    }
}
