use async_trait::async_trait;

use crate::domain::WeatherReading;

/// Source of current weather conditions.
///
/// `None` signals any failure: unknown location, network error, bad
/// credentials. Callers choose the fallback; providers only report absence.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch_current(&self, location: &str) -> Option<WeatherReading>;
}
