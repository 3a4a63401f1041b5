use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::{ChatClient, WeatherProvider};
use crate::domain::DomainError;

const EXTRACT_SYSTEM_PROMPT: &str = "\
Extract the location name from the user's weather-related question. Return \
ONLY the location name, nothing else. If no specific location is mentioned, \
return exactly the word: unknown";

const FALLBACK_SYSTEM_PROMPT: &str = "\
You could not retrieve live weather data. Write a short, apologetic response \
explaining that real-time conditions for the requested location are \
unavailable right now, and suggest a couple of other ways the user could \
check the weather. Be concise and helpful.";

const UNKNOWN_SENTINEL: &str = "unknown";

pub const DEFAULT_LOCATION: &str = "Delhi";

/// Answers weather questions: extract a location, fetch live conditions,
/// render a fixed-format summary.
///
/// Degrades in two stages: an unextractable location becomes the configured
/// default, and a failed fetch becomes a generated apology with suggestions
/// instead of raw data.
pub struct WeatherTool {
    chat: Arc<dyn ChatClient>,
    provider: Arc<dyn WeatherProvider>,
    default_location: String,
}

impl WeatherTool {
    pub fn new(chat: Arc<dyn ChatClient>, provider: Arc<dyn WeatherProvider>) -> Self {
        Self {
            chat,
            provider,
            default_location: DEFAULT_LOCATION.to_string(),
        }
    }

    pub fn with_default_location(mut self, location: impl Into<String>) -> Self {
        self.default_location = location.into();
        self
    }

    pub async fn run(&self, question: &str) -> Result<String, DomainError> {
        let location = self.extract_location(question).await?;
        debug!("Weather lookup for location: {location}");

        match self.provider.fetch_current(&location).await {
            Some(reading) => Ok(reading.summary()),
            None => {
                warn!("Weather fetch failed for {location}; generating fallback response");
                self.chat
                    .complete(
                        FALLBACK_SYSTEM_PROMPT,
                        &format!("Requested location: {location}"),
                    )
                    .await
            }
        }
    }

    async fn extract_location(&self, question: &str) -> Result<String, DomainError> {
        let response = match self.chat.complete(EXTRACT_SYSTEM_PROMPT, question).await {
            Ok(r) => r,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!("Location extraction failed: {e}. Using default location.");
                return Ok(self.default_location.clone());
            }
        };

        let location = clean_location(&response);
        if location.is_empty() || location.eq_ignore_ascii_case(UNKNOWN_SENTINEL) {
            Ok(self.default_location.clone())
        } else {
            Ok(location)
        }
    }
}

/// The model is told to return only a name, but trim the usual debris anyway:
/// surrounding whitespace, quotes, and anything past the first line.
fn clean_location(response: &str) -> String {
    response
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches(|c| c == '"' || c == '\'' || c == '.')
        .to_string()
}
