use serde::{Deserialize, Serialize};

/// Current conditions for a location, as reported by the weather source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReading {
    pub location: String,
    pub temp_c: f32,
    pub feels_like_c: f32,
    pub description: String,
    pub humidity: u8,
    pub wind_speed: f32,
}

impl WeatherReading {
    /// Fixed-format summary rendered into the final answer.
    pub fn summary(&self) -> String {
        format!(
            "Current weather in {}:\n\
             - Temperature: {}°C (feels like {}°C)\n\
             - Conditions: {}\n\
             - Humidity: {}%\n\
             - Wind: {} m/s",
            self.location,
            self.temp_c.round(),
            self.feels_like_c.round(),
            self.description,
            self.humidity,
            self.wind_speed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_contains_all_reported_fields() {
        let reading = WeatherReading {
            location: "Paris".to_string(),
            temp_c: 18.4,
            feels_like_c: 17.2,
            description: "clear sky".to_string(),
            humidity: 60,
            wind_speed: 3.0,
        };

        let summary = reading.summary();
        assert!(summary.contains("Paris"));
        assert!(summary.contains("18"));
        assert!(summary.contains("17"));
        assert!(summary.contains("clear sky"));
        assert!(summary.contains("60"));
        assert!(summary.contains("3"));
    }
}
