use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Current conditions for one city, as returned by a single successful fetch.
///
/// Replaced wholesale by the next successful fetch, never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    /// Short category, e.g. "Rain".
    pub condition_main: String,
    pub condition_description: String,
    /// Opaque provider icon id, e.g. "10d".
    pub condition_icon_id: String,
    pub observed_at: Option<DateTime<Utc>>,
}

impl WeatherSnapshot {
    /// Temperature rounded to whole degrees for display.
    pub fn rounded_temperature(&self) -> i64 {
        self.temperature_c.round() as i64
    }

    /// URL of the provider's icon for the current condition.
    pub fn icon_url(&self) -> Option<String> {
        if self.condition_icon_id.is_empty() {
            return None;
        }
        Some(format!("{ICON_BASE_URL}/{}@2x.png", self.condition_icon_id))
    }
}
