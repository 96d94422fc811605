use async_trait::async_trait;
use std::fmt::Debug;

use crate::{FetchError, WeatherSnapshot};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Source of current weather conditions by city name.
///
/// Implementations never panic or propagate transport errors past this
/// boundary: every outcome is either a snapshot or a [`FetchError`].
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, city: &str) -> Result<WeatherSnapshot, FetchError>;
}
