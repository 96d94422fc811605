//! Core library for the `weatherdash` dashboard.
//!
//! This crate defines:
//! - The weather fetch service (provider trait + OpenWeather implementation)
//! - The persisted list of recent searches
//! - The dashboard controller that ties them together
//! - Configuration & credentials handling
//!
//! It is used by `weatherdash`, but can also drive other front-ends.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod history;
pub mod model;
pub mod provider;
pub mod storage;

pub use config::Config;
pub use dashboard::{Dashboard, FetchState, Notification, PendingSearch};
pub use error::FetchError;
pub use history::{MAX_RECENT_SEARCHES, RecentSearches, RecentStore};
pub use model::WeatherSnapshot;
pub use provider::{OpenWeatherProvider, WeatherProvider};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
