//! Dashboard controller driven through a scripted provider.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::{collections::HashMap, sync::Arc};
use weatherdash_core::{
    Dashboard, FetchError, FetchState, FileStore, MemoryStore, RecentStore, WeatherProvider,
    WeatherSnapshot,
};

/// Answers from a fixed table and remembers every city it was asked for.
#[derive(Debug, Default)]
struct ScriptedProvider {
    failures: HashMap<String, FetchError>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    fn failing(city: &str, err: FetchError) -> Self {
        let mut provider = Self::default();
        provider.failures.insert(city.to_string(), err);
        provider
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl WeatherProvider for ScriptedProvider {
    async fn current_weather(&self, city: &str) -> Result<WeatherSnapshot, FetchError> {
        self.calls.lock().push(city.to_string());
        if let Some(err) = self.failures.get(city) {
            return Err(err.clone());
        }
        Ok(snapshot(city))
    }
}

fn snapshot(city: &str) -> WeatherSnapshot {
    WeatherSnapshot {
        location_name: city.to_string(),
        temperature_c: 15.2,
        humidity_pct: 60,
        wind_speed: 2.5,
        condition_main: "Clouds".into(),
        condition_description: "scattered clouds".into(),
        condition_icon_id: "03d".into(),
        observed_at: None,
    }
}

fn dashboard(provider: Arc<ScriptedProvider>) -> Dashboard<MemoryStore> {
    Dashboard::new(provider, RecentStore::new(MemoryStore::new()))
}

#[tokio::test]
async fn test_repeat_search_moves_city_to_front() {
    let provider = Arc::new(ScriptedProvider::default());
    let mut dash = dashboard(provider.clone());

    dash.search("Paris").await;
    dash.search("London").await;
    dash.search("Paris").await;

    assert_eq!(dash.recent_searches().as_slice(), ["Paris", "London"]);
    assert_eq!(provider.calls(), ["Paris", "London", "Paris"]);
}

#[tokio::test]
async fn test_six_searches_keep_five_most_recent() {
    let provider = Arc::new(ScriptedProvider::default());
    let mut dash = dashboard(provider);

    for city in ["A", "B", "C", "D", "E", "F"] {
        dash.search(city).await;
    }

    assert_eq!(dash.recent_searches().as_slice(), ["F", "E", "D", "C", "B"]);
}

#[tokio::test]
async fn test_blank_search_makes_no_request() {
    let provider = Arc::new(ScriptedProvider::default());
    let mut dash = dashboard(provider.clone());

    dash.search("").await;
    dash.search("  \t ").await;

    assert!(provider.calls().is_empty());
    assert_eq!(dash.fetch_state(), &FetchState::Idle);
}

#[tokio::test]
async fn test_invalid_key_leaves_state_intact() {
    let provider = Arc::new(ScriptedProvider::failing("Rome", FetchError::InvalidApiKey));
    let mut dash = dashboard(provider);

    dash.search("Oslo").await;
    dash.search("Rome").await;

    assert_eq!(dash.fetch_state(), &FetchState::Failed(FetchError::InvalidApiKey));
    assert_eq!(dash.weather(), Some(&snapshot("Oslo")));
    assert_eq!(dash.recent_searches().as_slice(), ["Oslo"]);
    assert!(!dash.is_loading());
    assert!(dash.notification().is_some());
}

#[tokio::test]
async fn test_refresh_without_snapshot_is_noop() {
    let provider = Arc::new(ScriptedProvider::default());
    let mut dash = dashboard(provider.clone());

    dash.refresh().await;

    assert!(provider.calls().is_empty());
    assert_eq!(dash.fetch_state(), &FetchState::Idle);
}

#[tokio::test]
async fn test_refresh_reissues_displayed_city() {
    let provider = Arc::new(ScriptedProvider::default());
    let mut dash = dashboard(provider.clone());

    dash.search("Tokyo").await;
    dash.refresh().await;

    assert_eq!(provider.calls(), ["Tokyo", "Tokyo"]);
    assert_eq!(dash.fetch_state(), &FetchState::Success(snapshot("Tokyo")));
}

#[tokio::test]
async fn test_submit_uses_input_and_clears_it() {
    let provider = Arc::new(ScriptedProvider::default());
    let mut dash = dashboard(provider.clone());

    dash.update_input("Lisbon");
    dash.submit_search().await;

    assert_eq!(provider.calls(), ["Lisbon"]);
    assert_eq!(dash.input(), "");
}

#[tokio::test]
async fn test_select_recent_searches_exact_entry() {
    let provider = Arc::new(ScriptedProvider::default());
    let mut dash = dashboard(provider.clone());

    dash.search("Paris").await;
    dash.search("London").await;
    dash.select_recent(1).await;

    assert_eq!(provider.calls(), ["Paris", "London", "Paris"]);
    assert_eq!(dash.recent_searches().as_slice(), ["Paris", "London"]);
}

#[tokio::test]
async fn test_recent_searches_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(ScriptedProvider::default());

    {
        let mut dash = Dashboard::new(
            provider.clone(),
            RecentStore::new(FileStore::new(dir.path())),
        );
        dash.search("Berlin").await;
        dash.search("Madrid").await;
    }

    let dash = Dashboard::new(provider, RecentStore::new(FileStore::new(dir.path())));
    assert_eq!(dash.recent_searches().as_slice(), ["Madrid", "Berlin"]);
}

#[test]
fn test_record_then_load_puts_city_first() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecentStore::new(FileStore::new(dir.path()));

    store.record("Berlin", &store.load());

    assert_eq!(store.load().get(0), Some("Berlin"));
}
