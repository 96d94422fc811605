//! Application state controller: the single owner of everything the
//! dashboard displays.
//!
//! Searches can be driven in one step with [`Dashboard::search`], or in two
//! steps (`begin_*` then [`Dashboard::finish_search`]) by a host that keeps
//! accepting input while the request is in flight. Requests are never
//! cancelled. Results apply in the order searches were begun: a completion
//! arriving after a newer search has already applied is dropped.

use std::sync::Arc;
use tracing::debug;

use crate::{
    FetchError, WeatherSnapshot,
    history::{RecentSearches, RecentStore},
    provider::WeatherProvider,
    storage::KeyValueStore,
};

/// Status of the most recent weather query.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Success(WeatherSnapshot),
    Failed(FetchError),
}

/// A dismissible message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn error(err: &FetchError) -> Self {
        Self {
            title: "Error".to_string(),
            message: err.user_message(),
        }
    }
}

/// A search that has been started and is waiting for its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSearch {
    generation: u64,
    city: String,
}

impl PendingSearch {
    pub fn city(&self) -> &str {
        &self.city
    }
}

#[derive(Debug)]
pub struct Dashboard<S> {
    provider: Arc<dyn WeatherProvider>,
    recent_store: RecentStore<S>,
    input: String,
    fetch_state: FetchState,
    weather: Option<WeatherSnapshot>,
    recent: RecentSearches,
    notification: Option<Notification>,
    latest_generation: u64,
    applied_generation: u64,
}

impl<S: KeyValueStore> Dashboard<S> {
    /// Create a dashboard, restoring recent searches from `recent_store`.
    pub fn new(provider: Arc<dyn WeatherProvider>, recent_store: RecentStore<S>) -> Self {
        let recent = recent_store.load();
        Self {
            provider,
            recent_store,
            input: String::new(),
            fetch_state: FetchState::Idle,
            weather: None,
            recent,
            notification: None,
            latest_generation: 0,
            applied_generation: 0,
        }
    }

    pub fn provider(&self) -> Arc<dyn WeatherProvider> {
        Arc::clone(&self.provider)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn fetch_state(&self) -> &FetchState {
        &self.fetch_state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.fetch_state, FetchState::Loading)
    }

    /// Last successfully fetched conditions. Stays in place across later
    /// failures and while a new search is loading.
    pub fn weather(&self) -> Option<&WeatherSnapshot> {
        self.weather.as_ref()
    }

    pub fn recent_searches(&self) -> &RecentSearches {
        &self.recent
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    pub fn update_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Start a search for `city`. Returns `None`, touching nothing, when the
    /// name is blank; otherwise the state is `Loading` on return.
    pub fn begin_search(&mut self, city: &str) -> Option<PendingSearch> {
        let city = city.trim();
        if city.is_empty() {
            return None;
        }

        self.latest_generation += 1;
        self.fetch_state = FetchState::Loading;

        debug!(city, generation = self.latest_generation, "search started");
        Some(PendingSearch {
            generation: self.latest_generation,
            city: city.to_string(),
        })
    }

    /// Start a search for the current input text.
    pub fn begin_submit(&mut self) -> Option<PendingSearch> {
        let text = self.input.clone();
        self.begin_search(&text)
    }

    /// Start a search for the city currently on display.
    pub fn begin_refresh(&mut self) -> Option<PendingSearch> {
        let city = self.weather.as_ref()?.location_name.clone();
        self.begin_search(&city)
    }

    /// Start a search for the recent entry at `index`.
    pub fn begin_select_recent(&mut self, index: usize) -> Option<PendingSearch> {
        let city = self.recent.get(index)?.to_string();
        self.begin_search(&city)
    }

    /// Apply the outcome of `pending`. Returns `false` if a newer search has
    /// already applied its result, in which case this one is discarded.
    ///
    /// While a newer search is still in flight the state stays `Loading`, but
    /// the snapshot, recent list and notification are updated.
    pub fn finish_search(
        &mut self,
        pending: PendingSearch,
        result: Result<WeatherSnapshot, FetchError>,
    ) -> bool {
        if pending.generation <= self.applied_generation {
            debug!(
                city = %pending.city,
                generation = pending.generation,
                applied = self.applied_generation,
                "dropping stale search result"
            );
            return false;
        }
        self.applied_generation = pending.generation;
        let settled = pending.generation == self.latest_generation;

        match result {
            Ok(snapshot) => {
                if settled {
                    self.fetch_state = FetchState::Success(snapshot.clone());
                }
                self.weather = Some(snapshot);
                self.input.clear();
                self.recent = self.recent_store.record(&pending.city, &self.recent);
            }
            Err(err) => {
                debug!(city = %pending.city, error = %err, "search failed");
                self.notification = Some(Notification::error(&err));
                if settled {
                    self.fetch_state = FetchState::Failed(err);
                }
            }
        }

        true
    }

    async fn run(&mut self, pending: Option<PendingSearch>) {
        let Some(pending) = pending else {
            return;
        };
        let result = self.provider.current_weather(pending.city()).await;
        self.finish_search(pending, result);
    }

    /// Fetch weather for `city` and apply the result. Blank names are ignored.
    pub async fn search(&mut self, city: &str) {
        let pending = self.begin_search(city);
        self.run(pending).await;
    }

    /// Search for the current input text.
    pub async fn submit_search(&mut self) {
        let pending = self.begin_submit();
        self.run(pending).await;
    }

    /// Re-fetch the city on display; no-op when nothing has been fetched yet.
    pub async fn refresh(&mut self) {
        let pending = self.begin_refresh();
        self.run(pending).await;
    }

    /// Search for the recent entry at `index`; no-op when out of range.
    pub async fn select_recent(&mut self, index: usize) {
        let pending = self.begin_select_recent(index);
        self.run(pending).await;
    }
}
