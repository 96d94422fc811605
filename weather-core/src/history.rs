//! Recently searched cities, most recent first, persisted across restarts.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::KeyValueStore;

pub const MAX_RECENT_SEARCHES: usize = 5;

/// Storage key the list is kept under.
pub const RECENT_SEARCHES_KEY: &str = "recentSearches";

/// Ordered, duplicate-free list of at most [`MAX_RECENT_SEARCHES`] city names.
///
/// Comparison is exact and case-sensitive: "paris" and "Paris" are distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentSearches(Vec<String>);

impl RecentSearches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from arbitrary entries: names are trimmed, blanks are
    /// skipped, the first occurrence of each name is kept and anything past
    /// the limit is dropped.
    pub fn from_entries<I, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut list: Vec<String> = Vec::with_capacity(MAX_RECENT_SEARCHES);
        for entry in entries {
            if list.len() == MAX_RECENT_SEARCHES {
                break;
            }
            let entry: String = entry.into();
            let entry = entry.trim().to_string();
            if !entry.is_empty() && !list.contains(&entry) {
                list.push(entry);
            }
        }
        Self(list)
    }

    /// A new list with `city` moved (or inserted) to the front.
    pub fn with_front(&self, city: &str) -> Self {
        Self::from_entries(
            std::iter::once(city).chain(self.0.iter().map(String::as_str).filter(|s| *s != city)),
        )
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Reads and writes [`RecentSearches`] through a [`KeyValueStore`].
#[derive(Debug)]
pub struct RecentStore<S> {
    storage: S,
}

impl<S: KeyValueStore> RecentStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Stored list, or an empty one if nothing usable is stored.
    pub fn load(&self) -> RecentSearches {
        let raw = match self.storage.get(RECENT_SEARCHES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return RecentSearches::new(),
            Err(e) => {
                warn!(error = %format!("{e:#}"), "failed to read recent searches");
                return RecentSearches::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(entries) => RecentSearches::from_entries(entries),
            Err(e) => {
                warn!(error = %e, "ignoring malformed recent searches");
                RecentSearches::new()
            }
        }
    }

    /// Move `city` to the front of `current`, persist, and return the new list.
    ///
    /// A failed write is logged; the updated list is returned regardless.
    pub fn record(&self, city: &str, current: &RecentSearches) -> RecentSearches {
        let updated = current.with_front(city);

        let persisted = serde_json::to_string(&updated)
            .map_err(anyhow::Error::from)
            .and_then(|json| self.storage.set(RECENT_SEARCHES_KEY, &json));
        if let Err(e) = persisted {
            warn!(error = %format!("{e:#}"), "failed to persist recent searches");
        }

        updated
    }
}
