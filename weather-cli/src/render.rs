//! Plain-text rendering of dashboard state.

use chrono::Local;
use weatherdash_core::{Dashboard, KeyValueStore, Notification, RecentSearches, WeatherSnapshot};

const TITLE: &str = "Weather Dashboard";

/// The whole screen: title, recent searches, loading indicator or weather card.
pub fn dashboard<S: KeyValueStore>(dash: &Dashboard<S>) -> String {
    let mut out = format!("{TITLE}\n{}\n", "=".repeat(TITLE.len()));

    if let Some(line) = recent_line(dash.recent_searches()) {
        out.push_str(&line);
        out.push('\n');
    }

    if dash.is_loading() {
        out.push_str("\nLoading...\n");
    } else if let Some(snapshot) = dash.weather() {
        out.push('\n');
        out.push_str(&snapshot_card(snapshot));
    }

    out
}

/// Numbered recent entries on one line, or `None` when there are none.
pub fn recent_line(recent: &RecentSearches) -> Option<String> {
    if recent.is_empty() {
        return None;
    }

    let entries: Vec<String> = recent
        .iter()
        .enumerate()
        .map(|(i, city)| format!("[{}] {city}", i + 1))
        .collect();

    Some(format!("Recent: {}", entries.join("  ")))
}

pub fn recent_list(recent: &RecentSearches) -> String {
    if recent.is_empty() {
        return "No recent searches.\n".to_string();
    }

    recent
        .iter()
        .enumerate()
        .map(|(i, city)| format!("{}. {city}\n", i + 1))
        .collect()
}

pub fn snapshot_card(snapshot: &WeatherSnapshot) -> String {
    let mut lines = vec![
        snapshot.location_name.clone(),
        format!(
            "  {}°C  {}",
            snapshot.rounded_temperature(),
            capitalize_words(&snapshot.condition_description)
        ),
        format!("  Humidity:   {}%", snapshot.humidity_pct),
        format!("  Wind speed: {} m/s", snapshot.wind_speed),
    ];
    if let Some(url) = snapshot.icon_url() {
        lines.push(format!("  Icon:       {url}"));
    }
    if let Some(observed) = snapshot.observed_at {
        let local = observed.with_timezone(&Local);
        lines.push(format!("  Updated:    {}", local.format("%Y-%m-%d %H:%M")));
    }

    lines.join("\n") + "\n"
}

pub fn notification(n: &Notification) -> String {
    format!("{}: {}\n", n.title, n.message)
}

fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
