/// Data structures for Tab Sorter
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot of a browser tab, shaped like `chrome.tabs.Tab`
///
/// `id` is absent for tabs the browser does not let extensions address
/// (devtools windows, some prerendered pages).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(default)]
    pub index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_id: Option<i32>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
    #[serde(default)]
    pub pinned: bool,
}

impl Tab {
    pub fn new(id: i32, url: &str, title: &str) -> Tab {
        Tab {
            id: Some(id),
            url: url.to_string(),
            title: title.to_string(),
            ..Tab::default()
        }
    }
}

/// Tab id -> epoch milliseconds when the tab was first observed
pub type TabOpenTimes = BTreeMap<i32, f64>;

/// Process-lifetime record of when each tab was first seen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpenTimeTracker {
    times: TabOpenTimes,
}

impl OpenTimeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `at` for `id` unless a time is already known.
    pub fn record(&mut self, id: i32, at: f64) {
        self.times.entry(id).or_insert(at);
    }

    /// Record `at` for every addressable tab not seen before.
    pub fn observe(&mut self, tabs: &[Tab], at: f64) {
        for id in tabs.iter().filter_map(|tab| tab.id) {
            self.record(id, at);
        }
    }

    pub fn forget(&mut self, id: i32) -> bool {
        self.times.remove(&id).is_some()
    }

    pub fn get(&self, id: i32) -> Option<f64> {
        self.times.get(&id).copied()
    }

    pub fn times(&self) -> &TabOpenTimes {
        &self.times
    }
}

/// Format the time since `opened_at` the way the popup shows it:
/// `"2d 3h"`, `"4h 12m"`, `"7m 30s"` or `"45s"`.
pub fn format_elapsed(opened_at: f64, now: f64) -> String {
    let total_seconds = ((now - opened_at).max(0.0) / 1000.0).floor() as u64;

    let seconds = total_seconds % 60;
    let minutes = (total_seconds / 60) % 60;
    let hours = (total_seconds / 3600) % 24;
    let days = total_seconds / 86_400;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
