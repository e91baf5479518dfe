/// Priority-domain persistence on top of `chrome.storage.local`
use std::collections::HashSet;

use serde_json::Value;

use crate::error::SorterError;
use crate::host::KeyValueStore;

/// The only key this extension writes
pub const PRIORITY_DOMAINS_KEY: &str = "priorityDomains";

/// Ordered list of priority domains, replaced wholesale on every save
#[derive(Debug, Clone)]
pub struct PriorityStore<S> {
    storage: S,
}

impl<S: KeyValueStore> PriorityStore<S> {
    pub fn new(storage: S) -> Self {
        PriorityStore { storage }
    }

    /// Saved domains, or an empty list on first run.
    pub async fn load(&self) -> Result<Vec<String>, SorterError> {
        match self.storage.get(PRIORITY_DOMAINS_KEY).await? {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }

    /// Like `load`, but an unreadable store counts as "no priorities".
    pub async fn load_or_default(&self) -> Vec<String> {
        self.load().await.unwrap_or_else(|e| {
            log::warn!("Treating priority domains as empty: {}", e);
            Vec::new()
        })
    }

    /// Replace the saved list. Duplicates keep their first position.
    pub async fn save(&self, domains: &[String]) -> Result<(), SorterError> {
        let domains = dedup_domains(domains);
        self.storage
            .set(PRIORITY_DOMAINS_KEY, serde_json::to_value(&domains)?)
            .await
    }
}

fn dedup_domains(domains: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    domains
        .iter()
        .filter(|domain| seen.insert(domain.as_str()))
        .cloned()
        .collect()
}
