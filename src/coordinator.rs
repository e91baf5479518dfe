/// Background coordinator: priority domains, sorting and closing tabs
use crate::error::SorterError;
use crate::host::{KeyValueStore, TabHost};
use crate::operations::{
    order_by_domain_priority, order_non_priority_alphabetically, order_non_priority_by_open_time,
};
use crate::storage::PriorityStore;
use crate::tab_data::{OpenTimeTracker, Tab, TabOpenTimes};

/// Orchestrates the priority store and the tab host
///
/// Nothing about the window is cached between calls: every operation starts
/// from a fresh snapshot. The only state kept is when each tab was first seen.
pub struct SortCoordinator<H, S> {
    host: H,
    store: PriorityStore<S>,
    open_times: OpenTimeTracker,
}

impl<H: TabHost, S: KeyValueStore> SortCoordinator<H, S> {
    pub fn new(host: H, storage: S) -> Self {
        SortCoordinator {
            host,
            store: PriorityStore::new(storage),
            open_times: OpenTimeTracker::new(),
        }
    }

    /// Current window snapshot. Tabs seen for the first time get an open time.
    pub async fn fetch_tabs(&mut self) -> Result<Vec<Tab>, SorterError> {
        let tabs = self.host.query_current_window().await?;
        self.open_times.observe(&tabs, self.host.now_ms());
        Ok(tabs)
    }

    pub async fn load_priority_domains(&self) -> Result<Vec<String>, SorterError> {
        self.store.load().await
    }

    pub async fn save_priority_domains(&self, domains: &[String]) -> Result<(), SorterError> {
        self.store.save(domains).await?;
        log::info!("Saved {} priority domains", domains.len());
        Ok(())
    }

    /// Priority tabs first, in priority-list order; everything else after.
    pub async fn sort_tabs_by_domain(&mut self) -> Result<Vec<Tab>, SorterError> {
        let tabs = self.fetch_tabs().await?;
        let priority_domains = self.store.load_or_default().await;

        let ordered = order_by_domain_priority(&tabs, &priority_domains);
        self.apply_order(&ordered).await?;
        Ok(ordered)
    }

    /// Priority tabs first as they are, then the rest A-Z by domain.
    pub async fn sort_non_priority_alphabetically(&mut self) -> Result<Vec<Tab>, SorterError> {
        let tabs = self.fetch_tabs().await?;
        let priority_domains = self.store.load_or_default().await;

        let ordered = order_non_priority_alphabetically(&tabs, &priority_domains);
        self.apply_order(&ordered).await?;
        Ok(ordered)
    }

    /// Priority tabs first as they are, then the rest oldest-first.
    pub async fn sort_non_priority_by_open_time(&mut self) -> Result<Vec<Tab>, SorterError> {
        let tabs = self.fetch_tabs().await?;
        let priority_domains = self.store.load_or_default().await;

        let ordered = order_non_priority_by_open_time(&tabs, &priority_domains, self.open_times.times());
        self.apply_order(&ordered).await?;
        Ok(ordered)
    }

    /// Move every tab to its position in `ordered`
    ///
    /// Not transactional: a rejected move stops the batch and leaves the window
    /// partially reordered. Running the sort again recovers.
    pub async fn apply_order(&self, ordered: &[Tab]) -> Result<(), SorterError> {
        for (index, tab) in ordered.iter().enumerate() {
            if let Some(id) = tab.id {
                self.host.move_tab(id, index).await?;
            }
        }

        log::info!("Applied order to {} tabs", ordered.len());
        Ok(())
    }

    /// Close a tab and return the window as it is afterwards.
    pub async fn close_and_refresh(&mut self, id: i32) -> Result<Vec<Tab>, SorterError> {
        self.host.close_tab(id).await?;
        self.open_times.forget(id);
        self.fetch_tabs().await
    }

    pub fn tab_open_times(&self) -> TabOpenTimes {
        self.open_times.times().clone()
    }

    /// Record every tab already open, e.g. when the background starts.
    pub async fn observe_current_tabs(&mut self) -> Result<usize, SorterError> {
        let tabs = self.fetch_tabs().await?;
        Ok(tabs.len())
    }

    pub fn record_tab_created(&mut self, id: i32) {
        let now = self.host.now_ms();
        self.open_times.record(id, now);
    }

    pub fn forget_tab(&mut self, id: i32) {
        self.open_times.forget(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::{HostCall, MemoryStorage, MemoryTabs};
    use crate::storage::PRIORITY_DOMAINS_KEY;
    use futures::executor::block_on;
    use serde_json::json;

    fn setup(urls: &[&str], priority: &[&str]) -> (SortCoordinator<MemoryTabs, MemoryStorage>, MemoryTabs) {
        let host = MemoryTabs::with_urls(urls);
        let storage = MemoryStorage::new();
        storage.put_raw(PRIORITY_DOMAINS_KEY, json!(priority));
        (SortCoordinator::new(host.clone(), storage), host)
    }

    #[test]
    fn test_sort_tabs_by_domain() {
        let (mut coordinator, host) = setup(&["https://b.com/1", "https://a.com", "https://b.com/2"], &["b.com"]);

        let ordered = block_on(coordinator.sort_tabs_by_domain()).unwrap();

        assert_eq!(ordered.iter().map(|t| t.id).collect::<Vec<_>>(), vec![Some(1), Some(3), Some(2)]);
        assert_eq!(host.ids(), vec![Some(1), Some(3), Some(2)]);
    }

    #[test]
    fn test_sort_non_priority_alphabetically() {
        let (mut coordinator, host) = setup(&["https://z.com", "https://x.com", "https://y.com"], &["x.com"]);

        block_on(coordinator.sort_non_priority_alphabetically()).unwrap();

        assert_eq!(host.ids(), vec![Some(2), Some(3), Some(1)]);
    }

    #[test]
    fn test_sort_is_idempotent_on_window() {
        let (mut coordinator, host) = setup(&["https://c.com", "https://a.com", "https://b.com"], &["b.com"]);

        block_on(coordinator.sort_non_priority_alphabetically()).unwrap();
        let first = host.ids();
        block_on(coordinator.sort_non_priority_alphabetically()).unwrap();

        assert_eq!(host.ids(), first);
    }

    #[test]
    fn test_sort_non_priority_by_open_time() {
        let (mut coordinator, host) = setup(&["https://a.com", "https://b.com"], &[]);
        host.set_now(1000.0);
        block_on(coordinator.observe_current_tabs()).unwrap();

        host.set_now(2000.0);
        host.open(Tab::new(3, "https://c.com", "C"));
        coordinator.record_tab_created(3);
        // Tab 1 reopened later: forget and record it again.
        coordinator.forget_tab(1);
        host.set_now(3000.0);
        coordinator.record_tab_created(1);

        block_on(coordinator.sort_non_priority_by_open_time()).unwrap();

        assert_eq!(host.ids(), vec![Some(2), Some(3), Some(1)]);
    }

    #[test]
    fn test_sort_with_unavailable_storage_uses_no_priorities() {
        let host = MemoryTabs::with_urls(&["https://b.com", "https://a.com"]);
        let storage = MemoryStorage::new();
        storage.set_unavailable(true);
        let mut coordinator = SortCoordinator::new(host.clone(), storage);

        let ordered = block_on(coordinator.sort_non_priority_alphabetically()).unwrap();

        assert_eq!(ordered.iter().map(|t| t.id).collect::<Vec<_>>(), vec![Some(2), Some(1)]);
    }

    #[test]
    fn test_apply_order_issues_moves_in_index_order() {
        let (coordinator, host) = setup(&["https://a.com", "https://b.com"], &[]);
        let mut unaddressable = Tab::new(0, "https://devtools.com", "DevTools");
        unaddressable.id = None;
        let ordered = vec![Tab::new(2, "https://b.com", "B"), unaddressable, Tab::new(1, "https://a.com", "A")];

        block_on(coordinator.apply_order(&ordered)).unwrap();

        assert_eq!(
            host.calls(),
            vec![HostCall::Move { id: 2, index: 0 }, HostCall::Move { id: 1, index: 2 }]
        );
    }

    #[test]
    fn test_apply_order_stops_on_rejected_move() {
        let (mut coordinator, host) = setup(&["https://c.com", "https://b.com", "https://a.com"], &[]);
        host.reject_moves_after(1);

        let result = block_on(coordinator.sort_non_priority_alphabetically());

        assert!(matches!(result, Err(SorterError::TabHost(_))));
        // Only the first move landed.
        assert_eq!(host.ids(), vec![Some(3), Some(1), Some(2)]);
    }

    #[test]
    fn test_close_and_refresh() {
        let (mut coordinator, host) = setup(&["https://a.com", "https://b.com"], &[]);
        block_on(coordinator.fetch_tabs()).unwrap();

        let tabs = block_on(coordinator.close_and_refresh(1)).unwrap();

        assert_eq!(tabs.len(), 1);
        assert_eq!(host.ids(), vec![Some(2)]);
        assert!(!coordinator.tab_open_times().contains_key(&1));
    }

    #[test]
    fn test_close_unknown_tab() {
        let (mut coordinator, host) = setup(&["https://a.com", "https://b.com"], &[]);

        let tabs = block_on(coordinator.close_and_refresh(42)).unwrap();

        assert_eq!(tabs, host.tabs());
        assert_eq!(tabs.len(), 2);
    }

    #[test]
    fn test_fetch_records_open_times_once() {
        let (mut coordinator, host) = setup(&["https://a.com"], &[]);
        host.set_now(100.0);
        block_on(coordinator.fetch_tabs()).unwrap();
        host.set_now(900.0);
        block_on(coordinator.fetch_tabs()).unwrap();

        assert_eq!(coordinator.tab_open_times(), TabOpenTimes::from([(1, 100.0)]));
    }

    #[test]
    fn test_save_then_load_priority_domains() {
        let (coordinator, _host) = setup(&[], &[]);
        let saved = vec!["b.com".to_string(), "a.com".to_string()];

        block_on(coordinator.save_priority_domains(&saved)).unwrap();

        assert_eq!(block_on(coordinator.load_priority_domains()).unwrap(), saved);
    }
}
