/// In-memory capabilities for tests
///
/// Clones share state, so a test can hand one clone to the coordinator and keep
/// another to inspect what happened.
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use serde_json::Value;

use super::{KeyValueStore, TabHost};
use crate::error::SorterError;
use crate::tab_data::Tab;

/// A host call as observed by `MemoryTabs`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Query,
    Move { id: i32, index: usize },
    Close { id: i32 },
}

#[derive(Debug, Default)]
struct TabsState {
    tabs: Vec<Tab>,
    calls: Vec<HostCall>,
    now: f64,
    reject_moves_after: Option<usize>,
    yield_on_move: bool,
}

/// Fake current window
#[derive(Debug, Clone, Default)]
pub struct MemoryTabs {
    state: Rc<RefCell<TabsState>>,
}

impl MemoryTabs {
    pub fn new(tabs: Vec<Tab>) -> Self {
        let fake = Self::default();
        fake.state.borrow_mut().tabs = tabs;
        fake.reindex();
        fake
    }

    /// Window built from URLs; ids are 1-based positions.
    pub fn with_urls(urls: &[&str]) -> Self {
        Self::new(
            urls.iter()
                .enumerate()
                .map(|(i, url)| Tab::new(i as i32 + 1, url, &format!("Tab {}", i + 1)))
                .collect(),
        )
    }

    pub fn tabs(&self) -> Vec<Tab> {
        self.state.borrow().tabs.clone()
    }

    pub fn ids(&self) -> Vec<Option<i32>> {
        self.state.borrow().tabs.iter().map(|tab| tab.id).collect()
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Open a tab outside of the coordinator's control.
    pub fn open(&self, tab: Tab) {
        self.state.borrow_mut().tabs.push(tab);
        self.reindex();
    }

    pub fn set_now(&self, now: f64) {
        self.state.borrow_mut().now = now;
    }

    /// Accept `count` more moves, then reject every following one.
    pub fn reject_moves_after(&self, count: usize) {
        self.state.borrow_mut().reject_moves_after = Some(count);
    }

    /// Suspend once before every move, like a real host round-trip.
    pub fn yield_on_move(&self, enabled: bool) {
        self.state.borrow_mut().yield_on_move = enabled;
    }

    fn reindex(&self) {
        for (i, tab) in self.state.borrow_mut().tabs.iter_mut().enumerate() {
            tab.index = i as i32;
        }
    }
}

impl TabHost for MemoryTabs {
    async fn query_current_window(&self) -> Result<Vec<Tab>, SorterError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(HostCall::Query);
        Ok(state.tabs.clone())
    }

    async fn move_tab(&self, id: i32, index: usize) -> Result<(), SorterError> {
        let should_yield = self.state.borrow().yield_on_move;
        if should_yield {
            YieldNow::default().await;
        }

        {
            let mut state = self.state.borrow_mut();
            state.calls.push(HostCall::Move { id, index });

            if let Some(remaining) = state.reject_moves_after.as_mut() {
                if *remaining == 0 {
                    return Err(SorterError::TabHost("Tabs cannot be edited right now".to_string()));
                }
                *remaining -= 1;
            }

            if let Some(from) = state.tabs.iter().position(|tab| tab.id == Some(id)) {
                let tab = state.tabs.remove(from);
                let to = index.min(state.tabs.len());
                state.tabs.insert(to, tab);
            }
        }

        self.reindex();
        Ok(())
    }

    async fn close_tab(&self, id: i32) -> Result<(), SorterError> {
        {
            let mut state = self.state.borrow_mut();
            state.calls.push(HostCall::Close { id });
            state.tabs.retain(|tab| tab.id != Some(id));
        }

        self.reindex();
        Ok(())
    }

    fn now_ms(&self) -> f64 {
        self.state.borrow().now
    }
}

/// Fake `chrome.storage.local`
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Rc<RefCell<HashMap<String, Value>>>,
    unavailable: Rc<Cell<bool>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<Value> {
        self.values.borrow().get(key).cloned()
    }

    pub fn put_raw(&self, key: &str, value: Value) {
        self.values.borrow_mut().insert(key.to_string(), value);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    fn check_available(&self) -> Result<(), SorterError> {
        if self.unavailable.get() {
            Err(SorterError::StorageUnavailable("storage is offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, SorterError> {
        self.check_available()?;
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), SorterError> {
        self.check_available()?;
        self.put_raw(key, value);
        Ok(())
    }
}

/// Returns `Pending` once, then completes
#[derive(Debug, Default)]
struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}
