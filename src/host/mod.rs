//! Browser capabilities the coordinator depends on
//!
//! Both traits mirror the asynchronous `chrome.tabs` / `chrome.storage.local`
//! contracts. `chrome` talks to the real browser, `memory` is a deterministic
//! fake used by the tests.

pub mod chrome;
pub mod memory;

use serde_json::Value;

use crate::error::SorterError;
use crate::tab_data::Tab;

/// Tab enumeration and mutation for the current window
// Futures stay on the single WASM thread, so no Send bounds are needed.
#[allow(async_fn_in_trait)]
pub trait TabHost {
    /// Snapshot of the current window's tabs in on-screen order.
    async fn query_current_window(&self) -> Result<Vec<Tab>, SorterError>;

    /// Move a tab to `index`. A tab that no longer exists is not an error.
    async fn move_tab(&self, id: i32, index: usize) -> Result<(), SorterError>;

    /// Close a tab. Closing an already-closed tab is not an error.
    async fn close_tab(&self, id: i32) -> Result<(), SorterError>;

    /// Host clock in epoch milliseconds.
    fn now_ms(&self) -> f64;
}

/// Flat key-value persistence
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, SorterError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), SorterError>;
}
