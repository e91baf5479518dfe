/// Chrome extension adapter over `chrome.tabs` and `chrome.storage.local`
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

use super::{KeyValueStore, TabHost};
use crate::error::SorterError;
use crate::tab_data::Tab;

// Import JS bridge functions
#[wasm_bindgen(module = "/js/host.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn queryCurrentWindowTabs() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn moveTab(tab_id: i32, index: u32) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeTab(tab_id: i32) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;
}

/// `chrome.tabs`, scoped to the current window
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeTabs;

impl TabHost for ChromeTabs {
    async fn query_current_window(&self) -> Result<Vec<Tab>, SorterError> {
        let tabs_js = queryCurrentWindowTabs()
            .await
            .map_err(|e| SorterError::TabHost(js_error_message(&e)))?;

        serde_wasm_bindgen::from_value(tabs_js)
            .map_err(|e| SorterError::Serialization(format!("Failed to parse tabs: {}", e)))
    }

    async fn move_tab(&self, id: i32, index: usize) -> Result<(), SorterError> {
        let index = u32::try_from(index)
            .map_err(|_| SorterError::TabHost(format!("Tab index out of range: {}", index)))?;

        match moveTab(id, index).await {
            Ok(()) => Ok(()),
            Err(e) => absorb_stale_tab(id, js_error_message(&e)),
        }
    }

    async fn close_tab(&self, id: i32) -> Result<(), SorterError> {
        match removeTab(id).await {
            Ok(()) => Ok(()),
            Err(e) => absorb_stale_tab(id, js_error_message(&e)),
        }
    }

    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

/// `chrome.storage.local`
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeStorage;

impl KeyValueStore for ChromeStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, SorterError> {
        let value_js = getStorage(key)
            .await
            .map_err(|e| SorterError::StorageUnavailable(js_error_message(&e)))?;

        if value_js.is_null() || value_js.is_undefined() {
            return Ok(None);
        }

        serde_wasm_bindgen::from_value(value_js)
            .map(Some)
            .map_err(|e| SorterError::Serialization(format!("Failed to parse {}: {}", key, e)))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), SorterError> {
        let value_js = value
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| SorterError::Serialization(format!("Failed to serialize {}: {}", key, e)))?;

        setStorage(key, value_js)
            .await
            .map_err(|e| SorterError::StorageUnavailable(js_error_message(&e)))
    }
}

/// Chrome rejects moves and closes of vanished tabs with "No tab with id: N."
pub fn is_stale_tab_error(message: &str) -> bool {
    message.contains("No tab with id")
}

fn absorb_stale_tab(id: i32, message: String) -> Result<(), SorterError> {
    if is_stale_tab_error(&message) {
        log::debug!("Tab {} is gone, ignoring: {}", id, message);
        Ok(())
    } else {
        Err(SorterError::TabHost(message))
    }
}

fn js_error_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }

    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
