/// Entry points for the extension's background service worker
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::coordinator::SortCoordinator;
use crate::dispatcher::{Dispatcher, Response};
use crate::host::chrome::{ChromeStorage, ChromeTabs};

type BackgroundDispatcher = Dispatcher<ChromeTabs, ChromeStorage>;

thread_local! {
    static DISPATCHER: Rc<BackgroundDispatcher> =
        Rc::new(Dispatcher::new(SortCoordinator::new(ChromeTabs, ChromeStorage)));
}

fn dispatcher() -> Rc<BackgroundDispatcher> {
    DISPATCHER.with(Rc::clone)
}

/// Record the tabs that were already open when the worker started
#[wasm_bindgen]
pub async fn start_background() {
    match dispatcher().observe_current_tabs().await {
        Ok(count) => log::info!("Tab Sorter background started with {} tabs", count),
        Err(e) => log::warn!("Could not record open tabs: {}", e),
    }
}

/// Handle one `chrome.runtime.onMessage` request and return its response
#[wasm_bindgen]
pub async fn handle_message(request: JsValue) -> JsValue {
    let response = match serde_wasm_bindgen::from_value(request) {
        Ok(raw) => dispatcher().dispatch(raw).await,
        Err(e) => Response::failure(format!("Malformed request: {}", e)),
    };

    // Through serde_json first so integer map keys become object keys.
    serde_json::to_value(&response)
        .map_err(|e| e.to_string())
        .and_then(|value| {
            value
                .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
                .map_err(|e| e.to_string())
        })
        .unwrap_or_else(|e| {
            log::error!("Failed to serialize response: {}", e);
            JsValue::NULL
        })
}

#[wasm_bindgen]
pub async fn on_tab_created(tab_id: i32) {
    dispatcher().record_tab_created(tab_id).await;
}

#[wasm_bindgen]
pub async fn on_tab_removed(tab_id: i32) {
    dispatcher().forget_tab(tab_id).await;
}
