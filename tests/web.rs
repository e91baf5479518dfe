//! Browser tests, run with `wasm-pack test --headless --chrome`
#![cfg(target_arch = "wasm32")]

use serde::Serialize;
use tab_sorter::dispatcher::{Request, Response};
use tab_sorter::tab_data::Tab;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn extract_domain_export() {
    assert_eq!(tab_sorter::extract_domain("https://www.rust-lang.org/learn"), "www.rust-lang.org");
    assert_eq!(tab_sorter::extract_domain("not a url"), "");
}

#[wasm_bindgen_test]
fn request_from_js_object() {
    let request = js_sys::JSON::parse(r#"{"type":"CLOSE_TAB","payload":7}"#).unwrap();

    let raw: serde_json::Value = serde_wasm_bindgen::from_value(request).unwrap();

    assert_eq!(Request::from_value(raw), Ok(Request::CloseTab(7)));
}

#[wasm_bindgen_test]
fn chrome_tab_from_js_object() {
    let tab = js_sys::JSON::parse(
        r#"{"id":3,"index":0,"windowId":1,"title":"Docs","url":"https://docs.rs/","favIconUrl":"https://docs.rs/favicon.ico","active":true}"#,
    )
    .unwrap();

    let tab: Tab = serde_wasm_bindgen::from_value(tab).unwrap();

    assert_eq!(tab.id, Some(3));
    assert_eq!(tab.fav_icon_url.as_deref(), Some("https://docs.rs/favicon.ico"));
}

#[wasm_bindgen_test]
fn response_with_open_times_survives_js() {
    let response = Response {
        tab_open_times: Some([(4, 1_700_000_000_000.0)].into_iter().collect()),
        ..Response::ok()
    };

    let js: JsValue = serde_json::to_value(&response)
        .unwrap()
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap();
    let raw: serde_json::Value = serde_wasm_bindgen::from_value(js).unwrap();
    let back: Response = serde_json::from_value(raw).unwrap();

    assert_eq!(back, response);
}
