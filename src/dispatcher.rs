/// Named request/response messages between the popup and the background
use futures::lock::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coordinator::SortCoordinator;
use crate::error::SorterError;
use crate::host::{KeyValueStore, TabHost};
use crate::tab_data::{Tab, TabOpenTimes};

/// A message sent with `chrome.runtime.sendMessage`
///
/// On the wire: `{ "type": "CLOSE_TAB", "payload": 12 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    FetchTabs,
    LoadPriorityDomains,
    SavePriorityDomains(Vec<String>),
    SortTabsByDomain,
    SortNonPriorityTabsAlphabetically,
    SortNonPriorityTabsByOpenTime,
    CloseTab(i32),
    GetTabOpenTimes,
}

impl Request {
    pub const NAMES: [&'static str; 8] = [
        "FETCH_TABS",
        "LOAD_PRIORITY_DOMAINS",
        "SAVE_PRIORITY_DOMAINS",
        "SORT_TABS_BY_DOMAIN",
        "SORT_NON_PRIORITY_TABS_ALPHABETICALLY",
        "SORT_NON_PRIORITY_TABS_BY_OPEN_TIME",
        "CLOSE_TAB",
        "GET_TAB_OPEN_TIMES",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Request::FetchTabs => Self::NAMES[0],
            Request::LoadPriorityDomains => Self::NAMES[1],
            Request::SavePriorityDomains(_) => Self::NAMES[2],
            Request::SortTabsByDomain => Self::NAMES[3],
            Request::SortNonPriorityTabsAlphabetically => Self::NAMES[4],
            Request::SortNonPriorityTabsByOpenTime => Self::NAMES[5],
            Request::CloseTab(_) => Self::NAMES[6],
            Request::GetTabOpenTimes => Self::NAMES[7],
        }
    }

    /// Parse a raw message, telling unknown types apart from bad payloads.
    pub fn from_value(raw: Value) -> Result<Request, String> {
        let name = raw.get("type").and_then(Value::as_str).unwrap_or_default();
        if !Self::NAMES.contains(&name) {
            return Err(format!("Unknown request type: {}", name));
        }

        let name = name.to_string();
        serde_json::from_value(raw).map_err(|e| format!("Malformed {} request: {}", name, e))
    }
}

/// Reply to a `Request`; fields a request does not produce are omitted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tabs: Option<Vec<Tab>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_domains: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_open_times: Option<TabOpenTimes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn ok() -> Self {
        Response {
            success: true,
            ..Response::default()
        }
    }

    pub fn with_tabs(tabs: Vec<Tab>) -> Self {
        Response {
            tabs: Some(tabs),
            ..Response::ok()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Response {
            success: false,
            error: Some(error.into()),
            ..Response::default()
        }
    }
}

/// Routes requests to the coordinator one at a time
///
/// Requests queue on an async lock, so two sorts triggered back to back run
/// one after the other instead of interleaving their tab moves.
pub struct Dispatcher<H, S> {
    coordinator: Mutex<SortCoordinator<H, S>>,
}

impl<H: TabHost, S: KeyValueStore> Dispatcher<H, S> {
    pub fn new(coordinator: SortCoordinator<H, S>) -> Self {
        Dispatcher {
            coordinator: Mutex::new(coordinator),
        }
    }

    /// Handle a raw JSON message. Never fails: errors become `success: false`.
    pub async fn dispatch(&self, raw: Value) -> Response {
        match Request::from_value(raw) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                log::warn!("{}", e);
                Response::failure(e)
            }
        }
    }

    pub async fn handle(&self, request: Request) -> Response {
        let name = request.name();
        log::debug!("Handling {}", name);

        match self.run(request).await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("{} failed: {}", name, e);
                Response::failure(e.to_string())
            }
        }
    }

    async fn run(&self, request: Request) -> Result<Response, SorterError> {
        let mut coordinator = self.coordinator.lock().await;

        let response = match request {
            Request::FetchTabs => Response::with_tabs(coordinator.fetch_tabs().await?),
            Request::LoadPriorityDomains => Response {
                priority_domains: Some(coordinator.load_priority_domains().await?),
                ..Response::ok()
            },
            Request::SavePriorityDomains(domains) => {
                coordinator.save_priority_domains(&domains).await?;
                Response::ok()
            }
            Request::SortTabsByDomain => Response::with_tabs(coordinator.sort_tabs_by_domain().await?),
            Request::SortNonPriorityTabsAlphabetically => {
                Response::with_tabs(coordinator.sort_non_priority_alphabetically().await?)
            }
            Request::SortNonPriorityTabsByOpenTime => {
                Response::with_tabs(coordinator.sort_non_priority_by_open_time().await?)
            }
            Request::CloseTab(id) => Response::with_tabs(coordinator.close_and_refresh(id).await?),
            Request::GetTabOpenTimes => Response {
                tab_open_times: Some(coordinator.tab_open_times()),
                ..Response::ok()
            },
        };

        Ok(response)
    }

    /// Record tabs already open when the background starts.
    pub async fn observe_current_tabs(&self) -> Result<usize, SorterError> {
        self.coordinator.lock().await.observe_current_tabs().await
    }

    pub async fn record_tab_created(&self, id: i32) {
        self.coordinator.lock().await.record_tab_created(id);
    }

    pub async fn forget_tab(&self, id: i32) {
        self.coordinator.lock().await.forget_tab(id);
    }
}
