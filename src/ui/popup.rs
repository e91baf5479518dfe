/// Popup UI for Tab Sorter extension

use patternfly_yew::prelude::*;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::dispatcher::{Request, Response};
use crate::domain::{known_domains, toggle_priority};
use crate::tab_data::{Tab, TabOpenTimes};
use crate::ui::components::{DomainSelector, SortingButtons, TabList};

// Import JS bridge functions
#[wasm_bindgen(module = "/js/popup.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn sendMessage(request: JsValue) -> Result<JsValue, JsValue>;
}

#[derive(Clone, PartialEq)]
enum AppState {
    Idle,
    Loading(String),
    Error(String),
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| AppState::Idle);
    let tabs = use_state(Vec::<Tab>::new);
    let priority_domains = use_state(Vec::<String>::new);
    let open_times = use_state(TabOpenTimes::new);
    let now = use_state(js_sys::Date::now);

    // Load saved priorities and the current window on mount
    {
        let state = state.clone();
        let tabs = tabs.clone();
        let priority_domains = priority_domains.clone();
        let open_times = open_times.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match send(Request::LoadPriorityDomains).await {
                    Ok(response) => priority_domains.set(response.priority_domains.unwrap_or_default()),
                    Err(e) => log::warn!("Could not load priority domains: {}", e),
                }
                refresh(state, tabs, open_times).await;
            });
            || ()
        });
    }

    // Tick once a second so the open durations stay current
    {
        let now = now.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window();
            let tick = Closure::<dyn FnMut()>::new(move || now.set(js_sys::Date::now()));
            let handle = window.as_ref().and_then(|w| {
                w.set_interval_with_callback_and_timeout_and_arguments_0(tick.as_ref().unchecked_ref(), 1000)
                    .ok()
            });

            move || {
                if let (Some(w), Some(handle)) = (window, handle) {
                    w.clear_interval_with_handle(handle);
                }
                drop(tick);
            }
        });
    }

    let on_toggle_domain = {
        let priority_domains = priority_domains.clone();
        let state = state.clone();

        Callback::from(move |(domain, selected): (String, bool)| {
            let next = toggle_priority(&priority_domains, &domain, selected);
            priority_domains.set(next.clone());

            let state = state.clone();
            spawn_local(async move {
                match send(Request::SavePriorityDomains(next)).await {
                    Ok(_) => log::debug!("Priority domains saved"),
                    Err(e) => state.set(AppState::Error(format!("Failed to save: {}", e))),
                }
            });
        })
    };

    let sort_with = {
        let state = state.clone();
        let tabs = tabs.clone();
        move |request: Request, message: &'static str| {
            let state = state.clone();
            let tabs = tabs.clone();
            Callback::from(move |_: MouseEvent| {
                let state = state.clone();
                let tabs = tabs.clone();
                let request = request.clone();

                state.set(AppState::Loading(message.to_string()));

                spawn_local(async move {
                    match send(request).await {
                        Ok(response) => {
                            tabs.set(response.tabs.unwrap_or_default());
                            state.set(AppState::Idle);
                        }
                        Err(e) => state.set(AppState::Error(format!("Sort failed: {}", e))),
                    }
                });
            })
        }
    };

    let on_refresh = {
        let state = state.clone();
        let tabs = tabs.clone();
        let open_times = open_times.clone();

        Callback::from(move |_: MouseEvent| {
            let state = state.clone();
            let tabs = tabs.clone();
            let open_times = open_times.clone();
            spawn_local(refresh(state, tabs, open_times));
        })
    };

    let on_close = {
        let state = state.clone();
        let tabs = tabs.clone();

        Callback::from(move |tab_id: i32| {
            let state = state.clone();
            let tabs = tabs.clone();
            spawn_local(async move {
                match send(Request::CloseTab(tab_id)).await {
                    Ok(response) => tabs.set(response.tabs.unwrap_or_default()),
                    Err(e) => state.set(AppState::Error(format!("Failed to close tab: {}", e))),
                }
            });
        })
    };

    let is_busy = matches!(*state, AppState::Loading(_));
    let domains = known_domains(&tabs, &priority_domains);

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Tab Sorter"}</h1>

            <DomainSelector
                domains={domains}
                priority_domains={(*priority_domains).clone()}
                on_toggle={on_toggle_domain}
                disabled={is_busy}
            />

            <SortingButtons
                on_sort_priority={sort_with(Request::SortTabsByDomain, "Sorting priority tabs...")}
                on_sort_alphabetically={sort_with(Request::SortNonPriorityTabsAlphabetically, "Sorting tabs A-Z...")}
                on_sort_open_time={sort_with(Request::SortNonPriorityTabsByOpenTime, "Sorting tabs by age...")}
                on_refresh={on_refresh}
                disabled={is_busy}
            />

            // Status display
            {match &*state {
                AppState::Loading(msg) => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{msg}</p>
                    </div>
                },
                AppState::Error(err) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {err.clone()}
                        </Alert>
                    </div>
                },
                AppState::Idle => html! {}
            }}

            <h2 class="section-title">{format!("Open Tabs ({})", tabs.len())}</h2>
            <TabList
                tabs={(*tabs).clone()}
                open_times={(*open_times).clone()}
                now={*now}
                on_close={on_close}
            />

            <p class="footer-popup">
                {"Tab Sorter v0.1.0"}
            </p>
        </div>
    }
}

// Helper functions

async fn refresh(
    state: UseStateHandle<AppState>,
    tabs: UseStateHandle<Vec<Tab>>,
    open_times: UseStateHandle<TabOpenTimes>,
) {
    match send(Request::FetchTabs).await {
        Ok(response) => tabs.set(response.tabs.unwrap_or_default()),
        Err(e) => {
            state.set(AppState::Error(format!("Failed to get tabs: {}", e)));
            return;
        }
    }

    match send(Request::GetTabOpenTimes).await {
        Ok(response) => open_times.set(response.tab_open_times.unwrap_or_default()),
        Err(e) => log::warn!("Could not load tab open times: {}", e),
    }
}

/// Send a request to the background and unwrap its response
async fn send(request: Request) -> Result<Response, String> {
    let request_js = request
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| format!("Failed to serialize: {:?}", e))?;

    let response_js = sendMessage(request_js)
        .await
        .map_err(|e| format!("{} failed: {:?}", request.name(), e))?;

    // Through serde_json so object keys can become integer tab ids.
    let raw: serde_json::Value = serde_wasm_bindgen::from_value(response_js)
        .map_err(|e| format!("Failed to parse response: {:?}", e))?;
    let response: Response = serde_json::from_value(raw)
        .map_err(|e| format!("Failed to parse response: {}", e))?;

    if response.success {
        Ok(response)
    } else {
        Err(response.error.unwrap_or_else(|| format!("{} failed", request.name())))
    }
}
