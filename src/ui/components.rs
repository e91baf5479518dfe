/// Reusable UI components

use patternfly_yew::prelude::*;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::tab_data::{format_elapsed, Tab, TabOpenTimes};

#[derive(Properties, PartialEq)]
pub struct DomainSelectorProps {
    pub domains: Vec<String>,
    pub priority_domains: Vec<String>,
    pub on_toggle: Callback<(String, bool)>,
    #[prop_or(false)]
    pub disabled: bool,
}

/// Checkbox per known domain; selected domains show their precedence
#[function_component(DomainSelector)]
pub fn domain_selector(props: &DomainSelectorProps) -> Html {
    let summary = if props.priority_domains.is_empty() {
        "No priority domains selected".to_string()
    } else {
        props.priority_domains.join(", ")
    };

    html! {
        <div class="domain-selector">
            <h2 class="section-title">{"Select Domains to Prioritize"}</h2>
            <p class="selection-summary">{summary}</p>
            <ul class="domain-list">
                {for props.domains.iter().map(|domain| {
                    let rank = props.priority_domains.iter().position(|d| d == domain);
                    let onchange = {
                        let on_toggle = props.on_toggle.clone();
                        let domain = domain.clone();
                        Callback::from(move |e: Event| {
                            let input: HtmlInputElement = e.target_unchecked_into();
                            on_toggle.emit((domain.clone(), input.checked()));
                        })
                    };

                    html! {
                        <li key={domain.clone()} class="domain-item">
                            <label>
                                <input
                                    type="checkbox"
                                    checked={rank.is_some()}
                                    disabled={props.disabled}
                                    onchange={onchange}
                                />
                                <span class="domain-name">{domain}</span>
                                if let Some(rank) = rank {
                                    <span class="domain-rank">{format!("#{}", rank + 1)}</span>
                                }
                            </label>
                        </li>
                    }
                })}
            </ul>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SortingButtonsProps {
    pub on_sort_priority: Callback<MouseEvent>,
    pub on_sort_alphabetically: Callback<MouseEvent>,
    pub on_sort_open_time: Callback<MouseEvent>,
    pub on_refresh: Callback<MouseEvent>,
    #[prop_or(false)]
    pub disabled: bool,
}

#[function_component(SortingButtons)]
pub fn sorting_buttons(props: &SortingButtonsProps) -> Html {
    html! {
        <div class="flex-column-gap">
            <Button onclick={props.on_sort_priority.clone()} disabled={props.disabled} variant={ButtonVariant::Secondary} block={true}>
                {"Sort Priority Tabs"}
            </Button>
            <Button onclick={props.on_sort_alphabetically.clone()} disabled={props.disabled} variant={ButtonVariant::Secondary} block={true}>
                {"Sort Non-Priority Tabs (A-Z)"}
            </Button>
            <Button onclick={props.on_sort_open_time.clone()} disabled={props.disabled} variant={ButtonVariant::Secondary} block={true}>
                {"Sort Non-Priority Tabs (Oldest First)"}
            </Button>
            <Button onclick={props.on_refresh.clone()} disabled={props.disabled} variant={ButtonVariant::Secondary} block={true}>
                {"Refresh Tabs"}
            </Button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct TabListProps {
    pub tabs: Vec<Tab>,
    pub open_times: TabOpenTimes,
    pub now: f64,
    pub on_close: Callback<i32>,
}

#[function_component(TabList)]
pub fn tab_list(props: &TabListProps) -> Html {
    html! {
        <ul class="tab-list">
            {for props.tabs.iter().enumerate().map(|(i, tab)| {
                let key = match tab.id {
                    Some(id) => id.to_string(),
                    None => format!("unaddressable-{}", i),
                };
                let duration = tab
                    .id
                    .and_then(|id| props.open_times.get(&id))
                    .map(|opened_at| format_elapsed(*opened_at, props.now))
                    .unwrap_or_else(|| "no duration recorded".to_string());

                html! {
                    <li key={key} class="tab-item">
                        if let Some(icon) = &tab.fav_icon_url {
                            <img class="tab-icon" src={icon.clone()} alt="Tab icon" />
                        }
                        <div class="tab-text">
                            <span class="tab-title">{&tab.title}</span>
                            <span class="tab-url">{&tab.url}</span>
                            <span class="tab-duration">{duration}</span>
                        </div>
                        if let Some(id) = tab.id {
                            <button
                                class="tab-close"
                                title="Close tab"
                                onclick={props.on_close.reform(move |_: MouseEvent| id)}
                            >
                                {"✕"}
                            </button>
                        }
                    </li>
                }
            })}
        </ul>
    }
}
