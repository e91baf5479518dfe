/// Tab operations: priority classification and ordering
use std::cmp::Ordering;

use crate::domain::extract_domain;
use crate::tab_data::{Tab, TabOpenTimes};

/// Tabs split by whether their domain is a priority domain
///
/// Both halves keep the order the tabs had in the snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classified {
    pub priority: Vec<Tab>,
    pub non_priority: Vec<Tab>,
}

impl Classified {
    /// Priority tabs followed by `non_priority` as given.
    pub fn concat(self) -> Vec<Tab> {
        let mut ordered = self.priority;
        ordered.extend(self.non_priority);
        ordered
    }
}

fn is_priority(domain: &str, priority_domains: &[String]) -> bool {
    !domain.is_empty() && priority_domains.iter().any(|d| d == domain)
}

/// Partition tabs into priority and non-priority
pub fn classify(tabs: &[Tab], priority_domains: &[String]) -> Classified {
    let (priority, non_priority): (Vec<Tab>, Vec<Tab>) = tabs
        .iter()
        .cloned()
        .partition(|tab| is_priority(&extract_domain(&tab.url), priority_domains));

    Classified {
        priority,
        non_priority,
    }
}

/// Sort tabs by the position of their domain in `priority_domains`
///
/// Tabs whose domain is not a priority sort after all of them. The sort is
/// stable, so equal keys keep snapshot order.
pub fn order_by_domain_priority(tabs: &[Tab], priority_domains: &[String]) -> Vec<Tab> {
    let mut keyed: Vec<(usize, Tab)> = tabs
        .iter()
        .map(|tab| {
            let domain = extract_domain(&tab.url);
            let rank = if domain.is_empty() {
                usize::MAX
            } else {
                priority_domains
                    .iter()
                    .position(|d| *d == domain)
                    .unwrap_or(usize::MAX)
            };
            (rank, tab.clone())
        })
        .collect();

    keyed.sort_by_key(|(rank, _)| *rank);

    keyed.into_iter().map(|(_, tab)| tab).collect()
}

/// Keep priority tabs first in snapshot order, then the rest A-Z by domain
pub fn order_non_priority_alphabetically(tabs: &[Tab], priority_domains: &[String]) -> Vec<Tab> {
    let mut classified = classify(tabs, priority_domains);

    let mut keyed: Vec<(String, Tab)> = classified
        .non_priority
        .drain(..)
        .map(|tab| (extract_domain(&tab.url), tab))
        .collect();
    keyed.sort_by(|a, b| locale_compare(&a.0, &b.0));

    classified.non_priority = keyed.into_iter().map(|(_, tab)| tab).collect();
    classified.concat()
}

/// Keep priority tabs first in snapshot order, then the rest oldest-first
///
/// Tabs with no recorded open time go last, in snapshot order.
pub fn order_non_priority_by_open_time(
    tabs: &[Tab],
    priority_domains: &[String],
    open_times: &TabOpenTimes,
) -> Vec<Tab> {
    let mut classified = classify(tabs, priority_domains);

    classified.non_priority.sort_by(|a, b| {
        let a_time = a.id.and_then(|id| open_times.get(&id));
        let b_time = b.id.and_then(|id| open_times.get(&id));

        match (a_time, b_time) {
            (Some(a), Some(b)) => a.total_cmp(b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });

    classified.concat()
}

/// Case-insensitive comparison, falling back to code points on ties
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
