/// Domain extraction and priority-domain selection for Tab Sorter
use std::collections::HashSet;

use url::Url;

use crate::tab_data::Tab;

/// Extract the host of a URL, or `""` when there is none
///
/// The host is returned exactly as the WHATWG URL parser normalizes it, so
/// `https://WWW.Example.com/path` yields `www.example.com`. Anything that does
/// not parse as an absolute URL with a host (empty strings, relative paths,
/// `about:blank`, `data:` URLs) yields the empty string, which callers treat as
/// "no domain".
///
/// Examples:
/// - https://www.google.com/search → www.google.com
/// - http://localhost:3000 → localhost
/// - not-a-url → ""
pub fn extract_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .unwrap_or_default()
}

/// Non-empty domains of `tabs`, in the order they are first seen
pub fn distinct_domains(tabs: &[Tab]) -> Vec<String> {
    let mut seen = HashSet::new();

    tabs.iter()
        .map(|tab| extract_domain(&tab.url))
        .filter(|domain| !domain.is_empty())
        .filter(|domain| seen.insert(domain.clone()))
        .collect()
}

/// Domains offered for selection: everything open right now, followed by saved
/// priority domains that no open tab matches.
pub fn known_domains(tabs: &[Tab], priority_domains: &[String]) -> Vec<String> {
    let mut domains = distinct_domains(tabs);
    let mut seen: HashSet<String> = domains.iter().cloned().collect();

    for domain in priority_domains {
        if !domain.is_empty() && seen.insert(domain.clone()) {
            domains.push(domain.clone());
        }
    }

    domains
}

/// Apply a single checkbox change to the priority list
///
/// Newly selected domains go to the end, so the order in which the user picks
/// domains becomes their sort precedence.
pub fn toggle_priority(current: &[String], domain: &str, selected: bool) -> Vec<String> {
    let mut next: Vec<String> = current.iter().filter(|d| d.as_str() != domain).cloned().collect();

    if selected {
        match current.iter().position(|d| d == domain) {
            Some(pos) => next.insert(pos, domain.to_string()),
            None => next.push(domain.to_string()),
        }
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tabs(urls: &[&str]) -> Vec<Tab> {
        urls.iter()
            .enumerate()
            .map(|(i, url)| Tab::new(i as i32, url, "Tab"))
            .collect()
    }

    #[test]
    fn test_extract_domain_basic() {
        assert_eq!(extract_domain("https://www.google.com"), "www.google.com");
        assert_eq!(extract_domain("https://google.com"), "google.com");
        assert_eq!(extract_domain("http://google.com"), "google.com");
    }

    #[test]
    fn test_extract_domain_keeps_subdomains() {
        assert_eq!(extract_domain("https://ai.microsoft.com"), "ai.microsoft.com");
        assert_eq!(extract_domain("https://news.bbc.co.uk/article"), "news.bbc.co.uk");
    }

    #[test]
    fn test_extract_domain_with_path_and_port() {
        assert_eq!(extract_domain("https://www.google.com/search?q=rust"), "www.google.com");
        assert_eq!(extract_domain("http://localhost:3000/app"), "localhost");
        assert_eq!(extract_domain("http://127.0.0.1:8080"), "127.0.0.1");
    }

    #[test]
    fn test_extract_domain_normalizes_case() {
        assert_eq!(extract_domain("HTTPS://WWW.Example.COM/Path"), "www.example.com");
    }

    #[test]
    fn test_extract_domain_edge_cases() {
        assert_eq!(extract_domain(""), "");
        assert_eq!(extract_domain("not-a-url"), "");
        assert_eq!(extract_domain("/relative/path"), "");
        assert_eq!(extract_domain("https://"), "");
        assert_eq!(extract_domain("about:blank"), "");
        assert_eq!(extract_domain("data:text/plain,hello"), "");
    }

    #[test]
    fn test_extract_domain_browser_pages() {
        assert_eq!(extract_domain("chrome://extensions/"), "extensions");
        assert_eq!(extract_domain("chrome-extension://abcdef/popup.html"), "abcdef");
    }

    #[test]
    fn test_distinct_domains() {
        let tabs = tabs(&[
            "https://b.com/1",
            "not a url",
            "https://a.com",
            "https://b.com/2",
        ]);

        assert_eq!(distinct_domains(&tabs), vec!["b.com", "a.com"]);
    }

    #[test]
    fn test_known_domains_keeps_stale_priorities() {
        let tabs = tabs(&["https://a.com", "https://b.com"]);
        let priority = vec!["b.com".to_string(), "gone.com".to_string()];

        assert_eq!(known_domains(&tabs, &priority), vec!["a.com", "b.com", "gone.com"]);
    }

    #[test]
    fn test_known_domains_without_tabs() {
        let priority = vec!["x.com".to_string()];

        assert_eq!(known_domains(&[], &priority), vec!["x.com"]);
    }

    #[test]
    fn test_toggle_priority_appends() {
        let current = vec!["a.com".to_string()];

        assert_eq!(toggle_priority(&current, "b.com", true), vec!["a.com", "b.com"]);
    }

    #[test]
    fn test_toggle_priority_removes() {
        let current = vec!["a.com".to_string(), "b.com".to_string(), "c.com".to_string()];

        assert_eq!(toggle_priority(&current, "b.com", false), vec!["a.com", "c.com"]);
    }

    #[test]
    fn test_toggle_priority_is_noop_for_existing_state() {
        let current = vec!["a.com".to_string(), "b.com".to_string()];

        assert_eq!(toggle_priority(&current, "a.com", true), current);
        assert_eq!(toggle_priority(&current, "z.com", false), current);
    }

    proptest! {
        #[test]
        fn extract_domain_never_panics(input in ".*") {
            let domain = extract_domain(&input);
            prop_assert!(!domain.contains('/'));
        }

        #[test]
        fn extract_domain_rejects_scheme_less_input(input in "[a-z0-9./ -]{0,40}") {
            prop_assert_eq!(extract_domain(&input), "");
        }
    }
}
