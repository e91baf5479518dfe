/// Error types for Tab Sorter
use thiserror::Error;

/// Failures surfaced by the host capabilities and the priority store.
///
/// Malformed URLs and stale tab ids never show up here: the first are absorbed
/// by `extract_domain`, the second by the host adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SorterError {
    /// The key-value storage could not be reached.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
    /// A tab query, move or close was rejected by the browser.
    #[error("Tab operation failed: {0}")]
    TabHost(String),
    /// A value could not be converted to or from its wire form.
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SorterError {
    fn from(e: serde_json::Error) -> Self {
        SorterError::Serialization(e.to_string())
    }
}
