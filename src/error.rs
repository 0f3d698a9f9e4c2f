use thiserror::Error;

/// Main error type for the search workflow
#[derive(Error, Debug)]
pub enum SearchError {
    /// Filesystem errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Property-list decoding errors
    #[error("Property list error: {0}")]
    Plist(#[from] plist::Error),

    /// Builtin catalog could not be read
    #[error("Unable to retrieve searches from assets: {0}")]
    Catalog(String),

    /// Required environment setting is absent
    #[error("Missing setting: {0}")]
    MissingSetting(&'static str),

    /// No web search with that name
    #[error("Unable to find web search named: {0}")]
    UnknownSearch(String),

    /// Configuration action not understood
    #[error("Unexpected config action: <{0}>")]
    InvalidAction(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<String> for SearchError {
    fn from(s: String) -> Self {
        SearchError::Other(s)
    }
}

impl From<&str> for SearchError {
    fn from(s: &str) -> Self {
        SearchError::Other(s.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, SearchError>;
