use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use crate::ranking::Candidate;

/// Placeholder in search URLs replaced by the user's query
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// Placeholder used by the launcher's own custom web searches
pub const LAUNCHER_PLACEHOLDER: &str = "{query}";

/// Builtin catalog file (`assets/searches.json`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchModule {
    pub version: String,
    pub author: String,
    pub updated: String,
    pub searches: Vec<WebSearch>,
}

/// A named web search the user can pick by suffix
///
/// Identity is `name` + `url`; the flags are user customizations layered on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSearch {
    /// Display name, scored against the query suffix
    pub name: String,

    /// URL template containing `{input}`
    pub url: String,

    /// Exact-match alias
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shorthand: Option<String>,

    /// Shown in results
    pub active: bool,

    /// Offered when no suffix is given
    pub is_default: bool,

    /// Icon name under `images/icons/`, or an absolute path for launcher searches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Imported from the launcher's own web search preferences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_alfred_websearch: Option<bool>,
}

impl WebSearch {
    /// Create an active, non-default search
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            shorthand: None,
            active: true,
            is_default: false,
            icon: None,
            is_alfred_websearch: None,
        }
    }

    pub fn with_shorthand(mut self, shorthand: impl Into<String>) -> Self {
        self.shorthand = Some(shorthand.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn is_launcher_search(&self) -> bool {
        self.is_alfred_websearch.unwrap_or(false)
    }

    /// URL with the query substituted for every `{input}`
    pub fn search_url(&self, query: &str) -> String {
        self.url.replace(INPUT_PLACEHOLDER, query)
    }

    /// Title for display
    pub fn title(&self) -> String {
        if self.is_launcher_search() {
            self.name.replace(LAUNCHER_PLACEHOLDER, INPUT_PLACEHOLDER)
        } else {
            self.name.clone()
        }
    }

    /// Resolved icon path, if the search has an icon
    pub fn icon_path(&self) -> Option<String> {
        self.icon.as_ref().map(|icon| {
            if self.is_launcher_search() {
                icon.clone()
            } else {
                format!("images/icons/{}.png", icon)
            }
        })
    }
}

impl PartialEq for WebSearch {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.url == other.url
    }
}

impl Eq for WebSearch {}

impl Hash for WebSearch {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.url.hash(state);
    }
}

impl Candidate for WebSearch {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn shortcut(&self) -> Option<&str> {
        self.shorthand.as_deref()
    }
}
