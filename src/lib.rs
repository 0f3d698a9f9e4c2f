//! # Unified Search
//!
//! Launcher helper that picks a web search from an abbreviated suffix:
//! - Fuzzy subsequence scorer (adjacency, separator and camel-case bonuses,
//!   leading-match penalty, diacritic folding)
//! - Ranking of a search catalog against the typed suffix
//! - Builtin catalog with persisted user customizations
//! - Script filter JSON responses for the launcher
//!
//! ## Example Usage
//!
//! ```rust
//! use unified_search::ranking::{FuzzyScorer, Ranker};
//!
//! let scorer = FuzzyScorer::default();
//! let candidates = ["Google", "Maps", "GitHub"];
//!
//! let ranked = scorer.rank("gh", &candidates, true);
//! assert_eq!(ranked.len(), 1);
//! assert_eq!(*ranked[0].candidate, "GitHub");
//! ```

pub mod catalog;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod query;
pub mod ranking;

// Re-export primary types
pub use catalog::{CustomizationStore, JsonCustomizationStore, SearchCatalog};
pub use config::{FilterBehaviour, WorkflowSettings};
pub use crate::core::{Response, SearchModule, WebSearch};
pub use engine::{ConfigAction, SearchEngine};
pub use error::{Result, SearchError};
pub use query::ParsedQuery;
pub use ranking::{Candidate, FuzzyScorer, MatchResult, Ranker, ScoringConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
