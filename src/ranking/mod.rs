pub mod fuzzy;

pub use fuzzy::{FuzzyScorer, ScoringConfig};

/// Something a user can pick by typing part of its name
pub trait Candidate {
    /// Text the query is scored against
    fn display_name(&self) -> &str;

    /// Exact-match alias checked before fuzzy scoring
    fn shortcut(&self) -> Option<&str> {
        None
    }
}

impl Candidate for str {
    fn display_name(&self) -> &str {
        self
    }
}

impl Candidate for String {
    fn display_name(&self) -> &str {
        self
    }
}

impl<T: Candidate + ?Sized> Candidate for &T {
    fn display_name(&self) -> &str {
        (**self).display_name()
    }

    fn shortcut(&self) -> Option<&str> {
        (**self).shortcut()
    }
}

/// Trait for ranking implementations.
///
/// `rank` is generic over the candidate type, so the trait is used through
/// static dispatch (`SearchEngine<R: Ranker>`) rather than as `dyn Ranker`.
pub trait Ranker: Send + Sync {
    /// Score every candidate against query, sorted by score (highest first).
    /// With `matches_only`, non-matching results are dropped after sorting.
    fn rank<'c, C: Candidate>(
        &self,
        query: &str,
        candidates: &'c [C],
        matches_only: bool,
    ) -> Vec<MatchResult<'c, C>>;

    /// Get ranker name for logging
    fn name(&self) -> &str;
}

/// Outcome of scoring one candidate against one query.
///
/// Two results are equal when they refer to equal candidates with the same
/// score; the query text is informational only.
#[derive(Debug)]
pub struct MatchResult<'c, C: ?Sized> {
    /// Every query character was consumed in order
    pub is_match: bool,

    /// Accumulated bonuses and penalties, may be negative
    pub score: i32,

    /// The query that was scored
    pub query: String,

    /// The caller's candidate, untouched
    pub candidate: &'c C,

    /// Matched character positions in the scanned text, for highlighting
    pub positions: Vec<usize>,
}

impl<'c, C: ?Sized> MatchResult<'c, C> {
    pub fn new(
        is_match: bool,
        score: i32,
        query: impl Into<String>,
        candidate: &'c C,
        positions: Vec<usize>,
    ) -> Self {
        Self {
            is_match,
            score,
            query: query.into(),
            candidate,
            positions,
        }
    }
}

impl<C: ?Sized> Clone for MatchResult<'_, C> {
    fn clone(&self) -> Self {
        Self {
            is_match: self.is_match,
            score: self.score,
            query: self.query.clone(),
            candidate: self.candidate,
            positions: self.positions.clone(),
        }
    }
}

impl<C: PartialEq + ?Sized> PartialEq for MatchResult<'_, C> {
    fn eq(&self, other: &Self) -> bool {
        self.candidate == other.candidate && self.score == other.score
    }
}

/// Sort by score descending. Equal scores have no defined order.
pub fn sort_by_score<C: ?Sized>(results: &mut [MatchResult<'_, C>]) {
    results.sort_unstable_by(|a, b| b.score.cmp(&a.score));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Site {
        name: &'static str,
        key: Option<&'static str>,
    }

    impl Candidate for Site {
        fn display_name(&self) -> &str {
            self.name
        }

        fn shortcut(&self) -> Option<&str> {
            self.key
        }
    }

    #[test]
    fn test_equality_ignores_query() {
        let site = Site { name: "GitHub", key: Some("gh") };
        let a = MatchResult::new(true, 16, "gh", &site, vec![0, 3]);
        let b = MatchResult::new(true, 16, "GH", &site, Vec::new());
        assert_eq!(a, b);

        let c = MatchResult::new(true, 15, "gh", &site, vec![0, 3]);
        assert_ne!(a, c);
    }

    #[test]
    fn test_equality_compares_candidates() {
        let first = Site { name: "Maps", key: None };
        let second = Site { name: "Mail", key: None };
        let a = MatchResult::new(true, 7, "m", &first, Vec::new());
        let b = MatchResult::new(true, 7, "m", &second, Vec::new());
        assert_ne!(a, b);
    }

    #[test]
    fn test_sort_by_score() {
        let names = ["a", "b", "c"];
        let mut results = vec![
            MatchResult::new(true, -2, "q", &names[0], Vec::new()),
            MatchResult::new(false, 30, "q", &names[1], Vec::new()),
            MatchResult::new(true, 4, "q", &names[2], Vec::new()),
        ];
        sort_by_score(&mut results);

        let scores: Vec<i32> = results.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![30, 4, -2]);
    }

    #[test]
    fn test_reference_candidates() {
        let name = String::from("DuckDuckGo");
        let by_ref: &String = &name;
        assert_eq!(by_ref.display_name(), "DuckDuckGo");
        assert_eq!(by_ref.shortcut(), None);
    }
}
