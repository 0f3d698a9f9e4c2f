//! Subsequence scorer in the style of fuzzy file finders.
//!
//! Every query character must appear in the candidate in order. The score
//! rewards adjacent matches, matches right after a separator and camel-case
//! humps, and charges for skipped leading characters and for every scanned
//! character that does not end up in the match.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::ranking::{sort_by_score, Candidate, MatchResult, Ranker};

/// Score returned when the query equals a candidate's shortcut
pub const SHORTCUT_SCORE: i32 = 100;

/// Underscore, hyphen, period, en-dash, slash and space
pub const DEFAULT_SEPARATORS: &str = "_-.\u{2013}/ ";

/// Bonus and penalty tuning for [`FuzzyScorer`].
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use unified_search::ranking::ScoringConfig;
///
/// let mut settings = HashMap::new();
/// settings.insert("separator_bonus".to_string(), "15".to_string());
///
/// let config = ScoringConfig::from_config(&settings);
/// assert_eq!(config.separator_bonus, 15);
/// assert_eq!(config.adjacency_bonus, 5); // default
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Match directly after the previous match
    pub adjacency_bonus: i32,

    /// Match directly after a separator or at the start
    pub separator_bonus: i32,

    /// Uppercase match directly after a lowercase letter
    pub camel_case_bonus: i32,

    /// Per character skipped before the first match (negative)
    pub leading_penalty_per_char: i32,

    /// Floor for the leading penalty (negative)
    pub leading_penalty_cap: i32,

    /// Per scanned character left out of the match (negative)
    pub unmatched_penalty: i32,

    /// Characters that start a new word
    pub separators: String,

    /// Strip diacritics from candidates when the query is plain ASCII
    pub fold_diacritics: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            adjacency_bonus: 5,
            separator_bonus: 10,
            camel_case_bonus: 10,
            leading_penalty_per_char: -3,
            leading_penalty_cap: -9,
            unmatched_penalty: -1,
            separators: DEFAULT_SEPARATORS.to_string(),
            fold_diacritics: true,
        }
    }
}

impl ScoringConfig {
    /// Build from string settings, falling back to defaults for absent or
    /// unparseable values.
    pub fn from_config(config: &HashMap<String, String>) -> Self {
        let defaults = Self::default();

        Self {
            adjacency_bonus: parse_setting(config, "adjacency_bonus", defaults.adjacency_bonus),
            separator_bonus: parse_setting(config, "separator_bonus", defaults.separator_bonus),
            camel_case_bonus: parse_setting(config, "camel_case_bonus", defaults.camel_case_bonus),
            leading_penalty_per_char: parse_setting(
                config,
                "leading_penalty",
                defaults.leading_penalty_per_char,
            ),
            leading_penalty_cap: parse_setting(
                config,
                "leading_penalty_cap",
                defaults.leading_penalty_cap,
            ),
            unmatched_penalty: parse_setting(
                config,
                "unmatched_penalty",
                defaults.unmatched_penalty,
            ),
            separators: config
                .get("separators")
                .filter(|s| !s.is_empty())
                .cloned()
                .unwrap_or(defaults.separators),
            fold_diacritics: parse_flag(config, "fold_diacritics", defaults.fold_diacritics),
        }
    }
}

fn parse_setting<T: FromStr>(config: &HashMap<String, String>, key: &str, default: T) -> T {
    match config.get(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid scoring setting {}={:?}", key, raw);
            default
        }),
    }
}

fn parse_flag(config: &HashMap<String, String>, key: &str, default: bool) -> bool {
    match config.get(key).map(|raw| raw.trim()) {
        None => default,
        Some("1") | Some("true") => true,
        Some("0") | Some("false") => false,
        Some(raw) => {
            tracing::warn!("Ignoring invalid scoring flag {}={:?}", key, raw);
            default
        }
    }
}

/// Best occurrence seen so far for the most recently matched query character
#[derive(Debug, Clone, Copy)]
struct Pending {
    lower: char,
    bonus: i32,
    index: usize,
}

/// Fuzzy subsequence scorer and ranker
#[derive(Debug, Clone, Default)]
pub struct FuzzyScorer {
    config: ScoringConfig,
}

impl FuzzyScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score a single candidate. Never fails.
    pub fn score<'c, C: Candidate + ?Sized>(&self, query: &str, candidate: &'c C) -> MatchResult<'c, C> {
        if query.is_empty() {
            return MatchResult::new(true, 0, query, candidate, Vec::new());
        }

        if let Some(shortcut) = candidate.shortcut().filter(|s| !s.is_empty()) {
            if shortcut.to_lowercase() == query.to_lowercase() {
                return MatchResult::new(true, SHORTCUT_SCORE, query, candidate, Vec::new());
            }
        }

        let pattern: Vec<char> = query.chars().map(lower_case).collect();
        let text = self.scan_text(query, candidate.display_name());
        let (consumed, score, positions) = self.scan(&pattern, &text);

        MatchResult::new(consumed == pattern.len(), score, query, candidate, positions)
    }

    fn scan_text(&self, query: &str, name: &str) -> Vec<char> {
        if self.config.fold_diacritics && query.is_ascii() {
            name.nfd().filter(|c| !is_combining_mark(*c)).nfc().collect()
        } else {
            name.chars().collect()
        }
    }

    /// Left-to-right scan over `text` with an already lowercased `pattern`.
    /// Returns the number of pattern characters consumed, the score and the
    /// committed match positions.
    fn scan(&self, pattern: &[char], text: &[char]) -> (usize, i32, Vec<usize>) {
        let cfg = &self.config;

        let mut score: i32 = 0;
        let mut p = 0;
        let mut prev_match = false;
        let mut prev_lower = false;
        let mut prev_separator = true;
        let mut pending: Option<Pending> = None;
        let mut positions = Vec::with_capacity(pattern.len());

        for (i, &c) in text.iter().enumerate() {
            let lower = lower_case(c);
            let upper = upper_case(c);
            let wanted = pattern.get(p).copied();

            let direct = wanted == Some(lower);
            let rematch = pending.is_some_and(|slot| slot.lower == lower);
            let repeat = pending.is_some_and(|slot| Some(slot.lower) == wanted);

            if direct || repeat {
                if let Some(slot) = pending.take() {
                    score = score.wrapping_add(slot.bonus);
                    positions.push(slot.index);
                }
            }

            if direct || rematch {
                if p == 0 {
                    score = score.wrapping_add(self.leading_penalty(i));
                }

                let mut bonus: i32 = 0;
                if prev_match {
                    bonus = bonus.wrapping_add(cfg.adjacency_bonus);
                }
                if prev_separator {
                    bonus = bonus.wrapping_add(cfg.separator_bonus);
                }
                if prev_lower && c == upper && lower != upper {
                    bonus = bonus.wrapping_add(cfg.camel_case_bonus);
                }

                if direct {
                    p += 1;
                }

                if bonus >= pending.map_or(0, |slot| slot.bonus) {
                    if pending.is_some() {
                        score = score.wrapping_add(cfg.unmatched_penalty);
                    }
                    pending = Some(Pending { lower, bonus, index: i });
                }
                prev_match = true;
            } else {
                score = score.wrapping_add(cfg.unmatched_penalty);
                prev_match = false;
            }

            prev_lower = c == lower && lower != upper;
            prev_separator = cfg.separators.contains(c);
        }

        if let Some(slot) = pending {
            score = score.wrapping_add(slot.bonus);
            positions.push(slot.index);
        }

        (p, score, positions)
    }

    fn leading_penalty(&self, skipped: usize) -> i32 {
        let skipped = i32::try_from(skipped).unwrap_or(i32::MAX);
        skipped
            .wrapping_mul(self.config.leading_penalty_per_char)
            .max(self.config.leading_penalty_cap)
    }
}

impl Ranker for FuzzyScorer {
    fn rank<'c, C: Candidate>(
        &self,
        query: &str,
        candidates: &'c [C],
        matches_only: bool,
    ) -> Vec<MatchResult<'c, C>> {
        let mut ranked: Vec<MatchResult<'c, C>> = candidates
            .iter()
            .map(|candidate| self.score(query, candidate))
            .collect();

        sort_by_score(&mut ranked);

        if matches_only {
            ranked.retain(|result| result.is_match);
        }

        tracing::debug!(
            "Ranked {} candidates for {:?}, {} kept",
            candidates.len(),
            query,
            ranked.len()
        );

        ranked
    }

    fn name(&self) -> &str {
        "fuzzy"
    }
}

fn lower_case(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn upper_case(c: char) -> char {
    c.to_uppercase().next().unwrap_or(c)
}
