use unicode_normalization::UnicodeNormalization;

use crate::config::FilterBehaviour;

/// Explicit separator between the search text and the filter suffix
pub const FILTER_SEPARATOR: &str = "||";

/// Suffix that lists every search
pub const WILDCARD: &str = "*";

/// NFC-normalize and trim raw launcher input. Blank input is `None`.
pub fn normalize_input(raw: &str) -> Option<String> {
    let normalized: String = raw.nfc().collect();
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// User input split into the text to search for and the suffix that picks
/// the web search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    /// The input as typed
    pub full: String,
    /// Text sent to the web search
    pub query: String,
    /// Filter used to pick the web search
    pub suffix: Option<String>,
    /// Input contained `||`
    pub has_separator: bool,
}

impl ParsedQuery {
    pub fn parse(input: &str, behaviour: FilterBehaviour) -> Self {
        let has_separator = input.contains(FILTER_SEPARATOR);

        let (query, suffix) = if has_separator {
            let components: Vec<&str> = input
                .split(FILTER_SEPARATOR)
                .filter(|piece| !piece.is_empty())
                .map(str::trim)
                .collect();
            let query = components.first().copied().unwrap_or_default().to_string();
            let suffix = components
                .get(1)
                .filter(|suffix| !suffix.is_empty())
                .map(|suffix| suffix.to_string());
            (query, suffix)
        } else {
            match behaviour {
                FilterBehaviour::Always => split_last_word(input),
                FilterBehaviour::OnTab => (input.to_string(), None),
            }
        };

        Self {
            full: input.to_string(),
            query,
            suffix,
            has_separator,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.suffix.as_deref() == Some(WILDCARD)
    }
}

/// Split off the last space-separated word, unless it is the whole input
fn split_last_word(input: &str) -> (String, Option<String>) {
    let last = input
        .split(' ')
        .filter(|word| !word.is_empty())
        .last()
        .map(str::trim)
        .filter(|word| !word.is_empty());

    match last {
        Some(word) if word != input => {
            let start = input.rfind(word).unwrap_or(input.len());
            (input[..start].trim().to_string(), Some(word.to_string()))
        }
        _ => (input.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> ParsedQuery {
        ParsedQuery::parse(input, FilterBehaviour::Always)
    }

    #[test]
    fn test_normalize_input() {
        assert_eq!(normalize_input("  rust  "), Some("rust".to_string()));
        assert_eq!(normalize_input(" \n "), None);
        // e + combining acute composes to a single scalar
        assert_eq!(normalize_input("cafe\u{301}"), Some("caf\u{e9}".to_string()));
    }

    #[test]
    fn test_last_word_is_suffix() {
        let parsed = parse("rust lifetimes gh");
        assert_eq!(parsed.query, "rust lifetimes");
        assert_eq!(parsed.suffix.as_deref(), Some("gh"));
        assert!(!parsed.has_separator);
        assert_eq!(parsed.full, "rust lifetimes gh");
    }

    #[test]
    fn test_single_word_has_no_suffix() {
        let parsed = parse("rust");
        assert_eq!(parsed.query, "rust");
        assert_eq!(parsed.suffix, None);
    }

    #[test]
    fn test_repeated_last_word() {
        let parsed = parse("go go");
        assert_eq!(parsed.query, "go");
        assert_eq!(parsed.suffix.as_deref(), Some("go"));
    }

    #[test]
    fn test_on_tab_never_splits_words() {
        let parsed = ParsedQuery::parse("rust lifetimes gh", FilterBehaviour::OnTab);
        assert_eq!(parsed.query, "rust lifetimes gh");
        assert_eq!(parsed.suffix, None);
    }

    #[test]
    fn test_separator() {
        for behaviour in [FilterBehaviour::Always, FilterBehaviour::OnTab] {
            let parsed = ParsedQuery::parse("rust lifetimes || gh", behaviour);
            assert_eq!(parsed.query, "rust lifetimes");
            assert_eq!(parsed.suffix.as_deref(), Some("gh"));
            assert!(parsed.has_separator);
        }
    }

    #[test]
    fn test_separator_without_suffix() {
        let parsed = parse("rust lifetimes ||");
        assert_eq!(parsed.query, "rust lifetimes");
        assert_eq!(parsed.suffix, None);
        assert!(parsed.has_separator);

        let parsed = parse("rust ||   ");
        assert_eq!(parsed.suffix, None);
    }

    #[test]
    fn test_wildcard() {
        assert!(parse("rust *").is_wildcard());
        assert!(parse("rust || *").is_wildcard());
        assert!(!parse("rust gh").is_wildcard());
    }
}
