//! Workflow settings read from the launcher's environment.
//!
//! The launcher passes everything through environment variables: its own
//! `alfred_*` paths plus the user's workflow configuration
//! (`filter_behaviour`, `only_matches`, `fuzzy_*` scoring overrides).

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{Result, SearchError};
use crate::ranking::ScoringConfig;

/// Prefix for scoring overrides, e.g. `fuzzy_separator_bonus=15`
const SCORING_PREFIX: &str = "fuzzy_";

/// Builtin catalog location inside the workflow directory
const ASSETS_FILE: &str = "assets/searches.json";

/// User customizations inside the data directory
const CUSTOMIZATION_FILE: &str = "config_searches.json";

/// Launcher web search preferences inside `alfred_preferences`
const WEBSEARCH_PREFS_FILE: &str = "preferences/features/websearch/prefs.plist";

/// When the last word of the query is treated as a filter suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterBehaviour {
    /// The last word always filters, unless it is the only word
    #[default]
    Always,
    /// Only an explicit `||` separator filters
    OnTab,
}

impl FilterBehaviour {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "always" => Some(Self::Always),
            "onTab" => Some(Self::OnTab),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorkflowSettings {
    /// `alfred_preferences`
    pub preferences: Option<PathBuf>,
    /// `alfred_workflow_uid`
    pub workflow_uid: Option<String>,
    /// `alfred_workflow_data`
    pub data_dir: Option<PathBuf>,
    /// `alfred_workflow_bundleid`
    pub bundle_id: Option<String>,
    /// `alfred_workflow_name`
    pub workflow_name: Option<String>,
    /// `alfred_debug == "1"`
    pub debug: bool,
    pub filter_behaviour: FilterBehaviour,
    /// Drop non-matching searches instead of listing them below the matches
    pub only_matches: bool,
    /// `include_custom_alfred_websearches == "1"`: merge the launcher's own
    /// enabled custom searches into the catalog
    pub include_launcher_searches: bool,
    pub scoring: ScoringConfig,
}

impl WorkflowSettings {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        let vars: HashMap<String, String> = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        Self::from_vars(&vars)
    }

    /// Build settings from a variable map; empty values count as unset
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        let get = |key: &str| {
            vars.get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let filter_behaviour = match get("filter_behaviour") {
            None => FilterBehaviour::default(),
            Some(raw) => FilterBehaviour::parse(&raw).unwrap_or_else(|| {
                tracing::warn!("Unknown filter_behaviour {:?}, using always", raw);
                FilterBehaviour::default()
            }),
        };

        let scoring_overrides: HashMap<String, String> = vars
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(SCORING_PREFIX)
                    .map(|name| (name.to_string(), value.clone()))
            })
            .collect();

        Self {
            preferences: get("alfred_preferences").map(PathBuf::from),
            workflow_uid: get("alfred_workflow_uid"),
            data_dir: get("alfred_workflow_data").map(PathBuf::from),
            bundle_id: get("alfred_workflow_bundleid"),
            workflow_name: get("alfred_workflow_name"),
            debug: get("alfred_debug").as_deref() == Some("1"),
            filter_behaviour,
            only_matches: get("only_matches").as_deref() == Some("1"),
            include_launcher_searches: get("include_custom_alfred_websearches").as_deref()
                == Some("1"),
            scoring: ScoringConfig::from_config(&scoring_overrides),
        }
    }

    /// `<preferences>/workflows/<uid>`
    pub fn workflow_dir(&self) -> Option<PathBuf> {
        let preferences = self.preferences.as_ref()?;
        let uid = self.workflow_uid.as_ref()?;
        Some(preferences.join("workflows").join(uid))
    }

    pub fn assets_file(&self) -> Result<PathBuf> {
        self.workflow_dir()
            .map(|dir| dir.join(ASSETS_FILE))
            .ok_or(SearchError::MissingSetting("alfred_preferences / alfred_workflow_uid"))
    }

    pub fn customization_file(&self) -> Result<PathBuf> {
        self.data_dir
            .as_ref()
            .map(|dir| dir.join(CUSTOMIZATION_FILE))
            .ok_or(SearchError::MissingSetting("alfred_workflow_data"))
    }

    /// `<preferences>/preferences/features/websearch/prefs.plist`
    pub fn websearch_prefs_file(&self) -> Option<PathBuf> {
        self.preferences
            .as_ref()
            .map(|prefs| prefs.join(WEBSEARCH_PREFS_FILE))
    }

    /// Custom web search icons live here as `features.websearch.custom.<uuid>.<ext>`
    pub fn resources_dir(&self) -> Option<PathBuf> {
        self.preferences.as_ref().map(|prefs| prefs.join("resources"))
    }

    /// Log filter used when `RUST_LOG` is not set
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "unified_search=debug"
        } else {
            "unified_search=info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let settings = WorkflowSettings::from_vars(&HashMap::new());
        assert_eq!(settings.filter_behaviour, FilterBehaviour::Always);
        assert!(!settings.only_matches);
        assert!(!settings.debug);
        assert_eq!(settings.scoring, ScoringConfig::default());
        assert!(settings.workflow_dir().is_none());
        assert!(matches!(
            settings.assets_file(),
            Err(SearchError::MissingSetting(_))
        ));
    }

    #[test]
    fn test_paths() {
        let settings = WorkflowSettings::from_vars(&vars(&[
            ("alfred_preferences", "/prefs/Alfred.alfredpreferences"),
            ("alfred_workflow_uid", "user.workflow.1234"),
            ("alfred_workflow_data", "/data/unified"),
        ]));

        assert_eq!(
            settings.assets_file().unwrap(),
            PathBuf::from("/prefs/Alfred.alfredpreferences/workflows/user.workflow.1234/assets/searches.json")
        );
        assert_eq!(
            settings.customization_file().unwrap(),
            PathBuf::from("/data/unified/config_searches.json")
        );
    }

    #[test]
    fn test_flags() {
        let settings = WorkflowSettings::from_vars(&vars(&[
            ("filter_behaviour", "onTab"),
            ("only_matches", "1"),
            ("alfred_debug", "1"),
        ]));
        assert_eq!(settings.filter_behaviour, FilterBehaviour::OnTab);
        assert!(settings.only_matches);
        assert!(!settings.include_launcher_searches);
        assert_eq!(settings.default_log_filter(), "unified_search=debug");
    }

    #[test]
    fn test_launcher_search_settings() {
        let settings = WorkflowSettings::from_vars(&vars(&[
            ("alfred_preferences", "/prefs/Alfred.alfredpreferences"),
            ("include_custom_alfred_websearches", "1"),
        ]));
        assert!(settings.include_launcher_searches);
        assert_eq!(
            settings.websearch_prefs_file().unwrap(),
            PathBuf::from("/prefs/Alfred.alfredpreferences/preferences/features/websearch/prefs.plist")
        );
        assert_eq!(
            settings.resources_dir().unwrap(),
            PathBuf::from("/prefs/Alfred.alfredpreferences/resources")
        );

        let settings =
            WorkflowSettings::from_vars(&vars(&[("include_custom_alfred_websearches", "0")]));
        assert!(!settings.include_launcher_searches);
        assert!(settings.websearch_prefs_file().is_none());
    }

    #[test]
    fn test_unknown_behaviour_falls_back() {
        let settings = WorkflowSettings::from_vars(&vars(&[("filter_behaviour", "sometimes")]));
        assert_eq!(settings.filter_behaviour, FilterBehaviour::Always);
    }

    #[test]
    fn test_empty_values_are_unset() {
        let settings = WorkflowSettings::from_vars(&vars(&[("alfred_workflow_data", "  ")]));
        assert!(settings.data_dir.is_none());
    }

    #[test]
    fn test_scoring_overrides() {
        let settings = WorkflowSettings::from_vars(&vars(&[
            ("fuzzy_separator_bonus", "20"),
            ("fuzzy_leading_penalty", "-2"),
            ("fuzzy_fold_diacritics", "false"),
        ]));
        assert_eq!(settings.scoring.separator_bonus, 20);
        assert_eq!(settings.scoring.leading_penalty_per_char, -2);
        assert!(!settings.scoring.fold_diacritics);
        assert_eq!(settings.scoring.camel_case_bonus, 10);
    }
}
