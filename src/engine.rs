use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use crate::catalog::{CustomizationStore, SearchCatalog};
use crate::config::{FilterBehaviour, WorkflowSettings};
use crate::core::{Argument, Icon, Item, Modifier, Response, WebSearch};
use crate::error::{Result, SearchError};
use crate::query::{ParsedQuery, FILTER_SEPARATOR};
use crate::ranking::{FuzzyScorer, Ranker};

/// Input that lists the help entries
const HELP_COMMANDS: [&str; 2] = ["help", "?"];

/// Prefix that lists searches for configuration
pub const CONFIG_PREFIX: &str = ":c";

/// Input the launcher sends back when a configuration row is actioned
pub const CONFIGURING_COMMAND: &str = "|configuring|";

/// External trigger that re-opens the workflow
pub const INIT_TRIGGER: &str = "init";

/// Customization applied from a configuration row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    AddDefault,
    RemoveDefault,
    Activate,
    Deactivate,
}

impl ConfigAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigAction::AddDefault => "add_default",
            ConfigAction::RemoveDefault => "remove_default",
            ConfigAction::Activate => "activate",
            ConfigAction::Deactivate => "deactivate",
        }
    }

    fn apply(&self, search: &mut WebSearch) {
        match self {
            ConfigAction::AddDefault => search.is_default = true,
            ConfigAction::RemoveDefault => search.is_default = false,
            ConfigAction::Activate => search.active = true,
            ConfigAction::Deactivate => search.active = false,
        }
    }
}

impl FromStr for ConfigAction {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "add_default" => Ok(ConfigAction::AddDefault),
            "remove_default" => Ok(ConfigAction::RemoveDefault),
            "activate" => Ok(ConfigAction::Activate),
            "deactivate" => Ok(ConfigAction::Deactivate),
            other => Err(SearchError::InvalidAction(other.to_string())),
        }
    }
}

/// Main search workflow orchestrator
pub struct SearchEngine<R: Ranker = FuzzyScorer> {
    catalog: SearchCatalog,
    store: Arc<dyn CustomizationStore>,
    ranker: R,
    settings: WorkflowSettings,
}

impl SearchEngine<FuzzyScorer> {
    /// Create engine with the fuzzy ranker tuned by `settings.scoring`
    pub fn new(
        catalog: SearchCatalog,
        store: Arc<dyn CustomizationStore>,
        settings: WorkflowSettings,
    ) -> Self {
        let ranker = FuzzyScorer::new(settings.scoring.clone());
        Self::with_ranker(catalog, store, settings, ranker)
    }
}

impl<R: Ranker> SearchEngine<R> {
    pub fn with_ranker(
        catalog: SearchCatalog,
        store: Arc<dyn CustomizationStore>,
        settings: WorkflowSettings,
        ranker: R,
    ) -> Self {
        Self {
            catalog,
            store,
            ranker,
            settings,
        }
    }

    pub fn catalog(&self) -> &SearchCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    /// Build the launcher response for one parsed input
    pub fn respond(&self, parsed: &ParsedQuery) -> Response {
        if let Some(response) = self.command_response(parsed.full.trim()) {
            return response;
        }

        if !self.catalog.has_default() {
            return Response::info("At least one search must be configured as default.", "");
        }

        let subtitle = format!("Search for '{}'", parsed.query);

        let items = match parsed.suffix.as_deref() {
            Some(suffix) if !parsed.is_wildcard() => {
                let ranked = self
                    .ranker
                    .rank(suffix, self.catalog.searches(), self.settings.only_matches);

                tracing::debug!(
                    "{} ranked {} searches for suffix {:?}",
                    self.ranker.name(),
                    ranked.len(),
                    suffix
                );

                let mut items: Vec<Item> = ranked
                    .iter()
                    .filter_map(|result| self.search_item(result.candidate, &parsed.query, parsed))
                    .collect();

                if items.is_empty() {
                    items = self
                        .catalog
                        .defaults()
                        .filter_map(|search| self.search_item(search, &parsed.full, parsed))
                        .collect();
                    set_first_subtitle(&mut items, format!("Search for '{}'", parsed.full));
                } else {
                    set_first_subtitle(&mut items, subtitle);
                }
                items
            }
            _ => {
                let mut items: Vec<Item> = if parsed.is_wildcard() {
                    let mut searches: Vec<&WebSearch> = self.catalog.searches().iter().collect();
                    searches.sort_by_key(|search| !search.is_default);
                    searches
                        .into_iter()
                        .filter_map(|search| self.search_item(search, &parsed.query, parsed))
                        .collect()
                } else {
                    self.catalog
                        .defaults()
                        .filter_map(|search| self.search_item(search, &parsed.query, parsed))
                        .collect()
                };

                let subtitle = if parsed.has_separator
                    || self.settings.filter_behaviour == FilterBehaviour::Always
                {
                    subtitle
                } else {
                    format!("[Tap \u{21e5} to Filter] {}", subtitle)
                };
                set_first_subtitle(&mut items, subtitle);
                items
            }
        };

        Response::new(items)
    }

    /// Commands that take over the whole response
    fn command_response(&self, query: &str) -> Option<Response> {
        if query.is_empty() {
            return None;
        }

        if HELP_COMMANDS.contains(&query) {
            return Some(Response::new(self.help_items()));
        }

        if let Some(rest) = query.strip_prefix(CONFIG_PREFIX) {
            let filter = rest.trim();
            let searches = self.catalog.searches();
            let items = if filter.is_empty() {
                searches.iter().map(config_item).collect()
            } else {
                self.ranker
                    .rank(filter, searches, true)
                    .iter()
                    .map(|result| config_item(result.candidate))
                    .collect()
            };
            return Some(Response::new(items));
        }

        None
    }

    fn help_items(&self) -> Vec<Item> {
        let mut items = Vec::new();

        let mut configure = Item::new("Configure Web Search Instances");
        configure.icon = Some(Icon::config());
        configure.autocomplete = Some(format!("{} ", CONFIG_PREFIX));
        configure.valid = false;
        items.push(configure);

        if let Some(uid) = &self.settings.workflow_uid {
            let mut open = Item::new("Open Workflow Configuration");
            open.arg = Some(Argument::String(format!(
                "alfredpreferences://navigateto/workflows>workflow>{}>userconfig>key",
                uid
            )));
            open.icon = Some(Icon::config());
            open.add_variable("trigger", "open_url");
            items.push(open);
        }

        if let Some(data_dir) = &self.settings.data_dir {
            if self.store.exists() {
                let mut browse = Item::new("Browse Data Folder");
                browse.arg = Some(Argument::String(data_dir.display().to_string()));
                browse.icon = Some(Icon::config_dir());
                browse.add_variable("trigger", "browse");
                items.push(browse);
            }
        }

        items
    }

    /// Result row for an active search; inactive searches are hidden
    fn search_item(&self, search: &WebSearch, query: &str, parsed: &ParsedQuery) -> Option<Item> {
        if !search.active {
            return None;
        }

        let url = search.search_url(query);
        let mut item = Item::new(search.title());
        item.arg = Some(Argument::String(url.clone()));
        item.icon = search.icon_path().map(Icon::new);

        let completed = match self.settings.filter_behaviour {
            FilterBehaviour::Always => parsed.full.as_str(),
            FilterBehaviour::OnTab => query,
        };
        item.autocomplete = Some(format!("{} {} ", completed, FILTER_SEPARATOR));

        if let Some(shorthand) = &search.shorthand {
            item.mods.shift = Some(Modifier::new(url.clone(), format!("Shorthand: {}", shorthand)));
        }
        item.mods.alt = Some(Modifier::new(url, search.url.clone()));

        Some(item)
    }

    /// Apply a configuration action to the named search and persist it
    pub fn configure(&mut self, name: &str, action: ConfigAction) -> Result<WebSearch> {
        let mut search = self
            .catalog
            .find_by_name(name)
            .cloned()
            .ok_or_else(|| SearchError::UnknownSearch(name.to_string()))?;

        action.apply(&mut search);
        self.store.save(&search)?;
        self.catalog.apply_customizations(std::slice::from_ref(&search));

        tracing::info!("Applied {} to {}", action.as_str(), name);
        Ok(search)
    }
}

/// Configuration row: cmd toggles default, alt toggles active
pub fn config_item(search: &WebSearch) -> Item {
    let default_message = if search.is_default { "Remove default" } else { "Add default" };
    let active_message = if search.active { "Deactivate" } else { "Activate" };

    let mut item = Item::new(search.title());
    item.icon = search.icon_path().map(Icon::new);
    item.subtitle = format!("\u{2318} {}  \u{b7}  \u{2325} {}", default_message, active_message);
    item.arg = Some(Argument::String(search.name.clone()));
    item.valid = false;

    let default_action = if search.is_default {
        ConfigAction::RemoveDefault
    } else {
        ConfigAction::AddDefault
    };
    let active_action = if search.active {
        ConfigAction::Deactivate
    } else {
        ConfigAction::Activate
    };

    item.mods.cmd = Some(config_modifier(search, default_message, default_action));
    item.mods.alt = Some(config_modifier(search, active_message, active_action));

    if let Some(shorthand) = &search.shorthand {
        let mut subtitle = format!("Shorthand: {}", shorthand);
        if search.is_alfred_websearch.unwrap_or(false) {
            subtitle.push_str(" [Custom Search]");
        }
        item.mods.shift = Some(Modifier {
            subtitle: Some(subtitle),
            valid: false,
            ..Modifier::default()
        });
    }

    item
}

fn config_modifier(search: &WebSearch, message: &str, action: ConfigAction) -> Modifier {
    let variables = BTreeMap::from([
        ("trigger".to_string(), "config".to_string()),
        ("token".to_string(), "valid".to_string()),
        ("config_action".to_string(), action.as_str().to_string()),
    ]);

    Modifier {
        arg: Argument::String(search.name.clone()),
        subtitle: Some(format!("\u{23ce} {}", message)),
        valid: true,
        icon: None,
        variables: Some(variables),
    }
}

fn set_first_subtitle(items: &mut [Item], subtitle: String) {
    if let Some(first) = items.first_mut() {
        first.subtitle = subtitle;
    }
}

/// URL that runs an external trigger of this workflow
pub fn external_trigger_url(bundle_id: &str, trigger: &str, argument: &str) -> String {
    format!(
        "alfred://runtrigger/{}/{}/?argument={}",
        bundle_id,
        trigger,
        urlencoding::encode(argument)
    )
}
