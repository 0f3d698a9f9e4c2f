use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::config::WorkflowSettings;
use crate::core::web_search::{INPUT_PLACEHOLDER, LAUNCHER_PLACEHOLDER};
use crate::core::WebSearch;
use crate::error::Result;

/// File name prefix of custom web search icons in the resources directory
const ICON_PREFIX: &str = "features.websearch.custom.";

/// The part of the launcher's web search preferences we read
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomSites {
    #[serde(default)]
    custom_sites: BTreeMap<String, CustomSite>,
}

#[derive(Debug, Deserialize)]
struct CustomSite {
    enabled: bool,
    keyword: String,
    text: String,
    url: String,
}

/// Enabled custom searches from the launcher's preferences.
///
/// Missing or undecodable preferences are logged and yield an empty list.
pub fn launcher_searches(settings: &WorkflowSettings) -> Vec<WebSearch> {
    let Some(prefs_file) = settings.websearch_prefs_file() else {
        tracing::warn!("Web search preferences path not found: alfred_preferences is unset");
        return Vec::new();
    };

    let icons = settings
        .resources_dir()
        .map(|dir| icon_map(&dir))
        .unwrap_or_default();

    match read_custom_sites(&prefs_file, &icons) {
        Ok(searches) => searches,
        Err(e) => {
            tracing::warn!("Failed to decode custom sites in {}: {}", prefs_file.display(), e);
            Vec::new()
        }
    }
}

/// Decode `customSites` from a property list (XML or binary)
fn read_custom_sites(path: &Path, icons: &HashMap<String, String>) -> Result<Vec<WebSearch>> {
    let sites: CustomSites = plist::from_file(path)?;

    Ok(sites
        .custom_sites
        .into_iter()
        .filter(|(_, site)| site.enabled)
        .map(|(uuid, site)| WebSearch {
            name: site.text,
            url: site.url.replace(LAUNCHER_PLACEHOLDER, INPUT_PLACEHOLDER),
            shorthand: Some(site.keyword).filter(|keyword| !keyword.is_empty()),
            active: true,
            is_default: false,
            icon: icons.get(&uuid).cloned(),
            is_alfred_websearch: Some(true),
        })
        .collect())
}

/// Map custom search UUIDs to icon paths.
/// `features.websearch.custom.<uuid>.png` is keyed by `<uuid>`.
fn icon_map(resources: &Path) -> HashMap<String, String> {
    let entries = match fs::read_dir(resources) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Unable to read resources directory {}: {}", resources.display(), e);
            return HashMap::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let path = entry.path();
            let file_name = path.file_name()?.to_str()?;
            let uuid = file_name
                .strip_prefix(ICON_PREFIX)?
                .split('.')
                .next()
                .filter(|uuid| !uuid.is_empty())?;
            Some((uuid.to_string(), path.display().to_string()))
        })
        .collect()
}
