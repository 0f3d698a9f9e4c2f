use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::catalog::CustomizationStore;
use crate::config::WorkflowSettings;
use crate::core::WebSearch;
use crate::error::{Result, SearchError};

/// Customizations persisted as a JSON array of searches
///
/// File layout (`config_searches.json`):
/// ```json
/// [
///   { "name": "Google", "url": "https://www.google.com/search?q={input}",
///     "active": true, "isDefault": true }
/// ]
/// ```
pub struct JsonCustomizationStore {
    path: PathBuf,
}

impl JsonCustomizationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the workflow data directory
    pub fn from_settings(settings: &WorkflowSettings) -> Result<Self> {
        Ok(Self::new(settings.customization_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CustomizationStore for JsonCustomizationStore {
    fn load(&self) -> Vec<WebSearch> {
        if !self.path.exists() {
            return Vec::new();
        }

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("Unable to read {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(searches) => searches,
            Err(e) => {
                tracing::warn!("Ignoring undecodable customizations in {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    fn save(&self, search: &WebSearch) -> Result<()> {
        let mut searches = self.load();
        match searches.iter_mut().find(|existing| *existing == search) {
            Some(existing) => *existing = search.clone(),
            None => searches.push(search.clone()),
        }

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&searches)?)?;

        tracing::debug!("Saved customization for {} to {}", search.name, self.path.display());
        Ok(())
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }
}

/// In-memory store, nothing touches disk
#[derive(Default)]
pub struct MemoryCustomizationStore {
    searches: Mutex<Vec<WebSearch>>,
}

impl MemoryCustomizationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_searches(searches: Vec<WebSearch>) -> Self {
        Self {
            searches: Mutex::new(searches),
        }
    }
}

impl CustomizationStore for MemoryCustomizationStore {
    fn load(&self) -> Vec<WebSearch> {
        self.searches
            .lock()
            .map(|searches| searches.clone())
            .unwrap_or_default()
    }

    fn save(&self, search: &WebSearch) -> Result<()> {
        let mut searches = self
            .searches
            .lock()
            .map_err(|_| SearchError::Other("customization store poisoned".to_string()))?;
        match searches.iter_mut().find(|existing| *existing == search) {
            Some(existing) => *existing = search.clone(),
            None => searches.push(search.clone()),
        }
        Ok(())
    }

    fn exists(&self) -> bool {
        self.searches
            .lock()
            .map(|searches| !searches.is_empty())
            .unwrap_or(false)
    }
}
