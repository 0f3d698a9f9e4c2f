pub mod customization;
pub mod launcher;

use std::fs;
use std::path::Path;

use crate::config::WorkflowSettings;
use crate::core::{SearchModule, WebSearch};
use crate::error::{Result, SearchError};

pub use customization::{JsonCustomizationStore, MemoryCustomizationStore};

/// Trait for customization storage implementations
pub trait CustomizationStore: Send + Sync {
    /// All saved customizations; unreadable storage yields an empty list
    fn load(&self) -> Vec<WebSearch>;

    /// Insert or replace the customization for this search
    fn save(&self, search: &WebSearch) -> Result<()>;

    /// Whether anything has been persisted yet
    fn exists(&self) -> bool;
}

/// The resolved list of web searches: builtins with user customizations applied
#[derive(Debug, Clone, Default)]
pub struct SearchCatalog {
    searches: Vec<WebSearch>,
}

impl SearchCatalog {
    pub fn new(searches: Vec<WebSearch>) -> Self {
        Self { searches }
    }

    /// Load the builtin catalog, add the launcher's custom searches when
    /// enabled, then overlay saved customizations
    pub fn load(settings: &WorkflowSettings, store: &dyn CustomizationStore) -> Result<Self> {
        let mut catalog = Self::from_module_file(&settings.assets_file()?)?;

        if settings.include_launcher_searches {
            let custom = launcher::launcher_searches(settings);
            if custom.is_empty() {
                tracing::info!(
                    "Custom launcher web searches are included, but none are enabled. \
                     Enable at least one to include it in {}.",
                    settings.workflow_name.as_deref().unwrap_or("the workflow")
                );
            }
            catalog.merge_launcher_searches(custom);
        }

        catalog.apply_customizations(&store.load());
        Ok(catalog)
    }

    /// Read a `SearchModule` JSON file
    pub fn from_module_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| SearchError::Catalog(format!("{}: {}", path.display(), e)))?;
        let module: SearchModule = serde_json::from_str(&contents)
            .map_err(|e| SearchError::Catalog(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(
            "Loaded {} builtin searches (catalog {} by {}, updated {})",
            module.searches.len(),
            module.version,
            module.author,
            module.updated
        );

        Ok(Self::new(module.searches))
    }

    /// Append launcher searches whose name is not already taken
    pub fn merge_launcher_searches(&mut self, searches: Vec<WebSearch>) {
        for search in searches {
            if self.find_by_name(&search.name).is_some() {
                tracing::debug!("Skipping launcher search {}: name already in catalog", search.name);
                continue;
            }
            self.searches.push(search);
        }
    }

    /// Copy `active` and `is_default` from customizations onto equal searches.
    /// Customizations for unknown searches are ignored.
    pub fn apply_customizations(&mut self, customized: &[WebSearch]) {
        for custom in customized {
            match self.searches.iter_mut().find(|search| *search == custom) {
                Some(search) => {
                    search.active = custom.active;
                    search.is_default = custom.is_default;
                }
                None => tracing::debug!("Ignoring customization for unknown search {}", custom.name),
            }
        }
    }

    pub fn searches(&self) -> &[WebSearch] {
        &self.searches
    }

    pub fn find_by_name(&self, name: &str) -> Option<&WebSearch> {
        self.searches.iter().find(|search| search.name == name)
    }

    pub fn defaults(&self) -> impl Iterator<Item = &WebSearch> {
        self.searches.iter().filter(|search| search.is_default)
    }

    pub fn has_default(&self) -> bool {
        self.defaults().next().is_some()
    }

    pub fn len(&self) -> usize {
        self.searches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.searches.is_empty()
    }
}
