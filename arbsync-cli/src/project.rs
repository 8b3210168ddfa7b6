use std::path::{Path, PathBuf};

use arbsync::{ArbLayout, FsResourceStore, HistoryStore, Resource, ResourceStore, TranslationCache};

use crate::config::Workspace;
use crate::validation::validate_arb_path;

/// Everything a command needs: config, file layout and the loaded source resource.
pub struct Project {
    pub workspace: Workspace,
    pub layout: ArbLayout,
    pub store: FsResourceStore,
    pub source: Resource,
}

impl Project {
    pub fn open(config_path: Option<&Path>) -> Result<Self, String> {
        let workspace = Workspace::load(config_path).map_err(|e| e.to_string())?;
        Self::from_workspace(workspace)
    }

    pub fn from_workspace(workspace: Workspace) -> Result<Self, String> {
        let layout = workspace.layout().map_err(|e| e.to_string())?;
        validate_arb_path(&layout.source_path)?;
        let language = layout.source_language().map_err(|e| e.to_string())?;

        let store = FsResourceStore::new();
        let source = store
            .load(&layout.source_path, language.language_code)
            .map_err(|e| e.to_string())?;
        Ok(Project {
            workspace,
            layout,
            store,
            source,
        })
    }

    pub fn history(&self) -> Result<HistoryStore, String> {
        HistoryStore::open(self.workspace.history_path()).map_err(|e| e.to_string())
    }

    pub fn cache(&self) -> Result<TranslationCache, String> {
        TranslationCache::open(self.workspace.cache_path()).map_err(|e| e.to_string())
    }

    pub fn target_languages(&self, selection: &[String]) -> Result<Vec<String>, String> {
        self.workspace
            .target_languages(selection)
            .map_err(|e| e.to_string())
    }

    /// Every ARB file next to the source, the source included.
    pub fn arb_files(&self) -> Result<Vec<PathBuf>, String> {
        self.store
            .list_resource_files(&self.layout.source_path)
            .map_err(|e| e.to_string())
    }
}
