use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use mneme::scheduler::SchedulerConfig;
use mneme::store::VocabStore;

/// Shared application state for CLI commands
pub struct App {
    pub store: VocabStore,
}

impl App {
    /// Open the store at `storage_path`, or at the default location under
    /// the platform data directory when no path is given.
    pub fn new(storage_path: Option<&Path>) -> Result<Self> {
        let path = match storage_path {
            Some(path) => path.to_path_buf(),
            None => Self::default_storage_path().context("Failed to resolve data directory")?,
        };

        let store = VocabStore::open(&path, SchedulerConfig::default())
            .with_context(|| format!("Failed to open vocabulary store at {}", path.display()))?;

        Ok(Self { store })
    }

    fn default_storage_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join("mneme").join("vocab.json"))
    }
}
