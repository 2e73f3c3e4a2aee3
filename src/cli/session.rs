//! Wiring of storage, settings, and the notes manager for one CLI run.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::manager::{LoadState, NotesManager};
use crate::notify::StderrNotifier;
use crate::settings::{FsBackends, Language, Settings};
use crate::storage::{KeyValueProvider, StorageProvider, StorageService};

/// File name of the local store inside the data directory.
pub const STORE_FILE: &str = "store.db";

/// An opened store with settings restored and notes loaded.
pub struct Session {
    pub settings: Settings,
    pub manager: NotesManager,
    store_path: PathBuf,
}

impl Session {
    /// Opens `<data_dir>/store.db`, restores settings, and loads notes from
    /// whichever backend the settings select.
    pub fn open(data_dir: &Path, default_language: Language) -> Result<Self> {
        let store_path = data_dir.join(STORE_FILE);
        let local: Rc<dyn StorageProvider> = Rc::new(
            KeyValueProvider::open(&store_path)
                .with_context(|| format!("failed to open store at {}", store_path.display()))?,
        );
        let storage = Rc::new(StorageService::new(Rc::clone(&local), local));

        let mut settings = Settings::new(Rc::clone(&storage), Box::new(FsBackends::new(&store_path)));
        settings.bootstrap(default_language);

        let mut manager = NotesManager::new(storage, Box::new(StderrNotifier));
        manager.sync();

        Ok(Self {
            settings,
            manager,
            store_path,
        })
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    pub fn language(&self) -> Language {
        self.settings.language()
    }

    /// Reloads notes if the storage configuration changed.
    pub fn sync(&mut self) -> LoadState {
        self.manager.sync()
    }

    /// Fails unless notes are loaded and writable.
    pub fn require_ready(&self) -> Result<()> {
        match self.manager.state() {
            LoadState::Ready => Ok(()),
            LoadState::PermissionPending => {
                bail!("the notes directory needs write access; run `notes storage grant`")
            }
            LoadState::Failed => bail!("notes could not be loaded"),
            LoadState::Uninitialized | LoadState::Loading => bail!("notes are still loading"),
        }
    }
}
