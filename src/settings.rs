//! Global settings: storage mode, selected directory, and language.
//!
//! Settings live in the fixed settings provider so they can be read before a
//! directory grant exists. Choosing a storage mode swaps the current provider
//! on the shared [`StorageService`]; the notes manager picks that up on its
//! next sync.

use crate::storage::{
    DirectoryHandle, DirectoryPicker, DirectoryProvider, FsDirectoryHandle, KeyValueProvider,
    StorageError, StorageExt, StorageProvider, StorageResult, StorageService, keys,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Where notes and tags are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    #[default]
    Local,
    Files,
}

/// Display language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Pt,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::En => write!(f, "en"),
            Language::Pt => write!(f, "pt"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "pt" => Ok(Language::Pt),
            other => Err(format!("unsupported language '{other}' (expected en or pt)")),
        }
    }
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageMode::Local => write!(f, "local"),
            StorageMode::Files => write!(f, "files"),
        }
    }
}

/// Errors from settings operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("directory picker failed: {0}")]
    Picker(#[source] std::io::Error),

    #[error("no directory has been selected")]
    NoDirectory,
}

/// Opens the concrete backends settings switch between.
pub trait Backends {
    /// Opens the local key-value provider.
    fn local(&self) -> StorageResult<Rc<dyn StorageProvider>>;

    /// Reopens a directory selected in an earlier session.
    fn reopen_directory(&self, path: &Path) -> Box<dyn DirectoryHandle>;
}

/// Backends on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsBackends {
    store_path: PathBuf,
}

impl FsBackends {
    /// `store_path` is the local key-value store file.
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
        }
    }
}

impl Backends for FsBackends {
    fn local(&self) -> StorageResult<Rc<dyn StorageProvider>> {
        Ok(Rc::new(KeyValueProvider::open(&self.store_path)?))
    }

    fn reopen_directory(&self, path: &Path) -> Box<dyn DirectoryHandle> {
        Box::new(FsDirectoryHandle::new(path))
    }
}

/// Snapshot of the settings state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsStatus {
    pub storage_mode: StorageMode,
    pub directory: Option<String>,
    pub needs_permission: bool,
    pub language: Language,
}

/// Settings controller.
pub struct Settings {
    storage: Rc<StorageService>,
    backends: Box<dyn Backends>,
    mode: StorageMode,
    directory: Option<String>,
    needs_permission: bool,
    language: Language,
    initializing: bool,
}

impl Settings {
    pub fn new(storage: Rc<StorageService>, backends: Box<dyn Backends>) -> Self {
        Self {
            storage,
            backends,
            mode: StorageMode::Local,
            directory: None,
            needs_permission: false,
            language: Language::En,
            initializing: true,
        }
    }

    /// Restores the saved language and storage mode.
    ///
    /// With `files` mode and a saved directory, installs the directory
    /// provider without prompting and flags `needs_permission` when access
    /// is not granted yet. A `files` mode with no saved directory falls back
    /// to `local`. Failures are logged and leave the mode at `local`.
    pub fn bootstrap(&mut self, default_language: Language) {
        self.language = self.storage.settings().get(keys::LANGUAGE, default_language);

        if let Err(err) = self.restore_storage_mode() {
            error!(error = %err, "settings initialization failed");
            self.mode = StorageMode::Local;
            self.directory = None;
            self.needs_permission = false;
        }
        self.initializing = false;
        debug!(mode = %self.mode, needs_permission = self.needs_permission, "settings restored");
    }

    fn restore_storage_mode(&mut self) -> Result<(), SettingsError> {
        let saved: StorageMode = self.storage.settings().get(keys::STORAGE_MODE, StorageMode::Local);
        if saved != StorageMode::Files {
            self.mode = StorageMode::Local;
            return Ok(());
        }

        let Some(path) = self.saved_directory() else {
            warn!("files storage selected but no directory saved; using local storage");
            self.mode = StorageMode::Local;
            return Ok(());
        };

        let handle = self.backends.reopen_directory(&path);
        let name = handle.name();
        let provider: Rc<dyn StorageProvider> = Rc::new(DirectoryProvider::new(handle));
        self.storage.set_provider(Rc::clone(&provider))?;

        let granted = provider.has_permission()?;
        self.mode = StorageMode::Files;
        self.directory = Some(name);
        self.needs_permission = !granted;
        Ok(())
    }

    fn saved_directory(&self) -> Option<PathBuf> {
        self.storage.settings().get(keys::FILE_HANDLE, None)
    }

    /// Asks for write access to the saved directory.
    ///
    /// On success the directory provider is reinstalled, which makes the
    /// notes manager reload. Returns whether access was granted.
    pub fn request_permission(&mut self) -> Result<bool, SettingsError> {
        let path = self.saved_directory().ok_or(SettingsError::NoDirectory)?;
        let handle = self.backends.reopen_directory(&path);
        let provider: Rc<dyn StorageProvider> = Rc::new(DirectoryProvider::new(handle));

        let granted = provider.request_permission()?;
        if granted {
            self.storage.set_provider(provider)?;
            self.needs_permission = false;
            info!(directory = %path.display(), "directory access granted");
        }
        Ok(granted)
    }

    /// Lets the user pick a directory and switches storage to it.
    ///
    /// Returns `Ok(false)` if the user dismissed the picker; nothing changes.
    pub fn select_directory(&mut self, picker: &mut dyn DirectoryPicker) -> Result<bool, SettingsError> {
        let handle = match picker.pick().map_err(SettingsError::Picker)? {
            Some(handle) => handle,
            None => {
                debug!("directory selection cancelled");
                return Ok(false);
            }
        };

        let name = handle.name();
        let path = handle.path().to_path_buf();
        let provider: Rc<dyn StorageProvider> = Rc::new(DirectoryProvider::new(handle));
        // Picking the directory is the user's consent; ask while we have it.
        let granted = provider.request_permission()?;
        self.storage.set_provider(provider)?;

        self.storage.settings().set(keys::FILE_HANDLE, &path);
        self.storage.settings().set(keys::STORAGE_MODE, &StorageMode::Files);
        self.mode = StorageMode::Files;
        self.directory = Some(name);
        self.needs_permission = !granted;
        info!(directory = %path.display(), "storing notes in directory");
        Ok(true)
    }

    /// Switches storage mode. `Files` goes through the directory picker.
    ///
    /// Returns whether the mode changed.
    pub fn set_storage_mode(
        &mut self,
        mode: StorageMode,
        picker: &mut dyn DirectoryPicker,
    ) -> Result<bool, SettingsError> {
        match mode {
            StorageMode::Local => {
                self.storage.set_provider(self.backends.local()?)?;
                self.storage.settings().set(keys::STORAGE_MODE, &StorageMode::Local);
                self.mode = StorageMode::Local;
                self.directory = None;
                self.needs_permission = false;
                Ok(true)
            }
            StorageMode::Files => self.select_directory(picker),
        }
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        self.storage.settings().set(keys::LANGUAGE, &language);
    }

    pub fn storage_mode(&self) -> StorageMode {
        self.mode
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn needs_permission(&self) -> bool {
        self.needs_permission
    }

    pub fn is_initializing(&self) -> bool {
        self.initializing
    }

    pub fn status(&self) -> SettingsStatus {
        SettingsStatus {
            storage_mode: self.mode,
            directory: self.directory.clone(),
            needs_permission: self.needs_permission,
            language: self.language,
        }
    }
}
