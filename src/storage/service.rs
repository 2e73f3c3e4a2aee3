//! Process-wide indirection over the active storage provider.

use super::{StorageProvider, StorageResult};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::info;

/// Holds the swappable data provider and the fixed settings provider.
///
/// Notes and tags go through [`current`](Self::current), which can be
/// replaced at runtime. Global settings always go through
/// [`settings`](Self::settings), which never changes: they must be readable
/// before any directory has been granted.
///
/// Shared by `Rc` between the settings controller and the notes manager.
/// Everything runs on one thread, so the slot is a `RefCell` and each swap
/// bumps a generation counter that readers compare to notice the change.
pub struct StorageService {
    current: RefCell<Rc<dyn StorageProvider>>,
    settings: Rc<dyn StorageProvider>,
    generation: Cell<u64>,
}

impl StorageService {
    pub fn new(settings: Rc<dyn StorageProvider>, initial: Rc<dyn StorageProvider>) -> Self {
        Self {
            current: RefCell::new(initial),
            settings,
            generation: Cell::new(0),
        }
    }

    /// Initializes `provider` and makes it the current one.
    ///
    /// # Errors
    ///
    /// Returns the provider's `init` error; the previous provider stays
    /// current in that case.
    pub fn set_provider(&self, provider: Rc<dyn StorageProvider>) -> StorageResult<()> {
        provider.init()?;
        info!(backend = %provider.describe(), "switched storage provider");
        *self.current.borrow_mut() = provider;
        self.generation.set(self.generation.get() + 1);
        Ok(())
    }

    /// Returns the provider used for notes and tags.
    pub fn current(&self) -> Rc<dyn StorageProvider> {
        Rc::clone(&self.current.borrow())
    }

    /// Returns the provider reserved for global settings.
    pub fn settings(&self) -> &dyn StorageProvider {
        self.settings.as_ref()
    }

    /// Counter bumped on every provider swap.
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }
}
