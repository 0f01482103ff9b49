//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{ExchangeService, GuestListSession, PersistenceService};
use crate::application::ApplicationError;
use crate::config::Settings;
use crate::infrastructure::traits::{
    Clock, FileStore, FileSystem, KeyValueStore, RealFileSystem, SystemClock,
};

/// Container holding the boundary implementations and building services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Storage slot backing the session
    pub store: Arc<dyn KeyValueStore>,

    /// Clock for export timestamps
    pub clock: Arc<dyn Clock>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let store = Arc::new(FileStore::new(settings.data_dir.clone(), fs.clone()));
        Self::with_deps(settings, fs, store, Arc::new(SystemClock))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            store,
            clock,
        }
    }

    pub fn persistence(&self) -> PersistenceService {
        PersistenceService::new(
            self.store.clone(),
            self.settings.storage_key.clone(),
            self.settings.validation_mode(),
        )
    }

    pub fn exchange(&self) -> ExchangeService {
        ExchangeService::new(
            self.fs.clone(),
            self.clock.clone(),
            self.settings.export.prefix.clone(),
            self.settings.validation_mode(),
        )
    }

    /// Open a session hydrated from the store.
    pub fn open_session(&self) -> (GuestListSession, Option<ApplicationError>) {
        GuestListSession::open(self.persistence())
    }
}
