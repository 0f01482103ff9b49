//! Guest list session
//!
//! Owns the in-memory document for one session. Every accepted change is
//! validated first and then saved explicitly; a rejected change leaves the
//! document untouched.

use tracing::{debug, info, warn};

use crate::application::services::persistence::PersistenceService;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{validate_document, Document, DomainResult};

/// Where an accepted change ended up.
#[derive(Debug)]
pub enum Persisted {
    /// Written to the store
    Saved,
    /// Store unavailable; the change only lives in memory
    MemoryOnly(ApplicationError),
}

impl Persisted {
    pub fn is_saved(&self) -> bool {
        matches!(self, Persisted::Saved)
    }
}

pub struct GuestListSession {
    persistence: PersistenceService,
    document: Document,
}

impl GuestListSession {
    /// Hydrate from the store. A corrupt or unreadable slot starts the
    /// session empty and is returned as a warning.
    pub fn open(persistence: PersistenceService) -> (Self, Option<ApplicationError>) {
        let outcome = persistence.load_or_empty();
        let session = Self {
            persistence,
            document: outcome.document,
        };
        (session, outcome.warning)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Apply `change` to a copy of the document and commit it if the result
    /// validates.
    pub fn edit<F>(&mut self, change: F) -> ApplicationResult<Persisted>
    where
        F: FnOnce(&mut Document) -> DomainResult<()>,
    {
        let mut candidate = self.document.clone();
        change(&mut candidate)?;
        self.commit(candidate)
    }

    /// Replace the whole document, e.g. after an import.
    pub fn replace(&mut self, document: Document) -> ApplicationResult<Persisted> {
        info!(
            "replace: {} students, {} teachers",
            document.students.len(),
            document.teachers.len()
        );
        self.commit(document)
    }

    /// Clear the store and start over with an empty document.
    pub fn reset(&mut self) -> ApplicationResult<()> {
        self.persistence.clear()?;
        self.document = Document::default();
        Ok(())
    }

    fn commit(&mut self, candidate: Document) -> ApplicationResult<Persisted> {
        validate_document(&candidate)?;
        self.document = candidate;
        match self.persistence.save(&self.document) {
            Ok(()) => {
                debug!("commit: saved");
                Ok(Persisted::Saved)
            }
            Err(e @ ApplicationError::StorageUnavailable { .. }) => {
                warn!("commit: keeping change in memory only: {e}");
                Ok(Persisted::MemoryOnly(e))
            }
            Err(e) => Err(e),
        }
    }
}
