//! Persistence service
//!
//! Bridges the in-memory document and the single storage slot.

use std::io;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{validate, validate_document, Document, ValidationMode};
use crate::infrastructure::traits::KeyValueStore;

/// Default storage key for the guest list.
pub const DEFAULT_STORAGE_KEY: &str = "formData";

/// Result of hydrating a document that tolerates a corrupt slot.
#[derive(Debug)]
pub struct LoadOutcome {
    pub document: Document,
    /// `CorruptStoredState` when the stored value had to be discarded
    pub warning: Option<ApplicationError>,
}

/// Service for loading and saving the document under one key.
pub struct PersistenceService {
    store: Arc<dyn KeyValueStore>,
    key: String,
    mode: ValidationMode,
}

impl PersistenceService {
    /// Create a new persistence service.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, mode: ValidationMode) -> Self {
        Self {
            store,
            key: key.into(),
            mode,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Read the stored document.
    ///
    /// Absent → empty document. Present but not text, unparseable or
    /// invalid → `CorruptStoredState`.
    pub fn load(&self) -> ApplicationResult<Document> {
        let raw = match self.store.get(&self.key) {
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Err(ApplicationError::CorruptStoredState {
                    key: self.key.clone(),
                    reason: format!("not valid UTF-8: {e}"),
                });
            }
            other => other.or_storage_unavailable(&self.key)?,
        };
        let Some(raw) = raw else {
            debug!("load: key={} absent, starting empty", self.key);
            return Ok(Document::default());
        };

        let value: serde_json::Value =
            serde_json::from_str(&raw).map_err(|e| ApplicationError::CorruptStoredState {
                key: self.key.clone(),
                reason: format!("not valid JSON: {e}"),
            })?;

        let document =
            validate(&value, self.mode).map_err(|e| ApplicationError::CorruptStoredState {
                key: self.key.clone(),
                reason: e.to_string(),
            })?;

        debug!(
            "load: key={} students={} teachers={}",
            self.key,
            document.students.len(),
            document.teachers.len()
        );
        Ok(document)
    }

    /// Like [`load`](Self::load), but a corrupt or unreadable slot yields the
    /// empty document plus the error as a warning.
    pub fn load_or_empty(&self) -> LoadOutcome {
        match self.load() {
            Ok(document) => LoadOutcome {
                document,
                warning: None,
            },
            Err(e) => {
                warn!("load: falling back to empty document: {e}");
                LoadOutcome {
                    document: Document::default(),
                    warning: Some(e),
                }
            }
        }
    }

    /// Validate and write the canonical JSON serialization.
    pub fn save(&self, document: &Document) -> ApplicationResult<()> {
        validate_document(document)?;
        let json = serde_json::to_string(document).map_err(|e| ApplicationError::OperationFailed {
            context: "serialize document".to_string(),
            source: Box::new(e),
        })?;
        self.store
            .set(&self.key, &json)
            .or_storage_unavailable(&self.key)?;
        debug!("save: key={} bytes={}", self.key, json.len());
        Ok(())
    }

    /// Drop the stored value.
    pub fn clear(&self) -> ApplicationResult<()> {
        self.store
            .remove(&self.key)
            .or_storage_unavailable(&self.key)?;
        debug!("clear: key={}", self.key);
        Ok(())
    }
}
