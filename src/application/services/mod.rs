//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, KeyValueStore, Clock)
//! but are themselves concrete structs, not traits.

mod exchange;
mod persistence;
mod session;

pub use exchange::{
    ExchangeService, ExportFormat, CSV_HEADER, DEFAULT_EXPORT_PREFIX, TIMESTAMP_FORMAT,
};
pub use persistence::{LoadOutcome, PersistenceService, DEFAULT_STORAGE_KEY};
pub use session::{GuestListSession, Persisted};
