//! Storage layer
//!
//! Store traits the association engine depends on, and their SQLite
//! implementation.
//!
//! ## Architecture
//!
//! - **stores**: `WordStore`, `NotationStore`, `SentenceStore`, `AssociationStore`
//! - **sqlite**: `SqliteStore`, one connection implementing all four
//! - **schema**: table definitions and version tracking

pub mod error;
pub mod schema;
pub mod sqlite;
pub mod stores;

pub use error::{StorageError, StorageResult};
pub use schema::{init_schema, needs_init, SCHEMA_VERSION};
pub use sqlite::SqliteStore;
pub use stores::{AssociationStore, NotationStore, SentenceStore, VocabularyStore, WordStore};
