//! Wordlink Core Library
//!
//! This crate provides the core functionality for wordlink, a personal
//! vocabulary tracker that finds the words you recorded inside the example
//! sentences you recorded.
//!
//! # Architecture
//!
//! - **Stores**: plain CRUD over words, notations, sentences and the derived
//!   sentence-word associations (SQLite)
//! - **Engine**: rescans text after every change so that an association
//!   exists exactly when a sentence contains a word or one of its notations
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let service = VocabularyService::open(&config)?;
//!
//! let word = service.create_word(config.owner_id, &NewWord::new("りんご"))?;
//! service.create_notation(config.owner_id, word.id, "林檎")?;
//! service.create_sentence(config.owner_id, "林檎を食べた")?;
//!
//! let linked = service.associated_sentences_with_links(config.owner_id, word.id)?;
//! ```
//!
//! # Modules
//!
//! - `service`: Mutation entry point that keeps associations current
//! - `engine`: Scanning, association rebuilds and link rendering
//! - `deriver`: Root-form notations from inflectional suffixes
//! - `models`: Data structures for words, notations and sentences
//! - `storage`: Store traits and the SQLite implementation
//! - `config`: Application configuration

pub mod config;
pub mod deriver;
pub mod engine;
pub mod models;
pub mod service;
pub mod storage;

pub use config::Config;
pub use deriver::derive_roots;
pub use engine::{AssociationEngine, RenderMode};
pub use models::{
    NewWord, Notation, NotationId, OwnerId, Sentence, SentenceId,
    SentenceWithLinks, Word, WordId, WordWithNotations,
};
pub use service::VocabularyService;
pub use storage::{SqliteStore, StorageError, StorageResult, VocabularyStore};
