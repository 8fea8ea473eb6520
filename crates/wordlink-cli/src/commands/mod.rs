//! Command handlers

use wordlink_core::{SqliteStore, VocabularyService};

pub mod config;
pub mod notation;
pub mod sentence;
pub mod status;
pub mod word;

/// The service every command runs against
pub type Service = VocabularyService<SqliteStore>;

/// Non-empty, non-comment lines of an import file
pub(crate) fn import_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}
