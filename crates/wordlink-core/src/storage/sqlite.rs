//! SQLite-backed stores
//!
//! `SqliteStore` implements every store trait over a single connection.
//!
//! ## Tables
//!
//! - `words` - Word records (`word`, `memo`, `user_id`)
//! - `notations` - Alternate forms, unique per `(word_id, notation)`
//! - `sentences` - Sentence records (`sentence`, `user_id`)
//! - `sentences_words` - Derived sentence-word edges
//!
//! Timestamps are stored as integer milliseconds.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use tracing::debug;

use crate::config::Config;
use crate::models::{Notation, NotationId, OwnerId, Sentence, SentenceId, Word, WordId};
use crate::storage::schema::{get_schema_version, init_schema, needs_init, SCHEMA_VERSION};
use crate::storage::stores::{AssociationStore, NotationStore, SentenceStore, WordStore};
use crate::storage::{StorageError, StorageResult};

const WORD_COLUMNS: &str = "id, word, memo, user_id, created_at, updated_at";
const NOTATION_COLUMNS: &str = "id, word_id, notation, created_at, updated_at";
const SENTENCE_COLUMNS: &str = "id, sentence, user_id, created_at, updated_at";

/// SQLite store for words, notations, sentences and their associations
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create the database at the configured location
    pub fn open(config: &Config) -> StorageResult<Self> {
        Self::open_path(&config.sqlite_path())
    }

    /// Open or create the database at `path`
    pub fn open_path(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StorageError::from_io(e, parent.to_path_buf()))?;
        }

        let conn = Connection::open(path)?;
        debug!("Opened SQLite database at {:?}", path);
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        // Cascading deletes of notations and edges rely on this
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        if let Ok(Some(found)) = get_schema_version(&conn) {
            if found > SCHEMA_VERSION {
                return Err(StorageError::UnsupportedSchemaVersion {
                    found,
                    supported: SCHEMA_VERSION,
                });
            }
        }

        if needs_init(&conn) {
            init_schema(&conn)?;
        }

        Ok(Self { conn })
    }

    /// Get a reference to the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn fetch_notation(&self, sql: &str, params: impl rusqlite::Params) -> StorageResult<Option<Notation>> {
        self.conn
            .query_row(sql, params, notation_from_row)
            .optional()
            .map_err(Into::into)
    }
}

impl WordStore for SqliteStore {
    fn list_words(&self, owner_id: OwnerId) -> StorageResult<Vec<Word>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {WORD_COLUMNS} FROM words WHERE user_id = ? ORDER BY id"
        ))?;
        let words = stmt
            .query_map(params![owner_id], word_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(words)
    }

    fn get_word(&self, owner_id: OwnerId, id: WordId) -> StorageResult<Option<Word>> {
        self.conn
            .query_row(
                &format!("SELECT {WORD_COLUMNS} FROM words WHERE id = ? AND user_id = ?"),
                params![id, owner_id],
                word_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    fn insert_word(&self, text: &str, memo: &str, owner_id: OwnerId) -> StorageResult<Word> {
        let now = now_millis();
        self.conn.execute(
            "INSERT INTO words (word, memo, user_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            params![text, memo, owner_id, now, now],
        )?;

        Ok(Word {
            id: self.conn.last_insert_rowid(),
            text: text.to_string(),
            memo: memo.to_string(),
            owner_id,
            created_at: timestamp(now),
            updated_at: timestamp(now),
        })
    }

    fn update_word(
        &self,
        id: WordId,
        text: &str,
        memo: &str,
        owner_id: OwnerId,
    ) -> StorageResult<Option<Word>> {
        let changed = self.conn.execute(
            "UPDATE words SET word = ?, memo = ?, updated_at = ? WHERE id = ? AND user_id = ?",
            params![text, memo, now_millis(), id, owner_id],
        )?;

        if changed == 0 {
            return Ok(None);
        }
        self.get_word(owner_id, id)
    }

    fn delete_word(&self, owner_id: OwnerId, id: WordId) -> StorageResult<Option<Word>> {
        let Some(word) = self.get_word(owner_id, id)? else {
            return Ok(None);
        };

        self.conn.execute(
            "DELETE FROM words WHERE id = ? AND user_id = ?",
            params![id, owner_id],
        )?;
        Ok(Some(word))
    }

    fn is_word_owner(&self, id: WordId, owner_id: OwnerId) -> StorageResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM words WHERE id = ? AND user_id = ?",
            params![id, owner_id],
            |row| row.get(0),
        )?;
        Ok(count == 1)
    }

    fn count_words(&self, owner_id: OwnerId) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM words WHERE user_id = ?",
            params![owner_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

impl NotationStore for SqliteStore {
    fn list_notations(&self, word_id: WordId) -> StorageResult<Vec<Notation>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {NOTATION_COLUMNS} FROM notations WHERE word_id = ? ORDER BY id"
        ))?;
        let notations = stmt
            .query_map(params![word_id], notation_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(notations)
    }

    fn get_notation(&self, id: NotationId) -> StorageResult<Option<Notation>> {
        self.fetch_notation(
            &format!("SELECT {NOTATION_COLUMNS} FROM notations WHERE id = ?"),
            params![id],
        )
    }

    fn insert_notation_if_absent(
        &self,
        word_id: WordId,
        text: &str,
    ) -> StorageResult<Option<Notation>> {
        let now = now_millis();
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO notations (word_id, notation, created_at, updated_at) VALUES (?, ?, ?, ?)",
            params![word_id, text, now, now],
        )?;

        if inserted == 0 {
            return Ok(None);
        }

        Ok(Some(Notation {
            id: self.conn.last_insert_rowid(),
            word_id,
            text: text.to_string(),
            created_at: timestamp(now),
            updated_at: timestamp(now),
        }))
    }

    fn update_notation(&self, id: NotationId, text: &str) -> StorageResult<Option<Notation>> {
        self.conn.execute(
            "UPDATE OR IGNORE notations SET notation = ?, updated_at = ? WHERE id = ?",
            params![text, now_millis(), id],
        )?;
        self.get_notation(id)
    }

    fn delete_notation(&self, id: NotationId) -> StorageResult<Option<Notation>> {
        let Some(notation) = self.get_notation(id)? else {
            return Ok(None);
        };

        self.conn
            .execute("DELETE FROM notations WHERE id = ?", params![id])?;
        Ok(Some(notation))
    }

    fn delete_notation_if_exists(
        &self,
        word_id: WordId,
        text: &str,
    ) -> StorageResult<Option<Notation>> {
        let existing = self.fetch_notation(
            &format!("SELECT {NOTATION_COLUMNS} FROM notations WHERE word_id = ? AND notation = ?"),
            params![word_id, text],
        )?;

        match existing {
            Some(notation) => self.delete_notation(notation.id),
            None => Ok(None),
        }
    }
}

impl SentenceStore for SqliteStore {
    fn list_sentences(&self, owner_id: OwnerId) -> StorageResult<Vec<Sentence>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SENTENCE_COLUMNS} FROM sentences WHERE user_id = ? ORDER BY id"
        ))?;
        let sentences = stmt
            .query_map(params![owner_id], sentence_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sentences)
    }

    fn get_sentence(&self, owner_id: OwnerId, id: SentenceId) -> StorageResult<Option<Sentence>> {
        self.conn
            .query_row(
                &format!("SELECT {SENTENCE_COLUMNS} FROM sentences WHERE id = ? AND user_id = ?"),
                params![id, owner_id],
                sentence_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    fn insert_sentence(&self, text: &str, owner_id: OwnerId) -> StorageResult<Sentence> {
        let now = now_millis();
        self.conn.execute(
            "INSERT INTO sentences (sentence, user_id, created_at, updated_at) VALUES (?, ?, ?, ?)",
            params![text, owner_id, now, now],
        )?;

        Ok(Sentence {
            id: self.conn.last_insert_rowid(),
            text: text.to_string(),
            owner_id,
            created_at: timestamp(now),
            updated_at: timestamp(now),
        })
    }

    fn update_sentence(
        &self,
        id: SentenceId,
        text: &str,
        owner_id: OwnerId,
    ) -> StorageResult<Option<Sentence>> {
        let changed = self.conn.execute(
            "UPDATE sentences SET sentence = ?, updated_at = ? WHERE id = ? AND user_id = ?",
            params![text, now_millis(), id, owner_id],
        )?;

        if changed == 0 {
            return Ok(None);
        }
        self.get_sentence(owner_id, id)
    }

    fn delete_sentence(
        &self,
        owner_id: OwnerId,
        id: SentenceId,
    ) -> StorageResult<Option<Sentence>> {
        let Some(sentence) = self.get_sentence(owner_id, id)? else {
            return Ok(None);
        };

        self.conn.execute(
            "DELETE FROM sentences WHERE id = ? AND user_id = ?",
            params![id, owner_id],
        )?;
        Ok(Some(sentence))
    }

    fn is_sentence_owner(&self, id: SentenceId, owner_id: OwnerId) -> StorageResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sentences WHERE id = ? AND user_id = ?",
            params![id, owner_id],
            |row| row.get(0),
        )?;
        Ok(count == 1)
    }

    fn count_sentences(&self, owner_id: OwnerId) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sentences WHERE user_id = ?",
            params![owner_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

impl AssociationStore for SqliteStore {
    fn insert_association_if_absent(
        &self,
        sentence_id: SentenceId,
        word_id: WordId,
    ) -> StorageResult<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO sentences_words (sentence_id, word_id) VALUES (?, ?)",
            params![sentence_id, word_id],
        )?;
        Ok(inserted > 0)
    }

    fn delete_associations_for_word(&self, word_id: WordId) -> StorageResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM sentences_words WHERE word_id = ?", params![word_id])?;
        Ok(removed)
    }

    fn delete_associations_for_sentence(&self, sentence_id: SentenceId) -> StorageResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM sentences_words WHERE sentence_id = ?",
            params![sentence_id],
        )?;
        Ok(removed)
    }

    fn list_sentences_for_word(&self, word_id: WordId) -> StorageResult<Vec<Sentence>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT s.id, s.sentence, s.user_id, s.created_at, s.updated_at
            FROM sentences_words sw
            JOIN sentences s ON sw.sentence_id = s.id
            WHERE sw.word_id = ?
            ORDER BY s.id
            "#,
        )?;
        let sentences = stmt
            .query_map(params![word_id], sentence_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sentences)
    }

    fn list_words_for_sentence(&self, sentence_id: SentenceId) -> StorageResult<Vec<Word>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT w.id, w.word, w.memo, w.user_id, w.created_at, w.updated_at
            FROM sentences_words sw
            JOIN words w ON sw.word_id = w.id
            WHERE sw.sentence_id = ?
            ORDER BY w.id
            "#,
        )?;
        let words = stmt
            .query_map(params![sentence_id], word_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(words)
    }
}

// ==================== Row mapping ====================

fn word_from_row(row: &Row) -> rusqlite::Result<Word> {
    Ok(Word {
        id: row.get(0)?,
        text: row.get(1)?,
        memo: row.get(2)?,
        owner_id: row.get(3)?,
        created_at: timestamp(row.get(4)?),
        updated_at: timestamp(row.get(5)?),
    })
}

fn notation_from_row(row: &Row) -> rusqlite::Result<Notation> {
    Ok(Notation {
        id: row.get(0)?,
        word_id: row.get(1)?,
        text: row.get(2)?,
        created_at: timestamp(row.get(3)?),
        updated_at: timestamp(row.get(4)?),
    })
}

fn sentence_from_row(row: &Row) -> rusqlite::Result<Sentence> {
    Ok(Sentence {
        id: row.get(0)?,
        text: row.get(1)?,
        owner_id: row.get(2)?,
        created_at: timestamp(row.get(3)?),
        updated_at: timestamp(row.get(4)?),
    })
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn timestamp(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    #[test]
    fn test_insert_and_get_word() {
        let store = store();
        let word = store.insert_word("買う", "to buy", 1).unwrap();

        let fetched = store.get_word(1, word.id).unwrap().unwrap();
        assert_eq!(fetched, word);
        assert_eq!(fetched.memo, "to buy");
    }

    #[test]
    fn test_get_word_of_other_owner_is_none() {
        let store = store();
        let word = store.insert_word("買う", "", 1).unwrap();

        assert!(store.get_word(2, word.id).unwrap().is_none());
        assert!(!store.is_word_owner(word.id, 2).unwrap());
        assert!(store.is_word_owner(word.id, 1).unwrap());
    }

    #[test]
    fn test_list_words_scoped_by_owner() {
        let store = store();
        store.insert_word("赤い", "", 1).unwrap();
        store.insert_word("青い", "", 1).unwrap();
        store.insert_word("白い", "", 2).unwrap();

        let words = store.list_words(1).unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].text, "赤い");
        assert_eq!(store.count_words(2).unwrap(), 1);
    }

    #[test]
    fn test_update_word_requires_owner() {
        let store = store();
        let word = store.insert_word("赤い", "", 1).unwrap();

        assert!(store.update_word(word.id, "青い", "", 2).unwrap().is_none());

        let updated = store.update_word(word.id, "青い", "blue", 1).unwrap().unwrap();
        assert_eq!(updated.text, "青い");
        assert_eq!(updated.memo, "blue");
    }

    #[test]
    fn test_delete_word_cascades() {
        let store = store();
        let word = store.insert_word("りんご", "", 1).unwrap();
        let sentence = store.insert_sentence("りんごを食べた", 1).unwrap();
        store.insert_notation_if_absent(word.id, "林檎").unwrap();
        store
            .insert_association_if_absent(sentence.id, word.id)
            .unwrap();

        assert!(store.delete_word(2, word.id).unwrap().is_none());
        let deleted = store.delete_word(1, word.id).unwrap().unwrap();
        assert_eq!(deleted.id, word.id);

        assert!(store.list_notations(word.id).unwrap().is_empty());
        assert!(store.list_words_for_sentence(sentence.id).unwrap().is_empty());
    }

    #[test]
    fn test_notation_insert_if_absent() {
        let store = store();
        let word = store.insert_word("買う", "", 1).unwrap();

        let first = store.insert_notation_if_absent(word.id, "買").unwrap();
        assert!(first.is_some());

        let second = store.insert_notation_if_absent(word.id, "買").unwrap();
        assert!(second.is_none());

        assert_eq!(store.list_notations(word.id).unwrap().len(), 1);
    }

    #[test]
    fn test_update_notation_onto_sibling_is_ignored() {
        let store = store();
        let word = store.insert_word("りんご", "", 1).unwrap();
        store.insert_notation_if_absent(word.id, "林檎").unwrap();
        let other = store
            .insert_notation_if_absent(word.id, "リンゴ")
            .unwrap()
            .unwrap();

        let result = store.update_notation(other.id, "林檎").unwrap().unwrap();
        assert_eq!(result.text, "リンゴ");

        let renamed = store.update_notation(other.id, "苹果").unwrap().unwrap();
        assert_eq!(renamed.text, "苹果");

        assert!(store.update_notation(9999, "x").unwrap().is_none());
    }

    #[test]
    fn test_delete_notation_if_exists() {
        let store = store();
        let word = store.insert_word("走る", "", 1).unwrap();
        store.insert_notation_if_absent(word.id, "走").unwrap();

        assert!(store
            .delete_notation_if_exists(word.id, "走")
            .unwrap()
            .is_some());
        // Second delete is a no-op
        assert!(store
            .delete_notation_if_exists(word.id, "走")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_association_insert_if_absent() {
        let store = store();
        let word = store.insert_word("赤い", "", 1).unwrap();
        let sentence = store.insert_sentence("赤いリンゴ", 1).unwrap();

        assert!(store
            .insert_association_if_absent(sentence.id, word.id)
            .unwrap());
        assert!(!store
            .insert_association_if_absent(sentence.id, word.id)
            .unwrap());

        let sentences = store.list_sentences_for_word(word.id).unwrap();
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].id, sentence.id);

        assert_eq!(store.delete_associations_for_word(word.id).unwrap(), 1);
        assert!(store.list_sentences_for_word(word.id).unwrap().is_empty());
    }

    #[test]
    fn test_delete_sentence_cascades() {
        let store = store();
        let word = store.insert_word("赤い", "", 1).unwrap();
        let sentence = store.insert_sentence("赤いリンゴ", 1).unwrap();
        store
            .insert_association_if_absent(sentence.id, word.id)
            .unwrap();

        store.delete_sentence(1, sentence.id).unwrap().unwrap();

        assert!(store.list_sentences_for_word(word.id).unwrap().is_empty());
        assert_eq!(store.count_sentences(1).unwrap(), 0);
    }

    #[test]
    fn test_open_path_persists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("wordlink.db");

        {
            let store = SqliteStore::open_path(&path).unwrap();
            store.insert_sentence("猫が寝ている", 1).unwrap();
        }

        let store = SqliteStore::open_path(&path).unwrap();
        assert_eq!(store.count_sentences(1).unwrap(), 1);
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("wordlink.db");

        {
            let store = SqliteStore::open_path(&path).unwrap();
            store
                .connection()
                .execute(
                    "UPDATE schema_info SET value = '99' WHERE key = 'version'",
                    [],
                )
                .unwrap();
        }

        let result = SqliteStore::open_path(&path);
        assert!(matches!(
            result,
            Err(StorageError::UnsupportedSchemaVersion { found: 99, .. })
        ));
    }
}
