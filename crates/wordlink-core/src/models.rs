//! Data models for wordlink
//!
//! Defines the core data structures: Word, Notation, Sentence and the
//! read models built from them.
//! Every Word and Sentence belongs to an owner; a Notation inherits the
//! owner of its Word.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of the user that owns words and sentences
pub type OwnerId = i64;
/// Identifier of a word
pub type WordId = i64;
/// Identifier of a notation
pub type NotationId = i64;
/// Identifier of a sentence
pub type SentenceId = i64;

/// A vocabulary entry recorded by a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Word {
    /// Unique identifier
    pub id: WordId,
    /// The word as written
    pub text: String,
    /// Free-form memo (meaning, reading, ...)
    pub memo: String,
    /// Owning user
    pub owner_id: OwnerId,
    /// When this word was created
    pub created_at: DateTime<Utc>,
    /// When this word was last updated
    pub updated_at: DateTime<Utc>,
}

impl Word {
    /// Create a word with a specific ID
    #[cfg(test)]
    pub fn with_id(id: WordId, owner_id: OwnerId, text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            text: text.into(),
            memo: String::new(),
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the memo
    #[cfg(test)]
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }
}

/// An alternate surface form of a word, used to widen matching
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notation {
    /// Unique identifier
    pub id: NotationId,
    /// The word this notation belongs to
    pub word_id: WordId,
    /// The alternate text
    pub text: String,
    /// When this notation was created
    pub created_at: DateTime<Utc>,
    /// When this notation was last updated
    pub updated_at: DateTime<Utc>,
}

impl Notation {
    /// Create a notation with a specific ID
    #[cfg(test)]
    pub fn with_id(id: NotationId, word_id: WordId, text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            word_id,
            text: text.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// An example sentence recorded by a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sentence {
    /// Unique identifier
    pub id: SentenceId,
    /// The sentence text
    pub text: String,
    /// Owning user
    pub owner_id: OwnerId,
    /// When this sentence was created
    pub created_at: DateTime<Utc>,
    /// When this sentence was last updated
    pub updated_at: DateTime<Utc>,
}

impl Sentence {
    /// Create a sentence with a specific ID
    #[cfg(test)]
    pub fn with_id(id: SentenceId, owner_id: OwnerId, text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            text: text.into(),
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A word together with its current notations
///
/// This is the unit the scanner and the link renderer work on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WordWithNotations {
    pub word: Word,
    pub notations: Vec<Notation>,
}

impl WordWithNotations {
    pub fn new(word: Word, notations: Vec<Notation>) -> Self {
        Self { word, notations }
    }

    /// Word text followed by every notation text, in store order
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.word.text.as_str())
            .chain(self.notations.iter().map(|n| n.text.as_str()))
    }
}

/// A sentence with its associated words rendered as links
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentenceWithLinks {
    pub id: SentenceId,
    /// The stored sentence text
    pub text: String,
    /// The sentence text with matched spans replaced by link markup
    pub text_with_links: String,
    pub owner_id: OwnerId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SentenceWithLinks {
    pub fn new(sentence: Sentence, text_with_links: String) -> Self {
        Self {
            id: sentence.id,
            text: sentence.text,
            text_with_links,
            owner_id: sentence.owner_id,
            created_at: sentence.created_at,
            updated_at: sentence.updated_at,
        }
    }
}

/// Input for creating a word
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewWord {
    pub text: String,
    #[serde(default)]
    pub memo: String,
}

impl NewWord {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            memo: String::new(),
        }
    }

    pub fn with_memo(text: impl Into<String>, memo: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            memo: memo.into(),
        }
    }
}
