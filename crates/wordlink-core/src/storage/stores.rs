//! Store contracts consumed by the association engine
//!
//! The engine only needs plain CRUD over four tables. Reads that take an
//! owner id return `None` (or an empty list) for entities owned by someone
//! else, so an ownership failure and an absent row look the same.
//! Notation and association operations are not owner-scoped; callers check
//! ownership through the word or sentence first.

use crate::models::{
    Notation, NotationId, OwnerId, Sentence, SentenceId, Word, WordId,
};
use crate::storage::StorageResult;

/// CRUD over words, scoped by owner
pub trait WordStore {
    /// All words of `owner_id`, oldest first
    fn list_words(&self, owner_id: OwnerId) -> StorageResult<Vec<Word>>;
    fn get_word(&self, owner_id: OwnerId, id: WordId) -> StorageResult<Option<Word>>;
    fn insert_word(&self, text: &str, memo: &str, owner_id: OwnerId) -> StorageResult<Word>;
    /// Returns `None` when no word `id` is owned by `owner_id`
    fn update_word(
        &self,
        id: WordId,
        text: &str,
        memo: &str,
        owner_id: OwnerId,
    ) -> StorageResult<Option<Word>>;
    /// Deletes the word together with its notations and associations
    fn delete_word(&self, owner_id: OwnerId, id: WordId) -> StorageResult<Option<Word>>;
    fn is_word_owner(&self, id: WordId, owner_id: OwnerId) -> StorageResult<bool>;
    fn count_words(&self, owner_id: OwnerId) -> StorageResult<u64>;
}

/// CRUD over notations, keyed by word
pub trait NotationStore {
    /// Notations of a word in insertion order
    fn list_notations(&self, word_id: WordId) -> StorageResult<Vec<Notation>>;
    fn get_notation(&self, id: NotationId) -> StorageResult<Option<Notation>>;
    /// Returns `None` if the word already has a notation with this text
    fn insert_notation_if_absent(
        &self,
        word_id: WordId,
        text: &str,
    ) -> StorageResult<Option<Notation>>;
    /// Returns the notation as stored afterwards.
    ///
    /// Renaming onto a text the word already has is ignored and the
    /// notation is returned unchanged.
    fn update_notation(&self, id: NotationId, text: &str) -> StorageResult<Option<Notation>>;
    fn delete_notation(&self, id: NotationId) -> StorageResult<Option<Notation>>;
    /// Deletes the (word, text) notation if present; absence is not an error
    fn delete_notation_if_exists(
        &self,
        word_id: WordId,
        text: &str,
    ) -> StorageResult<Option<Notation>>;
}

/// CRUD over sentences, scoped by owner
pub trait SentenceStore {
    /// All sentences of `owner_id`, oldest first
    fn list_sentences(&self, owner_id: OwnerId) -> StorageResult<Vec<Sentence>>;
    fn get_sentence(&self, owner_id: OwnerId, id: SentenceId) -> StorageResult<Option<Sentence>>;
    fn insert_sentence(&self, text: &str, owner_id: OwnerId) -> StorageResult<Sentence>;
    fn update_sentence(
        &self,
        id: SentenceId,
        text: &str,
        owner_id: OwnerId,
    ) -> StorageResult<Option<Sentence>>;
    /// Deletes the sentence together with its associations
    fn delete_sentence(&self, owner_id: OwnerId, id: SentenceId)
        -> StorageResult<Option<Sentence>>;
    fn is_sentence_owner(&self, id: SentenceId, owner_id: OwnerId) -> StorageResult<bool>;
    fn count_sentences(&self, owner_id: OwnerId) -> StorageResult<u64>;
}

/// The derived sentence-word edges
pub trait AssociationStore {
    /// Returns `true` if a new edge was written
    fn insert_association_if_absent(
        &self,
        sentence_id: SentenceId,
        word_id: WordId,
    ) -> StorageResult<bool>;
    /// Returns the number of edges removed
    fn delete_associations_for_word(&self, word_id: WordId) -> StorageResult<usize>;
    /// Returns the number of edges removed
    fn delete_associations_for_sentence(&self, sentence_id: SentenceId) -> StorageResult<usize>;
    fn list_sentences_for_word(&self, word_id: WordId) -> StorageResult<Vec<Sentence>>;
    fn list_words_for_sentence(&self, sentence_id: SentenceId) -> StorageResult<Vec<Word>>;
}

/// Everything the engine reads and writes
pub trait VocabularyStore: WordStore + NotationStore + SentenceStore + AssociationStore {}

impl<T> VocabularyStore for T where
    T: WordStore + NotationStore + SentenceStore + AssociationStore + ?Sized
{
}
