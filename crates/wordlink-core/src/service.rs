//! Vocabulary service
//!
//! The entry point for every mutation. Each write goes to the store first,
//! then the association engine is asked to bring the affected edges back in
//! line with the new text:
//!
//! | Change                  | Follow-up                                   |
//! |-------------------------|---------------------------------------------|
//! | word created            | derive roots, associate word                |
//! | word updated            | swap derived roots, reassociate word        |
//! | notation created        | associate word                              |
//! | notation updated/deleted| reassociate word                            |
//! | sentence created        | associate sentence                          |
//! | sentence updated        | reassociate sentence                        |
//! | word/sentence deleted   | nothing, edges cascade in the store         |
//!
//! ## Usage
//!
//! ```ignore
//! let service = VocabularyService::open(&config)?;
//!
//! let word = service.create_word(owner, &NewWord::new("買う"))?;
//! service.create_sentence(owner, "本を買った")?;
//!
//! let sentences = service.associated_sentences_with_links(owner, word.id)?;
//! ```

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::Config;
use crate::deriver::derive_roots;
use crate::engine::{AssociationEngine, RenderMode};
use crate::models::{
    NewWord, Notation, NotationId, OwnerId, Sentence, SentenceId, SentenceWithLinks, Word,
    WordId, WordWithNotations,
};
use crate::storage::{SqliteStore, StorageResult, VocabularyStore};

/// Words, notations and sentences with their associations kept current
pub struct VocabularyService<S: VocabularyStore> {
    store: S,
    render_mode: RenderMode,
}

impl VocabularyService<SqliteStore> {
    /// Open the SQLite database named by the configuration
    pub fn open(config: &Config) -> Result<Self> {
        let store = SqliteStore::open(config).context("Failed to open SQLite database")?;
        Ok(Self::new(store).with_render_mode(config.render_mode))
    }
}

impl<S: VocabularyStore> VocabularyService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            render_mode: RenderMode::default(),
        }
    }

    pub fn with_render_mode(mut self, render_mode: RenderMode) -> Self {
        self.render_mode = render_mode;
        self
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// An engine over this service's store
    pub fn engine(&self) -> AssociationEngine<'_, S> {
        AssociationEngine::new(&self.store).with_render_mode(self.render_mode)
    }

    // ==================== Word Operations ====================

    pub fn list_words(&self, owner_id: OwnerId) -> StorageResult<Vec<Word>> {
        self.store.list_words(owner_id)
    }

    pub fn get_word(&self, owner_id: OwnerId, id: WordId) -> StorageResult<Option<Word>> {
        self.store.get_word(owner_id, id)
    }

    /// A word with its notations, `None` if not found or not owned
    pub fn get_word_with_notations(
        &self,
        owner_id: OwnerId,
        id: WordId,
    ) -> StorageResult<Option<WordWithNotations>> {
        match self.store.get_word(owner_id, id)? {
            Some(word) => {
                let notations = self.store.list_notations(word.id)?;
                Ok(Some(WordWithNotations::new(word, notations)))
            }
            None => Ok(None),
        }
    }

    pub fn count_words(&self, owner_id: OwnerId) -> StorageResult<u64> {
        self.store.count_words(owner_id)
    }

    /// Record a word, derive its root notations and scan existing sentences
    pub fn create_word(&self, owner_id: OwnerId, new_word: &NewWord) -> StorageResult<Word> {
        let word = self
            .store
            .insert_word(&new_word.text, &new_word.memo, owner_id)?;
        self.insert_roots(word.id, &word.text)?;

        let matched = self
            .engine()
            .associate_word_with_all_sentences(owner_id, word.id)?;
        info!(
            "Created word {} ({}) matching {} sentences",
            word.id,
            word.text,
            matched.len()
        );
        Ok(word)
    }

    /// Record several words in order
    pub fn create_words(&self, owner_id: OwnerId, new_words: &[NewWord]) -> StorageResult<Vec<Word>> {
        new_words
            .iter()
            .map(|new_word| self.create_word(owner_id, new_word))
            .collect()
    }

    /// Change a word's text and memo, then rebuild its associations
    ///
    /// Roots derived from the old text are removed (already missing ones are
    /// ignored) and roots of the new text are added before the rescan.
    /// Returns `None` if the word is not found or not owned.
    pub fn update_word(
        &self,
        owner_id: OwnerId,
        id: WordId,
        text: &str,
        memo: &str,
    ) -> StorageResult<Option<Word>> {
        let Some(previous) = self.store.get_word(owner_id, id)? else {
            return Ok(None);
        };

        for root in derive_roots(&previous.text) {
            if self.store.delete_notation_if_exists(id, &root)?.is_some() {
                debug!("Removed root notation '{}' of word {}", root, id);
            }
        }

        let Some(word) = self.store.update_word(id, text, memo, owner_id)? else {
            return Ok(None);
        };
        self.insert_roots(word.id, &word.text)?;

        let matched = self
            .engine()
            .reassociate_word_with_all_sentences(owner_id, word.id)?;
        info!(
            "Updated word {} ({}) matching {} sentences",
            word.id,
            word.text,
            matched.len()
        );
        Ok(Some(word))
    }

    /// Delete a word; its notations and associations go with it
    pub fn delete_word(&self, owner_id: OwnerId, id: WordId) -> StorageResult<Option<Word>> {
        let deleted = self.store.delete_word(owner_id, id)?;
        if let Some(word) = &deleted {
            info!("Deleted word {} ({})", word.id, word.text);
        }
        Ok(deleted)
    }

    fn insert_roots(&self, word_id: WordId, text: &str) -> StorageResult<()> {
        for root in derive_roots(text) {
            if self.store.insert_notation_if_absent(word_id, &root)?.is_some() {
                debug!("Derived root notation '{}' for word {}", root, word_id);
            }
        }
        Ok(())
    }

    // ==================== Notation Operations ====================

    /// Notations of an owned word, empty otherwise
    pub fn list_notations(&self, owner_id: OwnerId, word_id: WordId) -> StorageResult<Vec<Notation>> {
        if !self.store.is_word_owner(word_id, owner_id)? {
            return Ok(Vec::new());
        }
        self.store.list_notations(word_id)
    }

    /// A notation whose word is owned by `owner_id`
    pub fn get_notation(
        &self,
        owner_id: OwnerId,
        id: NotationId,
    ) -> StorageResult<Option<Notation>> {
        let Some(notation) = self.store.get_notation(id)? else {
            return Ok(None);
        };
        if !self.store.is_word_owner(notation.word_id, owner_id)? {
            return Ok(None);
        }
        Ok(Some(notation))
    }

    /// Add a notation to an owned word and scan sentences for it
    ///
    /// Returns `None` when the word is not owned or already has this text.
    pub fn create_notation(
        &self,
        owner_id: OwnerId,
        word_id: WordId,
        text: &str,
    ) -> StorageResult<Option<Notation>> {
        if !self.store.is_word_owner(word_id, owner_id)? {
            return Ok(None);
        }
        let Some(notation) = self.store.insert_notation_if_absent(word_id, text)? else {
            debug!("Word {} already has notation '{}'", word_id, text);
            return Ok(None);
        };

        self.engine()
            .associate_word_with_all_sentences(owner_id, word_id)?;
        info!("Created notation {} ({}) on word {}", notation.id, notation.text, word_id);
        Ok(Some(notation))
    }

    /// Rename a notation and rebuild its word's associations
    pub fn update_notation(
        &self,
        owner_id: OwnerId,
        id: NotationId,
        text: &str,
    ) -> StorageResult<Option<Notation>> {
        if self.get_notation(owner_id, id)?.is_none() {
            return Ok(None);
        }
        let Some(notation) = self.store.update_notation(id, text)? else {
            return Ok(None);
        };

        self.engine()
            .reassociate_word_with_all_sentences(owner_id, notation.word_id)?;
        info!("Updated notation {} ({})", notation.id, notation.text);
        Ok(Some(notation))
    }

    /// Remove a notation and rebuild its word's associations
    pub fn delete_notation(
        &self,
        owner_id: OwnerId,
        id: NotationId,
    ) -> StorageResult<Option<Notation>> {
        if self.get_notation(owner_id, id)?.is_none() {
            return Ok(None);
        }
        let Some(notation) = self.store.delete_notation(id)? else {
            return Ok(None);
        };

        self.engine()
            .reassociate_word_with_all_sentences(owner_id, notation.word_id)?;
        info!("Deleted notation {} ({})", notation.id, notation.text);
        Ok(Some(notation))
    }

    // ==================== Sentence Operations ====================

    pub fn list_sentences(&self, owner_id: OwnerId) -> StorageResult<Vec<Sentence>> {
        self.store.list_sentences(owner_id)
    }

    pub fn get_sentence(
        &self,
        owner_id: OwnerId,
        id: SentenceId,
    ) -> StorageResult<Option<Sentence>> {
        self.store.get_sentence(owner_id, id)
    }

    pub fn count_sentences(&self, owner_id: OwnerId) -> StorageResult<u64> {
        self.store.count_sentences(owner_id)
    }

    /// Record a sentence and scan it for every word
    pub fn create_sentence(&self, owner_id: OwnerId, text: &str) -> StorageResult<Sentence> {
        let sentence = self.store.insert_sentence(text, owner_id)?;

        let matched = self
            .engine()
            .associate_sentence_with_all_words(owner_id, sentence.id)?;
        info!(
            "Created sentence {} matching {} words",
            sentence.id,
            matched.len()
        );
        Ok(sentence)
    }

    /// Record several sentences in order
    pub fn create_sentences<T: AsRef<str>>(
        &self,
        owner_id: OwnerId,
        texts: &[T],
    ) -> StorageResult<Vec<Sentence>> {
        texts
            .iter()
            .map(|text| self.create_sentence(owner_id, text.as_ref()))
            .collect()
    }

    /// Change a sentence's text and rebuild its associations
    pub fn update_sentence(
        &self,
        owner_id: OwnerId,
        id: SentenceId,
        text: &str,
    ) -> StorageResult<Option<Sentence>> {
        let Some(sentence) = self.store.update_sentence(id, text, owner_id)? else {
            return Ok(None);
        };

        let matched = self
            .engine()
            .reassociate_sentence_with_all_words(owner_id, sentence.id)?;
        info!(
            "Updated sentence {} matching {} words",
            sentence.id,
            matched.len()
        );
        Ok(Some(sentence))
    }

    /// Delete a sentence; its associations go with it
    pub fn delete_sentence(
        &self,
        owner_id: OwnerId,
        id: SentenceId,
    ) -> StorageResult<Option<Sentence>> {
        let deleted = self.store.delete_sentence(owner_id, id)?;
        if let Some(sentence) = &deleted {
            info!("Deleted sentence {}", sentence.id);
        }
        Ok(deleted)
    }

    // ==================== Associations ====================

    /// Link a sentence to explicit word ids, returning the ids linked
    pub fn associate_sentence_with_words(
        &self,
        owner_id: OwnerId,
        sentence_id: SentenceId,
        word_ids: &[WordId],
    ) -> StorageResult<Vec<WordId>> {
        self.engine()
            .associate_sentence_with_words(owner_id, sentence_id, word_ids)
    }

    pub fn associated_sentences(
        &self,
        owner_id: OwnerId,
        word_id: WordId,
    ) -> StorageResult<Vec<Sentence>> {
        self.engine().associated_sentences(owner_id, word_id)
    }

    pub fn associated_words(
        &self,
        owner_id: OwnerId,
        sentence_id: SentenceId,
    ) -> StorageResult<Vec<Word>> {
        self.engine().associated_words(owner_id, sentence_id)
    }

    pub fn sentence_with_links(
        &self,
        owner_id: OwnerId,
        sentence_id: SentenceId,
    ) -> StorageResult<Option<SentenceWithLinks>> {
        self.engine().sentence_with_links(owner_id, sentence_id)
    }

    pub fn associated_sentences_with_links(
        &self,
        owner_id: OwnerId,
        word_id: WordId,
    ) -> StorageResult<Vec<SentenceWithLinks>> {
        self.engine()
            .associated_sentences_with_links(owner_id, word_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn service() -> VocabularyService<SqliteStore> {
        VocabularyService::new(SqliteStore::open_in_memory().unwrap())
    }

    fn notation_texts(service: &VocabularyService<SqliteStore>, word_id: WordId) -> Vec<String> {
        service
            .list_notations(1, word_id)
            .unwrap()
            .into_iter()
            .map(|n| n.text)
            .collect()
    }

    #[test]
    fn test_open_with_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            render_mode: RenderMode::NonOverlapping,
            ..Config::default()
        };

        let service = VocabularyService::open(&config).unwrap();
        assert_eq!(service.engine().render_mode(), RenderMode::NonOverlapping);
        assert!(config.sqlite_path().exists());
    }

    #[test]
    fn test_create_word_derives_root() {
        let service = service();
        let word = service.create_word(1, &NewWord::new("買う")).unwrap();

        assert_eq!(notation_texts(&service, word.id), vec!["買"]);
    }

    #[test]
    fn test_create_word_associates_existing_sentences() {
        let service = service();
        let sentence = service.create_sentence(1, "本を買った").unwrap();
        let word = service.create_word(1, &NewWord::new("買う")).unwrap();

        let sentences = service.associated_sentences(1, word.id).unwrap();
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].id, sentence.id);
    }

    #[test]
    fn test_update_word_swaps_root() {
        let service = service();
        let word = service.create_word(1, &NewWord::new("買う")).unwrap();

        service.update_word(1, word.id, "赤い", "red").unwrap();

        assert_eq!(notation_texts(&service, word.id), vec!["赤"]);
        let word = service.get_word(1, word.id).unwrap().unwrap();
        assert_eq!(word.memo, "red");
    }

    #[test]
    fn test_update_word_keeps_manual_notations() {
        let service = service();
        let word = service.create_word(1, &NewWord::new("買う")).unwrap();
        service.create_notation(1, word.id, "かう").unwrap();

        service.update_word(1, word.id, "購入する", "").unwrap();

        assert_eq!(notation_texts(&service, word.id), vec!["かう", "購入す"]);
    }

    #[test]
    fn test_update_word_with_manually_deleted_root() {
        let service = service();
        let word = service.create_word(1, &NewWord::new("買う")).unwrap();
        let root = service.list_notations(1, word.id).unwrap().remove(0);
        service.delete_notation(1, root.id).unwrap();

        let updated = service.update_word(1, word.id, "走る", "").unwrap();

        assert!(updated.is_some());
        assert_eq!(notation_texts(&service, word.id), vec!["走"]);
    }

    #[test]
    fn test_update_word_of_other_owner() {
        let service = service();
        let word = service.create_word(1, &NewWord::new("買う")).unwrap();

        assert!(service.update_word(2, word.id, "赤い", "").unwrap().is_none());
        assert_eq!(notation_texts(&service, word.id), vec!["買"]);
    }

    #[test]
    fn test_create_notation_requires_owner() {
        let service = service();
        let word = service.create_word(1, &NewWord::new("りんご")).unwrap();

        assert!(service.create_notation(2, word.id, "林檎").unwrap().is_none());
        assert!(service.create_notation(1, word.id, "林檎").unwrap().is_some());
        // Duplicate is absorbed
        assert!(service.create_notation(1, word.id, "林檎").unwrap().is_none());
        assert_eq!(notation_texts(&service, word.id), vec!["林檎"]);
    }

    #[test]
    fn test_notation_changes_rebuild_word() {
        let service = service();
        let word = service.create_word(1, &NewWord::new("りんご")).unwrap();
        service.create_sentence(1, "林檎を食べた").unwrap();
        assert!(service.associated_sentences(1, word.id).unwrap().is_empty());

        let notation = service
            .create_notation(1, word.id, "林檎")
            .unwrap()
            .unwrap();
        assert_eq!(service.associated_sentences(1, word.id).unwrap().len(), 1);

        service.update_notation(1, notation.id, "苹果").unwrap();
        assert!(service.associated_sentences(1, word.id).unwrap().is_empty());

        service.update_notation(1, notation.id, "林檎").unwrap();
        service.delete_notation(1, notation.id).unwrap();
        assert!(service.associated_sentences(1, word.id).unwrap().is_empty());
    }

    #[test]
    fn test_foreign_notation_is_invisible() {
        let service = service();
        let word = service.create_word(1, &NewWord::new("りんご")).unwrap();
        let notation = service
            .create_notation(1, word.id, "林檎")
            .unwrap()
            .unwrap();

        assert!(service.get_notation(2, notation.id).unwrap().is_none());
        assert!(service.update_notation(2, notation.id, "x").unwrap().is_none());
        assert!(service.delete_notation(2, notation.id).unwrap().is_none());
        assert!(service.list_notations(2, word.id).unwrap().is_empty());
        assert!(service.get_notation(1, notation.id).unwrap().is_some());
    }

    #[test]
    fn test_sentence_update_rebuilds_edges() {
        let service = service();
        let red = service.create_word(1, &NewWord::new("赤い")).unwrap();
        let blue = service.create_word(1, &NewWord::new("青い")).unwrap();
        let sentence = service.create_sentence(1, "赤い花").unwrap();

        service.update_sentence(1, sentence.id, "青い花").unwrap();

        let words = service.associated_words(1, sentence.id).unwrap();
        let ids: Vec<WordId> = words.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![blue.id]);
        assert!(service.associated_sentences(1, red.id).unwrap().is_empty());
    }

    #[test]
    fn test_delete_cascades_edges() {
        let service = service();
        let word = service.create_word(1, &NewWord::new("猫")).unwrap();
        let sentence = service.create_sentence(1, "猫と犬").unwrap();

        service.delete_sentence(1, sentence.id).unwrap();
        assert!(service.associated_sentences(1, word.id).unwrap().is_empty());

        let sentence = service.create_sentence(1, "猫が寝ている").unwrap();
        service.delete_word(1, word.id).unwrap();
        assert!(service.associated_words(1, sentence.id).unwrap().is_empty());
        assert_eq!(service.count_words(1).unwrap(), 0);
        assert_eq!(service.count_sentences(1).unwrap(), 1);
    }

    #[test]
    fn test_bulk_create() {
        let service = service();
        let words = service
            .create_words(1, &[NewWord::new("猫"), NewWord::with_memo("犬", "dog")])
            .unwrap();
        let sentences = service
            .create_sentences(1, &["猫と犬", "犬だけ"])
            .unwrap();

        assert_eq!(words.len(), 2);
        assert_eq!(sentences.len(), 2);
        assert_eq!(service.associated_sentences(1, words[1].id).unwrap().len(), 2);
    }

    #[test]
    fn test_get_word_with_notations() {
        let service = service();
        let word = service.create_word(1, &NewWord::new("走る")).unwrap();

        let entry = service.get_word_with_notations(1, word.id).unwrap().unwrap();
        assert_eq!(entry.word.text, "走る");
        assert_eq!(entry.notations.len(), 1);
        assert!(service.get_word_with_notations(2, word.id).unwrap().is_none());
    }

    #[test]
    fn test_empty_text_is_stored_but_never_matches() {
        let service = service();
        service.create_sentence(1, "何かの文").unwrap();

        let word = service.create_word(1, &NewWord::new("")).unwrap();
        assert!(service.associated_sentences(1, word.id).unwrap().is_empty());
        assert!(notation_texts(&service, word.id).is_empty());

        let word = service.create_word(1, &NewWord::new("本")).unwrap();
        let notation = service.create_notation(1, word.id, "").unwrap();
        assert!(notation.is_some());
        assert!(service.associated_sentences(1, word.id).unwrap().is_empty());
    }
}
