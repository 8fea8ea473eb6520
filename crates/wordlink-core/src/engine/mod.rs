//! Association engine
//!
//! Keeps the sentence-word edges consistent with the text of words,
//! notations and sentences, and renders sentences with their associated
//! words turned into links.
//!
//! Every rebuild is a full rescan of one entity against all counterparts of
//! the same owner. Edges are written with insert-if-absent, so rebuilding
//! twice gives the same edge set as rebuilding once. A word or sentence not
//! owned by the caller is treated as absent: the operation does nothing and
//! returns an empty result.

mod render;
mod scan;

pub use render::{render_with_links, render_with_links_non_overlapping, word_link, RenderMode};
pub use scan::scan_sentence_against_word;

use tracing::{debug, trace};

use crate::models::{
    OwnerId, Sentence, SentenceId, SentenceWithLinks, Word, WordId, WordWithNotations,
};
use crate::storage::{StorageResult, VocabularyStore};

/// Rebuilds and reads associations through a borrowed store
pub struct AssociationEngine<'s, S: VocabularyStore + ?Sized> {
    store: &'s S,
    render_mode: RenderMode,
}

impl<'s, S: VocabularyStore + ?Sized> AssociationEngine<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            render_mode: RenderMode::default(),
        }
    }

    /// Use a different link rendering strategy
    pub fn with_render_mode(mut self, render_mode: RenderMode) -> Self {
        self.render_mode = render_mode;
        self
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    // ==================== Rebuild Operations ====================

    /// Scan every sentence of `owner_id` for the word and record matches
    ///
    /// Returns the sentences that matched.
    pub fn associate_word_with_all_sentences(
        &self,
        owner_id: OwnerId,
        word_id: WordId,
    ) -> StorageResult<Vec<Sentence>> {
        if !self.store.is_word_owner(word_id, owner_id)? {
            debug!("Word {} not owned by {}, skipping association", word_id, owner_id);
            return Ok(Vec::new());
        }
        let Some(word) = self.store.get_word(owner_id, word_id)? else {
            return Ok(Vec::new());
        };
        let notations = self.store.list_notations(word_id)?;

        let mut matched = Vec::new();
        for sentence in self.store.list_sentences(owner_id)? {
            if scan_sentence_against_word(&sentence.text, &word, &notations) {
                self.store.insert_association_if_absent(sentence.id, word_id)?;
                matched.push(sentence);
            }
        }

        debug!("Word {} matched {} sentences", word_id, matched.len());
        Ok(matched)
    }

    /// Scan the sentence for every word of `owner_id` and record matches
    ///
    /// Returns the words that matched.
    pub fn associate_sentence_with_all_words(
        &self,
        owner_id: OwnerId,
        sentence_id: SentenceId,
    ) -> StorageResult<Vec<Word>> {
        if !self.store.is_sentence_owner(sentence_id, owner_id)? {
            debug!(
                "Sentence {} not owned by {}, skipping association",
                sentence_id, owner_id
            );
            return Ok(Vec::new());
        }
        let Some(sentence) = self.store.get_sentence(owner_id, sentence_id)? else {
            return Ok(Vec::new());
        };

        let mut matched = Vec::new();
        for word in self.store.list_words(owner_id)? {
            let notations = self.store.list_notations(word.id)?;
            if scan_sentence_against_word(&sentence.text, &word, &notations) {
                self.store.insert_association_if_absent(sentence_id, word.id)?;
                matched.push(word);
            }
        }

        debug!("Sentence {} matched {} words", sentence_id, matched.len());
        Ok(matched)
    }

    /// Drop every edge of the word, then rescan it
    pub fn reassociate_word_with_all_sentences(
        &self,
        owner_id: OwnerId,
        word_id: WordId,
    ) -> StorageResult<Vec<Sentence>> {
        if !self.store.is_word_owner(word_id, owner_id)? {
            return Ok(Vec::new());
        }
        let removed = self.store.delete_associations_for_word(word_id)?;
        trace!("Cleared {} associations of word {}", removed, word_id);

        self.associate_word_with_all_sentences(owner_id, word_id)
    }

    /// Drop every edge of the sentence, then rescan it
    pub fn reassociate_sentence_with_all_words(
        &self,
        owner_id: OwnerId,
        sentence_id: SentenceId,
    ) -> StorageResult<Vec<Word>> {
        if !self.store.is_sentence_owner(sentence_id, owner_id)? {
            return Ok(Vec::new());
        }
        let removed = self.store.delete_associations_for_sentence(sentence_id)?;
        trace!("Cleared {} associations of sentence {}", removed, sentence_id);

        self.associate_sentence_with_all_words(owner_id, sentence_id)
    }

    /// Link the sentence to each requested word without scanning
    ///
    /// Word ids the owner does not own are dropped from the result.
    pub fn associate_sentence_with_words(
        &self,
        owner_id: OwnerId,
        sentence_id: SentenceId,
        word_ids: &[WordId],
    ) -> StorageResult<Vec<WordId>> {
        if !self.store.is_sentence_owner(sentence_id, owner_id)? {
            return Ok(Vec::new());
        }

        let mut linked = Vec::with_capacity(word_ids.len());
        for &word_id in word_ids {
            if !self.store.is_word_owner(word_id, owner_id)? {
                debug!("Dropping word {} not owned by {}", word_id, owner_id);
                continue;
            }
            self.store.insert_association_if_absent(sentence_id, word_id)?;
            linked.push(word_id);
        }

        Ok(linked)
    }

    // ==================== Reads ====================

    /// Sentences associated with the word, restricted to `owner_id`
    pub fn associated_sentences(
        &self,
        owner_id: OwnerId,
        word_id: WordId,
    ) -> StorageResult<Vec<Sentence>> {
        if !self.store.is_word_owner(word_id, owner_id)? {
            return Ok(Vec::new());
        }
        let sentences = self.store.list_sentences_for_word(word_id)?;
        Ok(sentences
            .into_iter()
            .filter(|sentence| sentence.owner_id == owner_id)
            .collect())
    }

    /// Words associated with the sentence, restricted to `owner_id`
    pub fn associated_words(
        &self,
        owner_id: OwnerId,
        sentence_id: SentenceId,
    ) -> StorageResult<Vec<Word>> {
        if !self.store.is_sentence_owner(sentence_id, owner_id)? {
            return Ok(Vec::new());
        }
        let words = self.store.list_words_for_sentence(sentence_id)?;
        Ok(words
            .into_iter()
            .filter(|word| word.owner_id == owner_id)
            .collect())
    }

    /// The sentence rendered with links to all of its associated words
    pub fn sentence_with_links(
        &self,
        owner_id: OwnerId,
        sentence_id: SentenceId,
    ) -> StorageResult<Option<SentenceWithLinks>> {
        match self.store.get_sentence(owner_id, sentence_id)? {
            Some(sentence) => self.render_sentence(owner_id, sentence).map(Some),
            None => Ok(None),
        }
    }

    /// Every sentence associated with the word, each rendered with links to
    /// all words associated with that sentence
    pub fn associated_sentences_with_links(
        &self,
        owner_id: OwnerId,
        word_id: WordId,
    ) -> StorageResult<Vec<SentenceWithLinks>> {
        self.associated_sentences(owner_id, word_id)?
            .into_iter()
            .map(|sentence| self.render_sentence(owner_id, sentence))
            .collect()
    }

    fn render_sentence(
        &self,
        owner_id: OwnerId,
        sentence: Sentence,
    ) -> StorageResult<SentenceWithLinks> {
        let words = self.associated_words(owner_id, sentence.id)?;
        let entries = self.with_notations(words)?;
        let text_with_links = self.render_mode.render(&sentence.text, &entries);
        Ok(SentenceWithLinks::new(sentence, text_with_links))
    }

    fn with_notations(&self, words: Vec<Word>) -> StorageResult<Vec<WordWithNotations>> {
        words
            .into_iter()
            .map(|word| {
                let notations = self.store.list_notations(word.id)?;
                Ok(WordWithNotations::new(word, notations))
            })
            .collect()
    }
}
