//! Sentence command handlers

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

use wordlink_core::{OwnerId, SentenceId, WordId};

use super::{import_lines, Service};
use crate::editor::{confirm_delete, edit_sentence};
use crate::output::Output;

/// Record a new sentence
pub fn add(service: &Service, owner: OwnerId, text: Option<String>, output: &Output) -> Result<()> {
    let text = match text {
        Some(text) => text.trim().to_string(),
        None => edit_sentence("")?,
    };
    if text.is_empty() {
        bail!("Sentence text cannot be empty");
    }

    let sentence = service
        .create_sentence(owner, &text)
        .context("Failed to create sentence")?;

    output.success(&format!("Created sentence: {}", sentence.id));
    show(service, owner, sentence.id, output)
}

/// Record every sentence listed in a file, one per line
pub fn import(service: &Service, owner: OwnerId, file: PathBuf, output: &Output) -> Result<()> {
    let content = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read import file: {:?}", file))?;

    let texts: Vec<&str> = import_lines(&content).collect();
    let sentences = service
        .create_sentences(owner, &texts)
        .context("Failed to import sentences")?;

    output.success(&format!("Imported {} sentence(s)", sentences.len()));
    Ok(())
}

/// List all sentences
pub fn list(service: &Service, owner: OwnerId, output: &Output) -> Result<()> {
    let sentences = service.list_sentences(owner)?;
    output.print_sentences(&sentences);
    Ok(())
}

/// Show a sentence with links to the words found in it
pub fn show(service: &Service, owner: OwnerId, id: SentenceId, output: &Output) -> Result<()> {
    let sentence = service
        .sentence_with_links(owner, id)?
        .ok_or_else(|| anyhow!("Sentence not found: {}", id))?;
    let words = service.associated_words(owner, id)?;

    output.print_sentence(&sentence, &words);
    Ok(())
}

/// Change a sentence's text
pub fn edit(
    service: &Service,
    owner: OwnerId,
    id: SentenceId,
    text: Option<String>,
    output: &Output,
) -> Result<()> {
    let sentence = service
        .get_sentence(owner, id)?
        .ok_or_else(|| anyhow!("Sentence not found: {}", id))?;

    let text = match text {
        Some(text) => text.trim().to_string(),
        None => edit_sentence(&sentence.text)?,
    };
    if text.is_empty() {
        bail!("Sentence text cannot be empty");
    }

    service
        .update_sentence(owner, id, &text)
        .context("Failed to update sentence")?
        .ok_or_else(|| anyhow!("Sentence not found: {}", id))?;

    output.success(&format!("Updated sentence: {}", id));
    Ok(())
}

/// Delete a sentence
pub fn delete(
    service: &Service,
    owner: OwnerId,
    id: SentenceId,
    yes: bool,
    output: &Output,
) -> Result<()> {
    let sentence = service
        .get_sentence(owner, id)?
        .ok_or_else(|| anyhow!("Sentence not found: {}", id))?;

    if !yes && output.should_prompt() {
        if !confirm_delete("sentence", sentence.id, &sentence.text)? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    service
        .delete_sentence(owner, id)
        .context("Failed to delete sentence")?;

    output.success(&format!("Deleted sentence: {}", id));
    Ok(())
}

/// List words found in a sentence
pub fn words(service: &Service, owner: OwnerId, id: SentenceId, output: &Output) -> Result<()> {
    if service.get_sentence(owner, id)?.is_none() {
        bail!("Sentence not found: {}", id);
    }

    let words = service.associated_words(owner, id)?;
    output.print_words(&words);
    Ok(())
}

/// Link a sentence to words by id
pub fn link(
    service: &Service,
    owner: OwnerId,
    id: SentenceId,
    word_ids: Vec<WordId>,
    output: &Output,
) -> Result<()> {
    if service.get_sentence(owner, id)?.is_none() {
        bail!("Sentence not found: {}", id);
    }

    let linked = service
        .associate_sentence_with_words(owner, id, &word_ids)
        .context("Failed to link words")?;

    let skipped: Vec<String> = word_ids
        .iter()
        .filter(|word_id| !linked.contains(*word_id))
        .map(|word_id| word_id.to_string())
        .collect();
    if !skipped.is_empty() {
        output.message(&format!("Skipped unknown word(s): {}", skipped.join(", ")));
    }

    output.success(&format!("Linked sentence {} to {} word(s)", id, linked.len()));
    Ok(())
}
