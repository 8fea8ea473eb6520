//! Notation command handlers

use anyhow::{anyhow, bail, Context, Result};

use wordlink_core::{NotationId, OwnerId, WordId};

use super::Service;
use crate::output::Output;

/// Add a notation to a word
pub fn add(
    service: &Service,
    owner: OwnerId,
    word_id: WordId,
    text: String,
    output: &Output,
) -> Result<()> {
    let text = text.trim();
    if text.is_empty() {
        bail!("Notation text cannot be empty");
    }
    if service.get_word(owner, word_id)?.is_none() {
        bail!("Word not found: {}", word_id);
    }

    match service
        .create_notation(owner, word_id, text)
        .context("Failed to create notation")?
    {
        Some(notation) => {
            output.success(&format!("Created notation: {}", notation.id));
            output.print_notation(&notation);
        }
        None => output.message(&format!("Word {} already has notation '{}'", word_id, text)),
    }

    Ok(())
}

/// List notations of a word
pub fn list(service: &Service, owner: OwnerId, word_id: WordId, output: &Output) -> Result<()> {
    if service.get_word(owner, word_id)?.is_none() {
        bail!("Word not found: {}", word_id);
    }

    let notations = service.list_notations(owner, word_id)?;
    output.print_notations(&notations);
    Ok(())
}

/// Change a notation's text
pub fn edit(
    service: &Service,
    owner: OwnerId,
    id: NotationId,
    text: String,
    output: &Output,
) -> Result<()> {
    let text = text.trim();
    if text.is_empty() {
        bail!("Notation text cannot be empty");
    }

    let notation = service
        .update_notation(owner, id, text)
        .context("Failed to update notation")?
        .ok_or_else(|| anyhow!("Notation not found: {}", id))?;

    if notation.text != text {
        output.message(&format!(
            "Word {} already has notation '{}', kept '{}'",
            notation.word_id, text, notation.text
        ));
        return Ok(());
    }

    output.success(&format!("Updated notation: {}", id));
    Ok(())
}

/// Delete a notation
pub fn delete(service: &Service, owner: OwnerId, id: NotationId, output: &Output) -> Result<()> {
    service
        .delete_notation(owner, id)
        .context("Failed to delete notation")?
        .ok_or_else(|| anyhow!("Notation not found: {}", id))?;

    output.success(&format!("Deleted notation: {}", id));
    Ok(())
}
