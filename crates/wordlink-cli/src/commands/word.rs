//! Word command handlers

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

use wordlink_core::{NewWord, OwnerId, WordId};

use super::{import_lines, Service};
use crate::editor::{confirm_delete, edit_word};
use crate::output::Output;

/// Record a new word
pub fn add(
    service: &Service,
    owner: OwnerId,
    text: String,
    memo: Option<String>,
    output: &Output,
) -> Result<()> {
    let text = text.trim();
    if text.is_empty() {
        bail!("Word text cannot be empty");
    }

    let new_word = NewWord::with_memo(text, memo.unwrap_or_default());
    let word = service
        .create_word(owner, &new_word)
        .context("Failed to create word")?;

    output.success(&format!("Created word: {}", word.id));
    show(service, owner, word.id, output)
}

/// Record every word listed in a file
pub fn import(service: &Service, owner: OwnerId, file: PathBuf, output: &Output) -> Result<()> {
    let content = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read import file: {:?}", file))?;

    let new_words: Vec<NewWord> = import_lines(&content).map(parse_word_line).collect();
    let words = service
        .create_words(owner, &new_words)
        .context("Failed to import words")?;

    output.success(&format!("Imported {} word(s)", words.len()));
    Ok(())
}

/// List all words
pub fn list(service: &Service, owner: OwnerId, output: &Output) -> Result<()> {
    let words = service.list_words(owner)?;
    output.print_words(&words);
    Ok(())
}

/// Show a word with its notations and sentences
pub fn show(service: &Service, owner: OwnerId, id: WordId, output: &Output) -> Result<()> {
    let entry = service
        .get_word_with_notations(owner, id)?
        .ok_or_else(|| anyhow!("Word not found: {}", id))?;
    let sentences = service.associated_sentences_with_links(owner, id)?;

    output.print_word(&entry, &sentences);
    Ok(())
}

/// Edit a word's text and memo
///
/// Without flags the word opens in the editor: the first line is the text,
/// everything after it the memo.
pub fn edit(
    service: &Service,
    owner: OwnerId,
    id: WordId,
    text: Option<String>,
    memo: Option<String>,
    output: &Output,
) -> Result<()> {
    let word = service
        .get_word(owner, id)?
        .ok_or_else(|| anyhow!("Word not found: {}", id))?;

    let (new_text, new_memo) = if text.is_none() && memo.is_none() {
        let edited = edit_word(&word.text, &word.memo)?;
        (edited.text, edited.memo)
    } else {
        (
            text.map(|t| t.trim().to_string()).unwrap_or(word.text),
            memo.unwrap_or(word.memo),
        )
    };

    if new_text.is_empty() {
        bail!("Word text cannot be empty");
    }

    service
        .update_word(owner, id, &new_text, &new_memo)
        .context("Failed to update word")?
        .ok_or_else(|| anyhow!("Word not found: {}", id))?;

    output.success(&format!("Updated word: {}", id));
    Ok(())
}

/// Delete a word with its notations
pub fn delete(
    service: &Service,
    owner: OwnerId,
    id: WordId,
    yes: bool,
    output: &Output,
) -> Result<()> {
    let word = service
        .get_word(owner, id)?
        .ok_or_else(|| anyhow!("Word not found: {}", id))?;

    if !yes && output.should_prompt() {
        if !confirm_delete("word", word.id, &word.text)? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    service
        .delete_word(owner, id)
        .context("Failed to delete word")?;

    output.success(&format!("Deleted word: {}", id));
    Ok(())
}

/// List sentences containing a word
pub fn sentences(service: &Service, owner: OwnerId, id: WordId, output: &Output) -> Result<()> {
    if service.get_word(owner, id)?.is_none() {
        bail!("Word not found: {}", id);
    }

    let sentences = service.associated_sentences_with_links(owner, id)?;
    output.print_linked_sentences(&sentences);
    Ok(())
}

/// `word<TAB>memo`, memo optional
fn parse_word_line(line: &str) -> NewWord {
    match line.split_once('\t') {
        Some((text, memo)) => NewWord::with_memo(text.trim(), memo.trim()),
        None => NewWord::new(line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_word_line() {
        assert_eq!(parse_word_line("買う"), NewWord::new("買う"));
        assert_eq!(
            parse_word_line("買う\tto buy"),
            NewWord::with_memo("買う", "to buy")
        );
    }
}
