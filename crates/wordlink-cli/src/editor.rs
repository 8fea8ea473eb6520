//! Drafting words and sentences in $VISUAL / $EDITOR
//!
//! The editor gets a temp file holding the current value plus a few `#`
//! hint lines. Hint lines are dropped again when the draft is read back.

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::process::Command;

use wordlink_core::NewWord;

const FALLBACK_EDITORS: [&str; 2] = ["nano", "vi"];

/// Draft a sentence; the result is a single trimmed line of text
pub fn edit_sentence(current: &str) -> Result<String> {
    let draft = format!(
        "{}\n# Write the sentence above. Lines starting with '#' are ignored.\n",
        current
    );
    let text = strip_hints(&run_editor(&draft)?).join(" ");
    let text = text.trim();
    if text.is_empty() {
        bail!("Empty sentence, nothing saved.");
    }
    Ok(text.to_string())
}

/// Draft a word: first line is the text, anything below it the memo
pub fn edit_word(text: &str, memo: &str) -> Result<NewWord> {
    let draft = format!(
        "{}\n{}\n# First line: the word. Following lines: memo.\n\
         # Lines starting with '#' are ignored.\n",
        text, memo
    );
    let word = parse_word_draft(&run_editor(&draft)?);
    if word.text.is_empty() {
        bail!("Empty word, nothing saved.");
    }
    Ok(word)
}

/// Ask before deleting; always false without a terminal on stdin
pub fn confirm_delete(kind: &str, id: i64, label: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    println!("Delete {}: {} - {}", kind, id, label);
    print!("Are you sure? [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn parse_word_draft(draft: &str) -> NewWord {
    let lines = strip_hints(draft);
    let mut lines = lines.iter().skip_while(|line| line.trim().is_empty());
    let text = lines.next().map(|line| line.trim()).unwrap_or_default();
    let memo = lines.copied().collect::<Vec<_>>().join("\n");
    NewWord::with_memo(text, memo.trim())
}

fn strip_hints(draft: &str) -> Vec<&str> {
    draft
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect()
}

fn run_editor(draft: &str) -> Result<String> {
    let editor = resolve_editor()?;
    let mut parts = editor.split_whitespace();
    let program = parts.next().unwrap_or_default();

    let mut file = tempfile::Builder::new()
        .prefix("wordlink-")
        .suffix(".txt")
        .tempfile()
        .context("Failed to create draft file")?;
    file.write_all(draft.as_bytes())
        .context("Failed to write draft file")?;

    let status = Command::new(program)
        .args(parts)
        .arg(file.path())
        .status()
        .with_context(|| format!("Failed to run editor: {}", editor))?;
    if !status.success() {
        bail!("Editor '{}' exited with {}; nothing saved.", editor, status);
    }

    fs::read_to_string(file.path()).context("Failed to read draft file")
}

fn resolve_editor() -> Result<String> {
    let configured = ["VISUAL", "EDITOR"]
        .into_iter()
        .filter_map(|var| env::var(var).ok())
        .find(|value| !value.trim().is_empty());
    if let Some(editor) = configured {
        return Ok(editor);
    }

    let path = env::var_os("PATH").unwrap_or_default();
    let found = FALLBACK_EDITORS
        .into_iter()
        .find(|name| env::split_paths(&path).any(|dir| dir.join(name).is_file()));
    match found {
        Some(name) => Ok(name.to_string()),
        None => bail!("No editor found. Set $EDITOR, for example: export EDITOR=nano"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_hints() {
        let draft = "林檎を食べた\n# hint\n  # indented hint\n";
        assert_eq!(strip_hints(draft), vec!["林檎を食べた"]);
    }

    #[test]
    fn test_parse_word_draft() {
        let draft = "買う\nto buy\n# First line: the word.\n";
        assert_eq!(parse_word_draft(draft), NewWord::with_memo("買う", "to buy"));

        let draft = "\n  赤い \nred\ncolour\n";
        assert_eq!(parse_word_draft(draft), NewWord::with_memo("赤い", "red\ncolour"));
    }

    #[test]
    fn test_parse_word_draft_without_memo() {
        assert_eq!(parse_word_draft("走る\n"), NewWord::with_memo("走る", ""));
        assert!(parse_word_draft("# only hints\n").text.is_empty());
    }
}
