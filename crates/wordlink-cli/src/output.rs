//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use wordlink_core::{Notation, Sentence, SentenceWithLinks, Word, WordWithNotations};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a word with its notations and the sentences it appears in
    pub fn print_word(&self, entry: &WordWithNotations, sentences: &[SentenceWithLinks]) {
        let word = &entry.word;
        match self.format {
            OutputFormat::Human => {
                println!("ID:        {}", word.id);
                println!("Word:      {}", word.text);
                if !word.memo.is_empty() {
                    println!("Memo:      {}", word.memo);
                }
                if !entry.notations.is_empty() {
                    let texts: Vec<&str> =
                        entry.notations.iter().map(|n| n.text.as_str()).collect();
                    println!("Notations: {}", texts.join(", "));
                }
                println!("Created:   {}", word.created_at.format("%Y-%m-%d %H:%M"));
                println!("Updated:   {}", word.updated_at.format("%Y-%m-%d %H:%M"));

                if !sentences.is_empty() {
                    println!();
                    println!("── Sentences ({}) ──", sentences.len());
                    for sentence in sentences {
                        println!("[{}] {}", sentence.id, sentence.text_with_links);
                    }
                }
            }
            OutputFormat::Json => print_json(&serde_json::json!({
                "word": word,
                "notations": entry.notations,
                "sentences": sentences,
            })),
            OutputFormat::Quiet => {
                println!("{}", word.id);
            }
        }
    }

    /// Print a list of words
    pub fn print_words(&self, words: &[Word]) {
        match self.format {
            OutputFormat::Human => {
                if words.is_empty() {
                    println!("No words found.");
                    return;
                }
                for word in words {
                    if word.memo.is_empty() {
                        println!("{:>5} | {}", word.id, word.text);
                    } else {
                        println!(
                            "{:>5} | {} | {}",
                            word.id,
                            word.text,
                            truncate_line(&word.memo, 40)
                        );
                    }
                }
                println!("\n{} word(s)", words.len());
            }
            OutputFormat::Json => print_json(words),
            OutputFormat::Quiet => {
                for word in words {
                    println!("{}", word.id);
                }
            }
        }
    }

    /// Print notations of a word
    pub fn print_notations(&self, notations: &[Notation]) {
        match self.format {
            OutputFormat::Human => {
                if notations.is_empty() {
                    println!("No notations on this word.");
                    return;
                }
                for notation in notations {
                    println!("{:>5} | {}", notation.id, notation.text);
                }
                println!("\n{} notation(s)", notations.len());
            }
            OutputFormat::Json => print_json(notations),
            OutputFormat::Quiet => {
                for notation in notations {
                    println!("{}", notation.id);
                }
            }
        }
    }

    /// Print a single notation
    pub fn print_notation(&self, notation: &Notation) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:   {}", notation.id);
                println!("Word: {}", notation.word_id);
                println!("Text: {}", notation.text);
            }
            OutputFormat::Json => print_json(notation),
            OutputFormat::Quiet => {
                println!("{}", notation.id);
            }
        }
    }

    /// Print a sentence with its rendering and the words found in it
    pub fn print_sentence(&self, sentence: &SentenceWithLinks, words: &[Word]) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", sentence.id);
                println!("Sentence: {}", sentence.text);
                println!("Linked:   {}", sentence.text_with_links);
                println!("Created:  {}", sentence.created_at.format("%Y-%m-%d %H:%M"));
                println!("Updated:  {}", sentence.updated_at.format("%Y-%m-%d %H:%M"));

                if !words.is_empty() {
                    println!();
                    println!("── Words ({}) ──", words.len());
                    for word in words {
                        println!("[{}] {}", word.id, word.text);
                    }
                }
            }
            OutputFormat::Json => print_json(&serde_json::json!({
                "sentence": sentence,
                "words": words,
            })),
            OutputFormat::Quiet => {
                println!("{}", sentence.id);
            }
        }
    }

    /// Print a list of sentences
    pub fn print_sentences(&self, sentences: &[Sentence]) {
        match self.format {
            OutputFormat::Human => {
                if sentences.is_empty() {
                    println!("No sentences found.");
                    return;
                }
                for sentence in sentences {
                    println!("{:>5} | {}", sentence.id, truncate_line(&sentence.text, 60));
                }
                println!("\n{} sentence(s)", sentences.len());
            }
            OutputFormat::Json => print_json(sentences),
            OutputFormat::Quiet => {
                for sentence in sentences {
                    println!("{}", sentence.id);
                }
            }
        }
    }

    /// Print sentences rendered with links
    pub fn print_linked_sentences(&self, sentences: &[SentenceWithLinks]) {
        match self.format {
            OutputFormat::Human => {
                if sentences.is_empty() {
                    println!("No sentences contain this word.");
                    return;
                }
                for sentence in sentences {
                    println!("{:>5} | {}", sentence.id, sentence.text_with_links);
                }
                println!("\n{} sentence(s)", sentences.len());
            }
            OutputFormat::Json => print_json(sentences),
            OutputFormat::Quiet => {
                for sentence in sentences {
                    println!("{}", sentence.id);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Truncate to first line and max length
fn truncate_line(s: &str, max_chars: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_chars)
}
