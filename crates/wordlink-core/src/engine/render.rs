//! Link rendering
//!
//! Turns every occurrence of an associated word (or one of its notations)
//! inside a sentence into a link to that word. Two strategies exist:
//!
//! - [`render_with_links`] rewrites the text pattern by pattern, in the
//!   order the words are supplied. Later patterns see the markup inserted by
//!   earlier ones, so a short pattern can land inside an existing link.
//! - [`render_with_links_non_overlapping`] finds all spans on the original
//!   text first, longest pattern first, and substitutes them in one pass.
//!   Spans never nest and the markup is never rescanned.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::{WordId, WordWithNotations};

/// Which rendering strategy to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// Pattern-by-pattern global replacement over the rewritten text
    #[default]
    Sequential,
    /// Single pass over spans found in the original text
    NonOverlapping,
}

impl RenderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::Sequential => "sequential",
            RenderMode::NonOverlapping => "non-overlapping",
        }
    }

    /// Render `text` with this strategy
    pub fn render(&self, text: &str, words: &[WordWithNotations]) -> String {
        match self {
            RenderMode::Sequential => render_with_links(text, words),
            RenderMode::NonOverlapping => render_with_links_non_overlapping(text, words),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sequential" => Ok(RenderMode::Sequential),
            "non-overlapping" | "non_overlapping" => Ok(RenderMode::NonOverlapping),
            other => Err(format!(
                "unknown render mode '{}' (expected 'sequential' or 'non-overlapping')",
                other
            )),
        }
    }
}

/// Link markup pointing at a word, showing `label`
pub fn word_link(word_id: WordId, label: &str) -> String {
    format!("<a href=\"/words/{}\">{}</a>", word_id, label)
}

/// Replace every occurrence of each word, then each of its notations
///
/// Words are processed in the order supplied and every replacement works on
/// the output of the previous one.
pub fn render_with_links(text: &str, words: &[WordWithNotations]) -> String {
    let mut rendered = text.to_string();

    for entry in words {
        for pattern in entry.patterns() {
            if pattern.is_empty() {
                continue;
            }
            rendered = rendered.replace(pattern, &word_link(entry.word.id, pattern));
        }
    }

    rendered
}

/// A claimed byte range of the original text
struct Span<'a> {
    start: usize,
    end: usize,
    word_id: WordId,
    label: &'a str,
}

impl Span<'_> {
    fn overlaps(&self, start: usize, end: usize) -> bool {
        start < self.end && self.start < end
    }
}

/// Replace matches found on the original text in a single pass
///
/// Longer patterns claim their spans first. Among patterns of equal length
/// the supply order of [`render_with_links`] decides. A span that overlaps
/// one already claimed is dropped.
pub fn render_with_links_non_overlapping(text: &str, words: &[WordWithNotations]) -> String {
    let mut patterns: Vec<(&str, WordId)> = words
        .iter()
        .flat_map(|entry| entry.patterns().map(move |p| (p, entry.word.id)))
        .filter(|(p, _)| !p.is_empty())
        .collect();
    // Stable sort keeps supply order among equal lengths
    patterns.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));

    let mut spans: Vec<Span<'_>> = Vec::new();
    for (pattern, word_id) in patterns {
        for (start, matched) in text.match_indices(pattern) {
            let end = start + matched.len();
            if spans.iter().any(|span| span.overlaps(start, end)) {
                continue;
            }
            spans.push(Span {
                start,
                end,
                word_id,
                label: matched,
            });
        }
    }
    spans.sort_by_key(|span| span.start);

    let mut rendered = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in &spans {
        rendered.push_str(&text[cursor..span.start]);
        rendered.push_str(&word_link(span.word_id, span.label));
        cursor = span.end;
    }
    rendered.push_str(&text[cursor..]);

    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Notation, Word};

    fn entry(id: WordId, text: &str, notations: &[&str]) -> WordWithNotations {
        let notations = notations
            .iter()
            .enumerate()
            .map(|(i, n)| Notation::with_id(i as i64 + 1, id, *n))
            .collect();
        WordWithNotations::new(Word::with_id(id, 1, text), notations)
    }

    #[test]
    fn test_word_link_markup() {
        assert_eq!(word_link(5, "林檎"), "<a href=\"/words/5\">林檎</a>");
    }

    #[test]
    fn test_render_notation_match() {
        let words = vec![entry(5, "りんご", &["林檎"])];
        let expected = "<a href=\"/words/5\">林檎</a>を食べた";

        assert_eq!(render_with_links("林檎を食べた", &words), expected);
        assert_eq!(render_with_links_non_overlapping("林檎を食べた", &words), expected);
    }

    #[test]
    fn test_render_replaces_all_occurrences() {
        let words = vec![entry(2, "猫", &[])];
        assert_eq!(
            render_with_links("猫と猫", &words),
            "<a href=\"/words/2\">猫</a>と<a href=\"/words/2\">猫</a>"
        );
    }

    #[test]
    fn test_render_without_words_is_identity() {
        assert_eq!(render_with_links("そのまま", &[]), "そのまま");
        assert_eq!(render_with_links_non_overlapping("そのまま", &[]), "そのまま");
    }

    #[test]
    fn test_sequential_relinks_inside_existing_markup() {
        // 赤 is a substring of the label already inserted for 赤い
        let words = vec![entry(1, "赤い", &["赤"])];
        let rendered = render_with_links("赤い花", &words);

        assert_eq!(
            rendered,
            "<a href=\"/words/1\"><a href=\"/words/1\">赤</a>い</a>花"
        );
    }

    #[test]
    fn test_sequential_matches_markup_text() {
        let words = vec![entry(7, "リンク", &[]), entry(8, "words", &[])];
        let rendered = render_with_links("リンク", &words);

        assert!(rendered.contains("/<a href=\"/words/8\">words</a>/7"));
    }

    #[test]
    fn test_non_overlapping_prefers_longest() {
        let words = vec![entry(1, "赤", &[]), entry(2, "赤い", &[])];
        let rendered = render_with_links_non_overlapping("赤い花と赤", &words);

        assert_eq!(
            rendered,
            "<a href=\"/words/2\">赤い</a>花と<a href=\"/words/1\">赤</a>"
        );
    }

    #[test]
    fn test_non_overlapping_never_touches_markup() {
        let words = vec![entry(7, "リンク", &[]), entry(8, "words", &[])];
        assert_eq!(
            render_with_links_non_overlapping("リンク", &words),
            "<a href=\"/words/7\">リンク</a>"
        );
    }

    #[test]
    fn test_non_overlapping_equal_length_keeps_supply_order() {
        let words = vec![entry(1, "あい", &[]), entry(2, "いう", &[])];
        assert_eq!(
            render_with_links_non_overlapping("あいう", &words),
            "<a href=\"/words/1\">あい</a>う"
        );
    }

    #[test]
    fn test_empty_patterns_are_skipped() {
        let words = vec![entry(1, "", &[""])];
        assert_eq!(render_with_links("文", &words), "文");
        assert_eq!(render_with_links_non_overlapping("文", &words), "文");
    }

    #[test]
    fn test_render_mode_parse_and_display() {
        assert_eq!("sequential".parse::<RenderMode>(), Ok(RenderMode::Sequential));
        assert_eq!(
            "Non-Overlapping".parse::<RenderMode>(),
            Ok(RenderMode::NonOverlapping)
        );
        assert!("fuzzy".parse::<RenderMode>().is_err());
        assert_eq!(RenderMode::NonOverlapping.to_string(), "non-overlapping");
        assert_eq!(RenderMode::default(), RenderMode::Sequential);
    }

    #[test]
    fn test_render_mode_dispatch() {
        let words = vec![entry(1, "赤い", &["赤"])];
        assert_eq!(
            RenderMode::NonOverlapping.render("赤い花", &words),
            "<a href=\"/words/1\">赤い</a>花"
        );
        assert_eq!(
            RenderMode::Sequential.render("赤い花", &words),
            render_with_links("赤い花", &words)
        );
    }
}
