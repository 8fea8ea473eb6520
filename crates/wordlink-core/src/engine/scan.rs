//! Substring scanning of sentences against words

use crate::models::{Notation, Word};

/// Whether `sentence_text` contains the word or any of its notations
///
/// The word's own text is checked first, then notations in the order given;
/// the first hit wins. Matching is plain substring containment with no case
/// folding or trimming. Empty texts never match.
pub fn scan_sentence_against_word(sentence_text: &str, word: &Word, notations: &[Notation]) -> bool {
    if contains_pattern(sentence_text, &word.text) {
        return true;
    }

    notations
        .iter()
        .any(|notation| contains_pattern(sentence_text, &notation.text))
}

fn contains_pattern(haystack: &str, pattern: &str) -> bool {
    !pattern.is_empty() && haystack.contains(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str) -> Word {
        Word::with_id(1, 1, text)
    }

    fn notations(texts: &[&str]) -> Vec<Notation> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| Notation::with_id(i as i64 + 1, 1, *text))
            .collect()
    }

    #[test]
    fn test_matches_word_text() {
        assert!(scan_sentence_against_word("赤いリンゴを食べた", &word("赤い"), &[]));
    }

    #[test]
    fn test_matches_notation() {
        let found = scan_sentence_against_word(
            "林檎を食べた",
            &word("りんご"),
            &notations(&["リンゴ", "林檎"]),
        );
        assert!(found);
    }

    #[test]
    fn test_no_match() {
        let found =
            scan_sentence_against_word("青い空", &word("りんご"), &notations(&["林檎"]));
        assert!(!found);
    }

    #[test]
    fn test_exact_substring_only() {
        // No case folding
        assert!(!scan_sentence_against_word("Apple pie", &word("apple"), &[]));
        // No trimming
        assert!(!scan_sentence_against_word("an apple", &word(" apple "), &[]));
    }

    #[test]
    fn test_empty_patterns_never_match() {
        assert!(!scan_sentence_against_word("何でも", &word(""), &notations(&[""])));
    }
}
