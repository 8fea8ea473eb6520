//! Root-form derivation
//!
//! A word such as 買う should also match 買わない or 買いたい. Stripping the
//! inflectional ending and storing the stem as a notation gives the scanner
//! that wider match for free.

/// Endings stripped from a word to derive its stem, checked in order
pub const ROOT_SUFFIXES: &[&str] = &[
    "う", // 買う -> 買
    "く", // 聞く -> 聞
    "す", // 直す -> 直
    "つ", // 打つ -> 打
    "む", // 霞む -> 霞
    "る", // 走る -> 走
    "い", // 暗い -> 暗
];

/// Stems derived from `text`, one per matching suffix
///
/// Every suffix in [`ROOT_SUFFIXES`] that `text` ends with contributes one
/// stem. A word that consists of nothing but a suffix yields no stem: an
/// empty notation would match every sentence.
pub fn derive_roots(text: &str) -> Vec<String> {
    ROOT_SUFFIXES
        .iter()
        .filter_map(|suffix| text.strip_suffix(suffix))
        .filter(|root| !root.is_empty())
        .map(str::to_string)
        .collect()
}
