pub mod limiter;
pub mod parallel;
pub mod pool;
pub mod selfcheck;

pub use limiter::{Limiter, Permit};
pub use parallel::{BenchReport, ParallelBench};
pub use pool::{HandlePool, Pooled};

use crate::engine::remove_spaces;

/// Letters used when a filter is empty
pub const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Marks a special token category; such words are filtered by their second char.
pub const SPECIAL_PREFIX: char = '_';

/// The char a word is filtered on: its first, or its second if the first is
/// [`SPECIAL_PREFIX`]. `None` for words too short to have one.
pub fn test_letter(word: &str) -> Option<char> {
    let mut chars = word.chars();
    match chars.next()? {
        SPECIAL_PREFIX => chars.next(),
        first => Some(first),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Scheduled,
    Skipped,
    /// No test letter at all (empty word or a lone prefix)
    Rejected,
}

/// Case-sensitive set of letters selecting which words a pass covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterFilter {
    letters: String,
}

impl LetterFilter {
    /// Whitespace is stripped; an empty filter means the whole lowercase alphabet.
    pub fn new(input: &str) -> Self {
        let letters = remove_spaces(input);
        Self {
            letters: if letters.is_empty() {
                ALPHABET.to_string()
            } else {
                letters
            },
        }
    }

    pub fn letters(&self) -> &str {
        &self.letters
    }

    pub fn classify(&self, word: &str) -> Eligibility {
        match test_letter(word) {
            None => Eligibility::Rejected,
            Some(letter) if self.letters.contains(letter) => Eligibility::Scheduled,
            Some(_) => Eligibility::Skipped,
        }
    }

    pub fn matches(&self, word: &str) -> bool {
        self.classify(word) == Eligibility::Scheduled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_extraction() {
        assert_eq!(test_letter("apple"), Some('a'));
        assert_eq!(test_letter("_xray"), Some('x'));
        assert_eq!(test_letter("__init"), Some('_'));
        assert_eq!(test_letter("_"), None);
        assert_eq!(test_letter(""), None);
        assert_eq!(test_letter("école"), Some('é'));
    }

    #[test]
    fn test_filter_selects_expected_words() {
        let filter = LetterFilter::new("abc");
        let words = ["apple", "banana", "zebra", "_xray"];

        let scheduled: Vec<_> = words.iter().filter(|w| filter.matches(w)).collect();
        assert_eq!(scheduled, vec![&"apple", &"banana"]);
    }

    #[test]
    fn test_filter_normalization() {
        assert_eq!(LetterFilter::new("").letters(), ALPHABET);
        assert_eq!(LetterFilter::new("  \t").letters(), ALPHABET);
        assert_eq!(LetterFilter::new(" a b ").letters(), "ab");
    }

    #[test]
    fn test_filter_is_case_sensitive() {
        let filter = LetterFilter::new("a");
        assert_eq!(filter.classify("apple"), Eligibility::Scheduled);
        assert_eq!(filter.classify("Apple"), Eligibility::Skipped);
        assert_eq!(filter.classify(""), Eligibility::Rejected);
        assert_eq!(filter.classify("_"), Eligibility::Rejected);
    }
}
