//! Per-letter frequency analysis.
//!
//! Text is upper-cased, everything outside `A`–`Z` is dropped, and the
//! remaining letters are tallied into a table that remembers the order in
//! which each letter first appeared. That order is what breaks ties when the
//! table is later ranked by [`crate::density::rank`].

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Letter counts in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FrequencyTable {
    counts: IndexMap<char, usize>,
    total: usize,
}

impl FrequencyTable {
    /// Occurrences of `letter`, if it appears at all.
    ///
    /// Lookups are case-insensitive.
    pub fn get(&self, letter: char) -> Option<usize> {
        self.counts.get(&letter.to_ascii_uppercase()).copied()
    }

    /// Number of distinct letters.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no letter was found.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total letters counted; always the sum of every entry.
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Iterate `(letter, count)` pairs in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (char, usize)> + '_ {
        self.counts.iter().map(|(&letter, &count)| (letter, count))
    }

    /// Distinct letters in first-occurrence order.
    pub fn unique_letters(&self) -> impl Iterator<Item = char> + '_ {
        self.counts.keys().copied()
    }
}

/// Build the frequency table for `text`.
#[tracing::instrument(skip(text), fields(text_len = text.len()))]
pub fn compute_frequencies(text: &str) -> FrequencyTable {
    let mut counts: IndexMap<char, usize> = IndexMap::new();
    let mut total = 0;

    for letter in text.to_uppercase().chars().filter(char::is_ascii_uppercase) {
        *counts.entry(letter).or_insert(0) += 1;
        total += 1;
    }

    tracing::debug!(unique = counts.len(), total, "letter frequencies computed");
    FrequencyTable { counts, total }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_example() {
        let table = compute_frequencies("Hello, HELLO!");
        assert_eq!(table.get('H'), Some(2));
        assert_eq!(table.get('E'), Some(2));
        assert_eq!(table.get('L'), Some(4));
        assert_eq!(table.get('O'), Some(2));
        assert_eq!(table.total(), 10);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn keys_follow_first_occurrence() {
        let table = compute_frequencies("zebra Apple");
        let order: String = table.unique_letters().collect();
        assert_eq!(order, "ZEBRAPL");
    }

    #[test]
    fn total_matches_sum_of_counts() {
        for text in ["", "123 !!", "The quick brown fox", "ÀÉ résumé ß", "a_b-c.d"] {
            let table = compute_frequencies(text);
            let sum: usize = table.iter().map(|(_, count)| count).sum();
            assert_eq!(sum, table.total(), "sum mismatch for {text:?}");
        }
    }

    #[test]
    fn no_letters_yields_empty_table() {
        let table = compute_frequencies("42 -- 7?");
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
        assert_eq!(table.get('A'), None);
    }

    #[test]
    fn non_ascii_letters_are_dropped() {
        let table = compute_frequencies("résumé");
        // É folds to a non-ASCII capital and is discarded.
        assert_eq!(table.total(), 4);
        assert_eq!(table.get('R'), Some(1));
        assert_eq!(table.get('S'), Some(1));
        assert_eq!(table.get('U'), Some(1));
        assert_eq!(table.get('M'), Some(1));
    }

    #[test]
    fn sharp_s_upper_cases_to_two_letters() {
        let table = compute_frequencies("ß");
        assert_eq!(table.get('S'), Some(2));
        assert_eq!(table.total(), 2);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let table = compute_frequencies("aaa");
        assert_eq!(table.get('a'), Some(3));
    }
}
