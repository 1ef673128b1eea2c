//! Letter density view.
//!
//! Ranks a [`FrequencyTable`] by descending count, picks the entries to show,
//! and attaches each letter's share of the total as a percentage.
//!
//! Ranking uses a stable sort over the table's first-occurrence order, so
//! letters with equal counts keep the order in which they first appeared in
//! the text.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::frequency::{FrequencyTable, compute_frequencies};

/// Entries shown before the "see more" affordance kicks in.
pub const VISIBLE_LETTERS: usize = 5;

/// One row of the density view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RankedEntry {
    /// Upper-case letter `A`–`Z`.
    pub letter: char,
    /// Occurrences of the letter.
    pub count: usize,
    /// Share of all letters, 0–100, rounded to two decimals.
    pub percentage: f64,
}

/// What the presentation layer should render for the density panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DisplayState {
    /// The trimmed input was empty.
    Empty,
    /// Ranked letters to show.
    Populated {
        /// Visible entries, highest count first.
        entries: Vec<RankedEntry>,
        /// More than [`VISIBLE_LETTERS`] distinct letters exist.
        has_more: bool,
    },
}

impl DisplayState {
    /// Visible entries; empty for [`DisplayState::Empty`].
    pub fn entries(&self) -> &[RankedEntry] {
        match self {
            Self::Empty => &[],
            Self::Populated { entries, .. } => entries,
        }
    }

    /// Whether a "see more" toggle should be offered.
    pub const fn has_more(&self) -> bool {
        match self {
            Self::Empty => false,
            Self::Populated { has_more, .. } => *has_more,
        }
    }

    /// Whether this is the empty state.
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Sort the table's letters by descending count.
///
/// Ties keep first-occurrence order.
pub fn rank(table: &FrequencyTable) -> Vec<(char, usize)> {
    let mut ranked: Vec<(char, usize)> = table.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// The slice of `ranked` that should be shown.
pub fn select_visible<T>(ranked: &[T], show_all: bool) -> &[T] {
    if show_all {
        ranked
    } else {
        &ranked[..ranked.len().min(VISIBLE_LETTERS)]
    }
}

/// `count` as a percentage of `total`, rounded to two decimals.
///
/// Returns `0.0` when `total` is zero.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = count as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

/// Whether `ranked` has more entries than the default view shows.
pub const fn has_more(ranked_len: usize) -> bool {
    ranked_len > VISIBLE_LETTERS
}

/// Rank a table and turn the visible part into [`RankedEntry`] rows.
pub fn present(table: &FrequencyTable, show_all: bool) -> DisplayState {
    let ranked = rank(table);
    let total = table.total();
    let entries = select_visible(&ranked, show_all)
        .iter()
        .map(|&(letter, count)| RankedEntry {
            letter,
            count,
            percentage: percentage(count, total),
        })
        .collect();

    DisplayState::Populated {
        entries,
        has_more: has_more(ranked.len()),
    }
}

/// Build the density view for raw `text`.
///
/// Surrounding whitespace is trimmed first; if nothing is left the result is
/// [`DisplayState::Empty`]. Text that has content but no letters yields a
/// populated state with no entries.
#[tracing::instrument(skip(text), fields(text_len = text.len()))]
pub fn build_display_state(text: &str, show_all_letters: bool) -> DisplayState {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        tracing::debug!("trimmed text is empty");
        return DisplayState::Empty;
    }
    present(&compute_frequencies(trimmed), show_all_letters)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters(state: &DisplayState) -> String {
        state.entries().iter().map(|e| e.letter).collect()
    }

    #[test]
    fn rank_sorts_by_descending_count() {
        let ranked = rank(&compute_frequencies("Hello, HELLO!"));
        assert_eq!(ranked, vec![('L', 4), ('H', 2), ('E', 2), ('O', 2)]);
    }

    #[test]
    fn rank_is_monotonic() {
        let ranked = rank(&compute_frequencies("the quick brown fox jumps over the lazy dog"));
        assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn ties_keep_first_occurrence_order() {
        let ranked = rank(&compute_frequencies("dcba abcd"));
        let order: String = ranked.iter().map(|(l, _)| *l).collect();
        assert_eq!(order, "DCBA");
    }

    #[test]
    fn select_visible_caps_at_five() {
        let ranked = rank(&compute_frequencies("abcdefg"));
        assert_eq!(select_visible(&ranked, false).len(), 5);
        assert_eq!(select_visible(&ranked, true).len(), 7);
    }

    #[test]
    fn select_visible_with_few_letters() {
        let ranked = rank(&compute_frequencies("aab"));
        assert_eq!(select_visible(&ranked, false).len(), 2);
        assert_eq!(select_visible(&ranked, true).len(), 2);
        let none: Vec<(char, usize)> = Vec::new();
        assert!(select_visible(&none, false).is_empty());
    }

    #[test]
    fn percentage_rounds_to_two_decimals() {
        assert!((percentage(1, 3) - 33.33).abs() < f64::EPSILON);
        assert!((percentage(2, 3) - 66.67).abs() < f64::EPSILON);
        assert!((percentage(4, 10) - 40.0).abs() < f64::EPSILON);
        assert!(percentage(5, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn percentages_sum_to_one_hundred() {
        let table = compute_frequencies("Sphinx of black quartz, judge my vow");
        let sum: f64 = rank(&table)
            .iter()
            .map(|&(_, count)| percentage(count, table.total()))
            .sum();
        assert!((sum - 100.0).abs() < 0.01 * table.len() as f64);
    }

    #[test]
    fn empty_after_trim() {
        assert_eq!(build_display_state("", false), DisplayState::Empty);
        assert_eq!(build_display_state(" \n\t ", true), DisplayState::Empty);
    }

    #[test]
    fn content_without_letters_is_populated_but_empty() {
        let state = build_display_state("1234 !!", false);
        assert_eq!(
            state,
            DisplayState::Populated {
                entries: Vec::new(),
                has_more: false,
            }
        );
    }

    #[test]
    fn has_more_ignores_show_all() {
        let collapsed = build_display_state("abcdef", false);
        let expanded = build_display_state("abcdef", true);
        assert!(collapsed.has_more());
        assert!(expanded.has_more());
        assert_eq!(collapsed.entries().len(), 5);
        assert_eq!(expanded.entries().len(), 6);
        assert_eq!(letters(&expanded), "ABCDEF");
    }

    #[test]
    fn five_letters_has_no_more() {
        let state = build_display_state("abcde", false);
        assert!(!state.has_more());
        assert_eq!(state.entries().len(), 5);
    }

    #[test]
    fn entries_carry_percentages() {
        let state = build_display_state("  Hello, HELLO!  ", false);
        let first = state.entries()[0];
        assert_eq!(first.letter, 'L');
        assert_eq!(first.count, 4);
        assert!((first.percentage - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn serializes_with_state_tag() {
        let json = serde_json::to_value(build_display_state("ab", false)).unwrap();
        assert_eq!(json["state"], "populated");
        assert_eq!(json["has_more"], false);
        assert_eq!(json["entries"][0]["letter"], "A");

        let empty = serde_json::to_value(DisplayState::Empty).unwrap();
        assert_eq!(empty["state"], "empty");
    }
}
