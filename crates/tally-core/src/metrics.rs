//! Character, word, and sentence counts plus a reading-time estimate.
//!
//! Every function here is total: empty, whitespace-only, and letter-free
//! inputs all produce zero rather than an error.

use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Average silent-reading speed used for the reading-time estimate.
pub const WORDS_PER_MINUTE: usize = 200;

/// A maximal run of word characters (letters, digits, underscore).
static WORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("valid regex"));

/// Non-terminal characters followed by one or more terminators.
static SENTENCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.!?]+[.!?]+").expect("valid regex"));

/// Counts computed over a single snapshot of the text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Metrics {
    /// Characters, optionally excluding whitespace.
    pub char_count: usize,
    /// Runs of word characters.
    pub word_count: usize,
    /// Runs of text terminated by `.`, `!` or `?`.
    pub sentence_count: usize,
    /// Whole minutes needed to read the text at [`WORDS_PER_MINUTE`].
    pub reading_time_minutes: usize,
}

/// Compute all four metrics for `text`.
///
/// `exclude_whitespace` only affects [`Metrics::char_count`].
#[tracing::instrument(skip(text), fields(text_len = text.len()))]
pub fn compute_metrics(text: &str, exclude_whitespace: bool) -> Metrics {
    let word_count = word_count(text);
    let metrics = Metrics {
        char_count: char_count(text, exclude_whitespace),
        word_count,
        sentence_count: sentence_count(text),
        reading_time_minutes: minutes_for_words(word_count),
    };
    tracing::debug!(?metrics, "metrics computed");
    metrics
}

/// Number of characters in `text`, in Unicode scalar values.
///
/// With `exclude_whitespace`, every whitespace code point is skipped.
pub fn char_count(text: &str, exclude_whitespace: bool) -> usize {
    if exclude_whitespace {
        text.chars().filter(|c| !c.is_whitespace()).count()
    } else {
        text.chars().count()
    }
}

/// Number of words in `text`.
pub fn word_count(text: &str) -> usize {
    WORD_PATTERN.find_iter(text.trim()).count()
}

/// Number of sentences in `text`.
///
/// Trailing text without a terminator does not count, so `"No punctuation
/// here"` has zero sentences.
pub fn sentence_count(text: &str) -> usize {
    SENTENCE_PATTERN.find_iter(text).count()
}

/// Estimated reading time in whole minutes, rounded up.
pub fn reading_time_minutes(text: &str) -> usize {
    minutes_for_words(word_count(text))
}

const fn minutes_for_words(words: usize) -> usize {
    if words == 0 {
        return 0;
    }
    words.div_ceil(WORDS_PER_MINUTE)
}
