//! Optional character limit.
//!
//! A limit is whatever the user typed into a free-form field, so parsing is
//! lenient: anything that does not start with a positive integer means "no
//! limit configured" and every limit check is skipped.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::metrics::char_count;

/// A configured, non-zero character limit.
///
/// Deserialize through [`deserialize_lenient`] so bad input becomes `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct CharLimit(usize);

impl CharLimit {
    /// Wrap `limit`; zero means no limit.
    pub const fn new(limit: usize) -> Option<Self> {
        if limit == 0 { None } else { Some(Self(limit)) }
    }

    /// Parse a user-entered limit.
    ///
    /// Leading whitespace is skipped and the leading run of ASCII digits is
    /// used, so `"250 chars"` is 250. Empty, non-numeric, and zero values
    /// return `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim_start();
        let digits = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .map_or(trimmed, |end| &trimmed[..end]);
        // An overlong run of digits is still a limit nobody can reach.
        let value = if digits.is_empty() {
            0
        } else {
            digits.parse::<usize>().unwrap_or(usize::MAX)
        };
        Self::new(value)
    }

    /// The limit as a number.
    pub const fn get(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for CharLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Where the current text stands relative to the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LimitStatus {
    /// No limit configured.
    Unlimited,
    /// Below the limit.
    Within {
        /// Current character count.
        count: usize,
        /// Configured limit.
        limit: usize,
    },
    /// At or above the limit.
    Reached {
        /// Current character count.
        count: usize,
        /// Configured limit.
        limit: usize,
    },
}

impl LimitStatus {
    /// Whether the limit has been reached.
    pub const fn is_reached(&self) -> bool {
        matches!(self, Self::Reached { .. })
    }

    /// The warning to show when the limit has been reached.
    pub fn warning(&self) -> Option<String> {
        match self {
            Self::Reached { count, limit } => Some(format!(
                "Limit reached! You've typed {count} characters out of {limit}."
            )),
            Self::Unlimited | Self::Within { .. } => None,
        }
    }
}

/// Compare a character count against an optional limit.
pub const fn limit_status(count: usize, limit: Option<CharLimit>) -> LimitStatus {
    match limit {
        None => LimitStatus::Unlimited,
        Some(CharLimit(limit)) if count >= limit => LimitStatus::Reached { count, limit },
        Some(CharLimit(limit)) => LimitStatus::Within { count, limit },
    }
}

/// Whether inserting `inserted` after `current` would push the text past the
/// limit.
///
/// Reaching the limit exactly is allowed; only going over it is rejected.
pub fn would_exceed(
    current: &str,
    inserted: &str,
    exclude_whitespace: bool,
    limit: Option<CharLimit>,
) -> bool {
    let Some(CharLimit(limit)) = limit else {
        return false;
    };
    let next = char_count(current, exclude_whitespace) + char_count(inserted, exclude_whitespace);
    let exceeds = next > limit;
    if exceeds {
        tracing::debug!(next, limit, "edit rejected by character limit");
    }
    exceeds
}

/// Deserialize an optional limit from a number or a string.
///
/// Anything that does not yield a positive limit becomes `None` instead of an
/// error.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<CharLimit>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Text(String),
    }

    let raw: Option<Raw> = Option::deserialize(deserializer)?;
    Ok(match raw {
        None => None,
        Some(Raw::Unsigned(n)) => CharLimit::new(usize::try_from(n).unwrap_or(usize::MAX)),
        Some(Raw::Signed(_)) => None,
        Some(Raw::Float(f)) if f.is_finite() && f >= 1.0 => CharLimit::new(f as usize),
        Some(Raw::Float(_)) => None,
        Some(Raw::Text(s)) => CharLimit::parse(&s),
    })
}
