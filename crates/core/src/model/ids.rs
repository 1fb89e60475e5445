use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Identifier for a question block within a single test bank.
///
/// Assigned by position when the bank is loaded, starting at 1.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(u64);

impl BlockId {
    /// Creates a new `BlockId`
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockId({})", self.0)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BlockId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self)
    }
}

// ─── Tokens ─────────────────────────────────────────────────────────────────────

/// Opaque value token carried by an option and compared against the block's
/// correct-answer token.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionToken(String);

impl OptionToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Positional token: 0 -> "A", 1 -> "B", ..., 25 -> "Z", 26 -> "AA".
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        let mut n = index + 1;
        let mut label = Vec::new();
        while n > 0 {
            let rem = (n - 1) % 26;
            label.push(b'A' + u8::try_from(rem).unwrap_or(0));
            n = (n - 1) / 26;
        }
        label.reverse();
        Self(String::from_utf8_lossy(&label).into_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for OptionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionToken({:?})", self.0)
    }
}

impl fmt::Display for OptionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OptionToken {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ─── Topic slug ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TopicSlugError {
    #[error("topic slug is empty")]
    Empty,

    #[error("topic slug contains invalid character {0:?}")]
    InvalidChar(char),
}

/// Identifier of a quiz topic, used to namespace persisted scores.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TopicSlug(String);

impl TopicSlug {
    const UNKNOWN: &'static str = "unknown";

    /// Validate and build a slug. Allowed characters are ASCII alphanumerics, `-` and `_`.
    ///
    /// # Errors
    ///
    /// Returns `TopicSlugError` if the trimmed value is empty or has other characters.
    pub fn new(raw: impl Into<String>) -> Result<Self, TopicSlugError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TopicSlugError::Empty);
        }
        if let Some(bad) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(TopicSlugError::InvalidChar(bad));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Slug used when a page carries no topic.
    #[must_use]
    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_owned())
    }

    /// Parse the slug, falling back to [`TopicSlug::unknown`] on missing or invalid input.
    #[must_use]
    pub fn or_unknown(raw: Option<&str>) -> Self {
        raw.and_then(|value| Self::new(value).ok())
            .unwrap_or_else(Self::unknown)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TopicSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TopicSlug({:?})", self.0)
    }
}

impl fmt::Display for TopicSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TopicSlug {
    type Err = TopicSlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TopicSlug {
    type Error = TopicSlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TopicSlug> for String {
    fn from(value: TopicSlug) -> Self {
        value.0
    }
}
