use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::TopicSlug;

/// Prefix of the durable storage key for a topic's summary.
pub const SUMMARY_KEY_PREFIX: &str = "testbank_";

/// Running counters for a quiz session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionScore {
    total_answered: u32,
    total_correct: u32,
}

impl SessionScore {
    #[must_use]
    pub fn total_answered(&self) -> u32 {
        self.total_answered
    }

    #[must_use]
    pub fn total_correct(&self) -> u32 {
        self.total_correct
    }

    pub(crate) fn record(&mut self, correct: bool) {
        self.total_answered = self.total_answered.saturating_add(1);
        if correct {
            self.total_correct = self.total_correct.saturating_add(1);
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

/// `"{correct} / {of}"` pair shown in the score pill and the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreLine {
    pub correct: u32,
    pub of: u32,
}

impl fmt::Display for ScoreLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.correct, self.of)
    }
}

/// What the score widgets should show after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreDisplay {
    /// Correct over answered.
    pub pill: ScoreLine,
    /// Correct over total questions; present once every block is answered.
    pub final_score: Option<ScoreLine>,
}

impl ScoreDisplay {
    #[must_use]
    pub fn reset() -> Self {
        Self {
            pill: ScoreLine { correct: 0, of: 0 },
            final_score: None,
        }
    }

    #[must_use]
    pub fn summary_visible(&self) -> bool {
        self.final_score.is_some()
    }
}

/// Per-topic record written to durable storage after every answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSummary {
    pub answered: u32,
    pub correct: u32,
    pub total: u32,
}

impl PersistedSummary {
    #[must_use]
    pub fn storage_key(topic: &TopicSlug) -> String {
        format!("{SUMMARY_KEY_PREFIX}{topic}")
    }

    /// Topic part of a storage key, if it carries the summary prefix.
    #[must_use]
    pub fn topic_from_key(key: &str) -> Option<&str> {
        key.strip_prefix(SUMMARY_KEY_PREFIX)
    }

    /// Serialize to the stored JSON form.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse the stored JSON form.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if the value is not a summary record.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.answered >= self.total
    }
}
