use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{BlockId, OptionToken};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question has no options")]
    NoOptions,

    #[error("duplicate option token {0}")]
    DuplicateToken(OptionToken),

    #[error("answer {0} does not match any option")]
    UnknownAnswer(String),
}

//
// ─── OPTION ────────────────────────────────────────────────────────────────────
//

/// Visual markings carried by an option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionMarks {
    pub correct: bool,
    pub wrong: bool,
    pub selected: bool,
    pub disabled: bool,
}

impl OptionMarks {
    #[must_use]
    pub fn is_clear(&self) -> bool {
        *self == Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// One selectable choice within a question block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOption {
    token: OptionToken,
    text: String,
    marks: OptionMarks,
}

impl QuizOption {
    #[must_use]
    pub fn new(token: OptionToken, text: impl Into<String>) -> Self {
        Self {
            token,
            text: text.into(),
            marks: OptionMarks::default(),
        }
    }

    #[must_use]
    pub fn token(&self) -> &OptionToken {
        &self.token
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn marks(&self) -> OptionMarks {
        self.marks
    }

    pub(crate) fn marks_mut(&mut self) -> &mut OptionMarks {
        &mut self.marks
    }
}

//
// ─── BLOCK ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockState {
    #[default]
    Unanswered,
    Answered,
}

/// A displayable quiz question: its options, the correct token, and the
/// explanation shown once answered or revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBlock {
    id: BlockId,
    prompt: String,
    options: Vec<QuizOption>,
    correct: OptionToken,
    explanation: String,
    state: BlockState,
    explanation_visible: bool,
    reveal_control_visible: bool,
}

impl QuestionBlock {
    /// Build an unanswered block.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::NoOptions` for an empty option list,
    /// `QuestionError::DuplicateToken` if two options share a token, and
    /// `QuestionError::UnknownAnswer` if `correct` matches no option.
    pub fn new(
        id: BlockId,
        prompt: impl Into<String>,
        options: Vec<QuizOption>,
        correct: OptionToken,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        if options.is_empty() {
            return Err(QuestionError::NoOptions);
        }

        let mut seen = HashSet::with_capacity(options.len());
        for option in &options {
            if !seen.insert(option.token()) {
                return Err(QuestionError::DuplicateToken(option.token().clone()));
            }
        }

        if !seen.contains(&correct) {
            return Err(QuestionError::UnknownAnswer(correct.to_string()));
        }

        Ok(Self {
            id,
            prompt: prompt.into(),
            options,
            correct,
            explanation: explanation.into(),
            state: BlockState::Unanswered,
            explanation_visible: false,
            reveal_control_visible: true,
        })
    }

    #[must_use]
    pub fn id(&self) -> BlockId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[QuizOption] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, token: &OptionToken) -> Option<&QuizOption> {
        self.options.iter().find(|opt| opt.token() == token)
    }

    #[must_use]
    pub fn correct_token(&self) -> &OptionToken {
        &self.correct
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn state(&self) -> BlockState {
        self.state
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.state == BlockState::Answered
    }

    #[must_use]
    pub fn explanation_visible(&self) -> bool {
        self.explanation_visible
    }

    #[must_use]
    pub fn reveal_control_visible(&self) -> bool {
        self.reveal_control_visible
    }

    /// Record an answer. Returns `None` when the block was already answered,
    /// otherwise whether the selection was correct.
    ///
    /// The caller guarantees `token` belongs to this block.
    pub(crate) fn answer(&mut self, token: &OptionToken) -> Option<bool> {
        if self.is_answered() {
            return None;
        }
        self.state = BlockState::Answered;

        let is_correct = *token == self.correct;
        for option in &mut self.options {
            let picked = option.token == *token;
            let canonical = option.token == self.correct;
            let marks = option.marks_mut();
            if picked {
                marks.selected = true;
                if is_correct {
                    marks.correct = true;
                } else {
                    marks.wrong = true;
                }
            } else if !is_correct && canonical {
                marks.correct = true;
            }
            marks.disabled = true;
        }

        self.reveal();
        Some(is_correct)
    }

    /// Show the explanation and hide the reveal control.
    pub(crate) fn reveal(&mut self) {
        self.explanation_visible = true;
        self.reveal_control_visible = false;
    }

    pub(crate) fn reset(&mut self) {
        self.state = BlockState::Unanswered;
        for option in &mut self.options {
            option.marks_mut().clear();
        }
        self.explanation_visible = false;
        self.reveal_control_visible = true;
    }
}
