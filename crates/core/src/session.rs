use thiserror::Error;

use crate::bank::TestBank;
use crate::model::{
    BlockId, OptionToken, PersistedSummary, QuestionBlock, ScoreDisplay, ScoreLine, SessionScore,
    TopicSlug,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("unknown question block {0}")]
    UnknownBlock(BlockId),

    #[error("block {block} has no option {token}")]
    UnknownOption { block: BlockId, token: OptionToken },
}

/// Result of selecting an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The block moved to answered; `correct` tells whether the pick matched.
    Answered { correct: bool },
    /// The block was already answered; nothing changed.
    AlreadyAnswered,
}

impl SelectOutcome {
    #[must_use]
    pub fn changed(self) -> bool {
        matches!(self, Self::Answered { .. })
    }
}

/// In-memory quiz state for one topic page.
///
/// Owns the question blocks and the running score. Every transition is
/// synchronous; persistence is layered on top by the services crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    topic: TopicSlug,
    title: String,
    blocks: Vec<QuestionBlock>,
    score: SessionScore,
}

impl QuizSession {
    /// Start a fresh session: every block unanswered, counters at zero.
    #[must_use]
    pub fn new(bank: TestBank) -> Self {
        let (topic, title, mut blocks) = bank.into_parts();
        for block in &mut blocks {
            block.reset();
        }
        Self {
            topic,
            title,
            blocks,
            score: SessionScore::default(),
        }
    }

    #[must_use]
    pub fn topic(&self) -> &TopicSlug {
        &self.topic
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn blocks(&self) -> &[QuestionBlock] {
        &self.blocks
    }

    #[must_use]
    pub fn block(&self, id: BlockId) -> Option<&QuestionBlock> {
        self.blocks.iter().find(|b| b.id() == id)
    }

    #[must_use]
    pub fn score(&self) -> SessionScore {
        self.score
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        u32::try_from(self.blocks.len()).unwrap_or(u32::MAX)
    }

    /// True once as many answers as blocks have been recorded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.score.total_answered() >= self.total_questions()
    }

    fn block_mut(&mut self, id: BlockId) -> Result<&mut QuestionBlock, SessionError> {
        self.blocks
            .iter_mut()
            .find(|b| b.id() == id)
            .ok_or(SessionError::UnknownBlock(id))
    }

    /// Answer `block` with the option carrying `token`.
    ///
    /// An already answered block is left untouched and reported as
    /// [`SelectOutcome::AlreadyAnswered`].
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownBlock` or `SessionError::UnknownOption` when
    /// the ids do not name anything in this session.
    pub fn select_option(
        &mut self,
        block: BlockId,
        token: &OptionToken,
    ) -> Result<SelectOutcome, SessionError> {
        let target = self.block_mut(block)?;
        if target.is_answered() {
            return Ok(SelectOutcome::AlreadyAnswered);
        }
        if target.option(token).is_none() {
            return Err(SessionError::UnknownOption {
                block,
                token: token.clone(),
            });
        }

        let Some(correct) = target.answer(token) else {
            return Ok(SelectOutcome::AlreadyAnswered);
        };
        self.score.record(correct);
        Ok(SelectOutcome::Answered { correct })
    }

    /// Show the explanation for `block` without scoring it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownBlock` if the block is not part of this session.
    pub fn reveal_answer(&mut self, block: BlockId) -> Result<(), SessionError> {
        self.block_mut(block)?.reveal();
        Ok(())
    }

    /// Current contents of the score pill and, once complete, the final score.
    #[must_use]
    pub fn score_display(&self) -> ScoreDisplay {
        let pill = ScoreLine {
            correct: self.score.total_correct(),
            of: self.score.total_answered(),
        };
        let final_score = self.is_complete().then(|| ScoreLine {
            correct: self.score.total_correct(),
            of: self.total_questions(),
        });
        ScoreDisplay { pill, final_score }
    }

    /// Return every block to unanswered and zero the counters.
    pub fn reset_all(&mut self) -> ScoreDisplay {
        self.score.reset();
        for block in &mut self.blocks {
            block.reset();
        }
        ScoreDisplay::reset()
    }

    /// Record to persist for this topic.
    #[must_use]
    pub fn summary(&self) -> PersistedSummary {
        PersistedSummary {
            answered: self.score.total_answered(),
            correct: self.score.total_correct(),
            total: self.total_questions(),
        }
    }

    #[must_use]
    pub fn storage_key(&self) -> String {
        PersistedSummary::storage_key(&self.topic)
    }
}
