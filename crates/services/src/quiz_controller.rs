use std::sync::Arc;

use testbank_core::model::{BlockId, OptionToken, PersistedSummary, ScoreDisplay, TopicSlug};
use testbank_core::{QuizSession, SelectOutcome, TestBank};

use crate::progress_service::ProgressService;

/// What a selection did to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerResult {
    /// The block was answered; the score widgets should show `display`.
    Scored { correct: bool, display: ScoreDisplay },
    /// Already answered, or the ids named nothing on this page.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PersistAction {
    Save(PersistedSummary),
    Clear,
}

/// A pending write to durable storage, detached from the controller so the UI
/// can run it after releasing its borrow of the session.
#[derive(Clone)]
pub struct PersistRequest {
    progress: Arc<ProgressService>,
    topic: TopicSlug,
    action: PersistAction,
}

impl PersistRequest {
    #[must_use]
    pub fn topic(&self) -> &TopicSlug {
        &self.topic
    }

    /// Summary that will be written, or `None` for a clear.
    #[must_use]
    pub fn summary(&self) -> Option<PersistedSummary> {
        match self.action {
            PersistAction::Save(summary) => Some(summary),
            PersistAction::Clear => None,
        }
    }

    pub async fn run(self) {
        match self.action {
            PersistAction::Save(summary) => {
                self.progress.persist_summary(&self.topic, summary).await;
            }
            PersistAction::Clear => self.progress.clear_summary(&self.topic).await,
        }
    }
}

/// Drives one quiz page: applies learner actions to the session and keeps
/// the saved summary in step with it.
pub struct QuizController {
    session: QuizSession,
    progress: Arc<ProgressService>,
}

impl QuizController {
    /// Start a fresh session over `bank`.
    #[must_use]
    pub fn initialize(bank: TestBank, progress: Arc<ProgressService>) -> Self {
        let session = QuizSession::new(bank);
        progress.restore_progress(session.topic());
        log::debug!(
            "quiz {} ready with {} questions",
            session.topic(),
            session.total_questions()
        );
        Self { session, progress }
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn topic(&self) -> &TopicSlug {
        self.session.topic()
    }

    #[must_use]
    pub fn score_display(&self) -> ScoreDisplay {
        self.session.score_display()
    }

    /// Apply a selection synchronously and hand back the write it calls for.
    ///
    /// The answered check happens here, before any await, so a second click
    /// always sees the first one's state.
    pub fn apply_selection(
        &mut self,
        block: BlockId,
        token: &OptionToken,
    ) -> (AnswerResult, Option<PersistRequest>) {
        match self.session.select_option(block, token) {
            Ok(SelectOutcome::Answered { correct }) => {
                let display = self.session.score_display();
                log::debug!(
                    "{} block {block}: {} ({})",
                    self.topic(),
                    if correct { "correct" } else { "wrong" },
                    display.pill
                );
                (
                    AnswerResult::Scored { correct, display },
                    Some(self.save_request()),
                )
            }
            Ok(SelectOutcome::AlreadyAnswered) => (AnswerResult::Ignored, None),
            Err(err) => {
                log::debug!("ignoring selection on {}: {err}", self.topic());
                (AnswerResult::Ignored, None)
            }
        }
    }

    /// Answer `block` with `token`, then persist the summary.
    pub async fn select_option(&mut self, block: BlockId, token: &OptionToken) -> AnswerResult {
        let (result, persist) = self.apply_selection(block, token);
        if let Some(request) = persist {
            request.run().await;
        }
        result
    }

    /// Show a block's explanation without scoring. Returns false for unknown blocks.
    pub fn reveal_answer(&mut self, block: BlockId) -> bool {
        match self.session.reveal_answer(block) {
            Ok(()) => true,
            Err(err) => {
                log::debug!("ignoring reveal on {}: {err}", self.topic());
                false
            }
        }
    }

    /// Reset synchronously and hand back the clear it calls for.
    pub fn apply_reset(&mut self) -> (ScoreDisplay, PersistRequest) {
        let display = self.session.reset_all();
        log::debug!("{} reset", self.topic());
        (display, self.clear_request())
    }

    /// Return every block to unanswered, zero the score and clear the saved summary.
    pub async fn reset_all(&mut self) -> ScoreDisplay {
        let (display, request) = self.apply_reset();
        request.run().await;
        display
    }

    /// Write the current summary.
    pub async fn persist_summary(&self) {
        self.save_request().run().await;
    }

    /// Remove the saved summary for this topic.
    pub async fn clear_summary(&self) {
        self.clear_request().run().await;
    }

    fn save_request(&self) -> PersistRequest {
        PersistRequest {
            progress: Arc::clone(&self.progress),
            topic: self.session.topic().clone(),
            action: PersistAction::Save(self.session.summary()),
        }
    }

    fn clear_request(&self) -> PersistRequest {
        PersistRequest {
            progress: Arc::clone(&self.progress),
            topic: self.session.topic().clone(),
            action: PersistAction::Clear,
        }
    }
}
