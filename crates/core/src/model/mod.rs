mod ids;
mod question;
mod score;

pub use ids::{BlockId, OptionToken, TopicSlug, TopicSlugError};

pub use question::{BlockState, OptionMarks, QuestionBlock, QuestionError, QuizOption};
pub use score::{
    PersistedSummary, SUMMARY_KEY_PREFIX, ScoreDisplay, ScoreLine, SessionScore,
};
