use thiserror::Error;

use crate::bank::BankError;
use crate::model::{QuestionError, TopicSlugError};
use crate::session::SessionError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Topic(#[from] TopicSlugError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
