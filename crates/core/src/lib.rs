#![forbid(unsafe_code)]

pub mod bank;
pub mod error;
pub mod model;
pub mod session;

pub use bank::{BankError, TestBank};
pub use error::Error;
pub use session::{QuizSession, SelectOutcome, SessionError};
