#![forbid(unsafe_code)]

pub mod app_services;
pub mod bank_service;
pub mod error;
pub mod progress_service;
pub mod quiz_controller;

pub use app_services::AppServices;
pub use bank_service::{BankService, TopicOverview};
pub use error::{AppServicesError, BankServiceError};
pub use progress_service::ProgressService;
pub use quiz_controller::{AnswerResult, PersistRequest, QuizController};
