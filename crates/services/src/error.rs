//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use storage::sqlite::SqliteInitError;
use testbank_core::BankError;
use testbank_core::model::{TopicSlug, TopicSlugError};

/// Errors emitted by `BankService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankServiceError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("test bank {topic}: {source}")]
    Bank {
        topic: TopicSlug,
        #[source]
        source: BankError,
    },
    #[error(transparent)]
    InvalidTopic(#[from] TopicSlugError),
    #[error("no test bank for topic {0}")]
    NotFound(TopicSlug),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
