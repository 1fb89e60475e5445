use std::path::PathBuf;
use std::sync::Arc;

use storage::repository::Storage;

use crate::bank_service::BankService;
use crate::error::AppServicesError;
use crate::progress_service::ProgressService;

/// Assembles app-facing services.
#[derive(Clone)]
pub struct AppServices {
    banks: Arc<BankService>,
    progress: Arc<ProgressService>,
}

impl AppServices {
    #[must_use]
    pub fn new(storage: &Storage, bank_dir: impl Into<PathBuf>) -> Self {
        Self {
            banks: Arc::new(BankService::new(bank_dir)),
            progress: Arc::new(ProgressService::new(Arc::clone(&storage.kv))),
        }
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        bank_dir: impl Into<PathBuf>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(&storage, bank_dir))
    }

    #[must_use]
    pub fn in_memory(bank_dir: impl Into<PathBuf>) -> Self {
        Self::new(&Storage::in_memory(), bank_dir)
    }

    #[must_use]
    pub fn banks(&self) -> Arc<BankService> {
        Arc::clone(&self.banks)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }
}
