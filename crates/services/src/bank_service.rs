use std::path::{Path, PathBuf};

use serde::Serialize;
use testbank_core::TestBank;
use testbank_core::model::{PersistedSummary, TopicSlug};

use crate::error::BankServiceError;
use crate::progress_service::ProgressService;

const BANK_EXTENSION: &str = "json";

/// One row of the topic hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicOverview {
    pub topic: TopicSlug,
    pub title: String,
    pub questions: u32,
    pub last_summary: Option<PersistedSummary>,
}

/// Test banks stored as `<topic>.json` files in one directory.
#[derive(Debug, Clone)]
pub struct BankService {
    dir: PathBuf,
}

impl BankService {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Topics with a bank file, sorted by slug. Files whose stem is not a valid
    /// slug are skipped.
    ///
    /// # Errors
    ///
    /// Returns `BankServiceError::Io` if the directory cannot be read.
    pub fn list_topics(&self) -> Result<Vec<TopicSlug>, BankServiceError> {
        let io_err = |source| BankServiceError::Io {
            path: self.dir.clone(),
            source,
        };

        let mut topics = Vec::new();
        for entry in std::fs::read_dir(&self.dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(BANK_EXTENSION)
            {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            match TopicSlug::new(stem) {
                Ok(topic) => topics.push(topic),
                Err(err) => log::warn!("skipping {}: {err}", path.display()),
            }
        }

        topics.sort();
        Ok(topics)
    }

    /// Load and validate the bank for `topic`.
    ///
    /// # Errors
    ///
    /// Returns `BankServiceError::NotFound` if there is no file for the topic,
    /// `BankServiceError::Io` if it cannot be read and `BankServiceError::Bank`
    /// if its contents are invalid.
    pub fn load(&self, topic: &TopicSlug) -> Result<TestBank, BankServiceError> {
        let path = self.path_for(topic);
        if !path.is_file() {
            return Err(BankServiceError::NotFound(topic.clone()));
        }

        let raw = std::fs::read_to_string(&path).map_err(|source| BankServiceError::Io {
            path: path.clone(),
            source,
        })?;

        let bank =
            TestBank::from_json(topic.clone(), &raw).map_err(|source| BankServiceError::Bank {
                topic: topic.clone(),
                source,
            })?;
        log::info!("loaded {} questions for {topic}", bank.len());
        Ok(bank)
    }

    /// Hub rows for every loadable topic, with the last saved summary.
    ///
    /// # Errors
    ///
    /// Returns `BankServiceError::Io` if the directory cannot be listed.
    /// Individual banks that fail to load are skipped.
    pub async fn overview(
        &self,
        progress: &ProgressService,
    ) -> Result<Vec<TopicOverview>, BankServiceError> {
        let mut rows = Vec::new();
        for topic in self.list_topics()? {
            let bank = match self.load(&topic) {
                Ok(bank) => bank,
                Err(err) => {
                    log::warn!("skipping {topic}: {err}");
                    continue;
                }
            };
            let last_summary = progress.last_summary(&topic).await;
            rows.push(TopicOverview {
                title: bank.title().to_owned(),
                questions: u32::try_from(bank.len()).unwrap_or(u32::MAX),
                topic,
                last_summary,
            });
        }
        Ok(rows)
    }

    fn path_for(&self, topic: &TopicSlug) -> PathBuf {
        self.dir.join(format!("{topic}.{BANK_EXTENSION}"))
    }
}
