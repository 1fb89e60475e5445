use std::sync::Arc;

use storage::repository::KeyValueStore;
use testbank_core::model::{PersistedSummary, TopicSlug};

/// Best-effort persistence of per-topic quiz summaries.
///
/// Write failures are logged and swallowed: scoring keeps working when the
/// store is unavailable or full.
#[derive(Clone)]
pub struct ProgressService {
    store: Arc<dyn KeyValueStore>,
}

impl ProgressService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Write `summary` under the topic's key.
    pub async fn persist_summary(&self, topic: &TopicSlug, summary: PersistedSummary) {
        let key = PersistedSummary::storage_key(topic);
        let raw = match summary.to_json() {
            Ok(raw) => raw,
            Err(err) => {
                log::warn!("could not encode summary for {key}: {err}");
                return;
            }
        };

        match self.store.set_item(&key, &raw).await {
            Ok(()) => log::debug!("saved {key}: {raw}"),
            Err(err) => log::warn!("could not save {key}: {err}"),
        }
    }

    /// Remove the topic's saved summary.
    pub async fn clear_summary(&self, topic: &TopicSlug) {
        let key = PersistedSummary::storage_key(topic);
        match self.store.remove_item(&key).await {
            Ok(()) => log::debug!("cleared {key}"),
            Err(err) => log::warn!("could not clear {key}: {err}"),
        }
    }

    /// Hook run when a quiz page opens.
    ///
    /// Answering is a one-pass experience per visit, so the saved summary is
    /// not used to rebuild the page.
    pub fn restore_progress(&self, topic: &TopicSlug) {
        log::debug!("starting {topic} fresh; saved summaries are not restored");
    }

    /// Last saved summary for the topic hub. Unreadable records count as absent.
    pub async fn last_summary(&self, topic: &TopicSlug) -> Option<PersistedSummary> {
        let key = PersistedSummary::storage_key(topic);
        let raw = match self.store.get_item(&key).await {
            Ok(raw) => raw?,
            Err(err) => {
                log::warn!("could not read {key}: {err}");
                return None;
            }
        };

        match PersistedSummary::from_json(&raw) {
            Ok(summary) => Some(summary),
            Err(err) => {
                log::warn!("ignoring malformed record {key}: {err}");
                None
            }
        }
    }
}
