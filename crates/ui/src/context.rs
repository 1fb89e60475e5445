use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use services::{BankService, ProgressService};
use testbank_core::model::TopicSlug;

pub trait UiApp: Send + Sync {
    /// Topic to open straight away instead of the hub, if any.
    fn open_topic_on_launch(&self) -> Option<TopicSlug>;

    fn banks(&self) -> Arc<BankService>;
    fn progress(&self) -> Arc<ProgressService>;
}

#[derive(Clone)]
pub struct AppContext {
    open_topic_configured: Option<TopicSlug>,
    open_topic_once: Arc<AtomicBool>,

    banks: Arc<BankService>,
    progress: Arc<ProgressService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        let open_topic_configured = app.open_topic_on_launch();

        Self {
            open_topic_once: Arc::new(AtomicBool::new(open_topic_configured.is_some())),
            open_topic_configured,
            banks: app.banks(),
            progress: app.progress(),
        }
    }

    /// The launch topic, handed out once.
    #[must_use]
    pub fn take_open_topic_on_launch(&self) -> Option<TopicSlug> {
        if self.open_topic_once.swap(false, Ordering::AcqRel) {
            self.open_topic_configured.clone()
        } else {
            None
        }
    }

    #[must_use]
    pub fn open_topic_configured(&self) -> Option<&TopicSlug> {
        self.open_topic_configured.as_ref()
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

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
