use std::path::PathBuf;
use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{BankService, ProgressService};
use storage::repository::{InMemoryStore, KeyValueStore};
use testbank_core::model::TopicSlug;

use crate::context::{UiApp, build_app_context};
use crate::views::{HubView, QuizView};

#[derive(Clone)]
struct TestApp {
    banks: Arc<BankService>,
    progress: Arc<ProgressService>,
}

impl UiApp for TestApp {
    fn open_topic_on_launch(&self) -> Option<TopicSlug> {
        None
    }

    fn banks(&self) -> Arc<BankService> {
        Arc::clone(&self.banks)
    }

    fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Hub,
    Quiz(String),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Hub => rsx! { HubView {} },
        ViewKind::Quiz(topic) => rsx! { QuizView { topic } },
    }
}

/// Bank directory that removes itself when dropped.
pub struct BankDir(PathBuf);

impl BankDir {
    pub fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("testbank-ui-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).expect("create bank dir");
        Self(dir)
    }

    pub fn write(&self, topic: &str, contents: &str) {
        std::fs::write(self.0.join(format!("{topic}.json")), contents).expect("write bank");
    }
}

impl Drop for BankDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub store: InMemoryStore,
    pub banks: BankDir,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild and let pending resources resolve.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub async fn setup_view_harness(view: ViewKind, banks: BankDir) -> ViewHarness {
    setup_view_harness_with_store(view, banks, InMemoryStore::new()).await
}

pub async fn setup_view_harness_with_store(
    view: ViewKind,
    banks: BankDir,
    store: InMemoryStore,
) -> ViewHarness {
    let kv: Arc<dyn KeyValueStore> = Arc::new(store.clone());
    let app = Arc::new(TestApp {
        banks: Arc::new(BankService::new(banks.0.clone())),
        progress: Arc::new(ProgressService::new(kv)),
    });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness { dom, store, banks }
}
