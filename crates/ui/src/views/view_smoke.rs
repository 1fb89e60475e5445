use std::sync::Arc;

use storage::repository::{InMemoryStore, KeyValueStore};
use testbank_core::model::{PersistedSummary, TopicSlug};

use super::test_harness::{BankDir, ViewKind, setup_view_harness, setup_view_harness_with_store};
use crate::context::{AppContext, UiApp};

const SYMMETRY: &str = r#"{
    "title": "Molecular Symmetry",
    "questions": [
        {"question": "Which molecule has a center of inversion?", "options": ["CH4", "SF6", "NH3"], "answer": "SF6", "explanation": "**SF6** is octahedral."},
        {"question": "Point group of water?", "options": ["C2v", "D3h"], "answer": "C2v", "explanation": "Two mirror planes."}
    ]
}"#;

const ORBITALS: &str = r#"[
    {"question": "How many nodes does a 2p orbital have?", "options": ["0", "1", "2"], "answer": "B", "explanation": "One planar node."}
]"#;

#[tokio::test(flavor = "current_thread")]
async fn hub_view_smoke_lists_topics_with_last_score() {
    let banks = BankDir::new("hub");
    banks.write("symmetry", SYMMETRY);
    banks.write("orbitals", ORBITALS);

    let store = InMemoryStore::new();
    let topic = TopicSlug::new("symmetry").unwrap();
    let summary = PersistedSummary {
        answered: 2,
        correct: 1,
        total: 2,
    };
    store
        .set_item(&PersistedSummary::storage_key(&topic), &summary.to_json().unwrap())
        .await
        .expect("seed summary");

    let mut harness = setup_view_harness_with_store(ViewKind::Hub, banks, store).await;
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Molecular Symmetry"), "missing title in {html}");
    assert!(html.contains("Orbitals"), "missing default title in {html}");
    assert!(html.contains("Last score: 1 / 2"), "missing score in {html}");
    assert!(html.contains("Not started"), "missing status in {html}");
    assert!(html.contains("/quiz/symmetry"), "missing link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn hub_view_smoke_renders_empty_state() {
    let mut harness = setup_view_harness(ViewKind::Hub, BankDir::new("hub-empty")).await;
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("No test banks found."), "missing empty state in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_fresh_page() {
    let banks = BankDir::new("quiz");
    banks.write("symmetry", SYMMETRY);

    let mut harness = setup_view_harness(ViewKind::Quiz("symmetry".into()), banks).await;
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Molecular Symmetry"), "missing title in {html}");
    assert!(html.contains("0 / 0"), "missing score pill in {html}");
    assert!(
        html.contains("Which molecule has a center of inversion?"),
        "missing prompt in {html}"
    );
    assert!(html.contains("Show answer"), "missing reveal control in {html}");
    assert!(html.contains("<strong>SF6</strong>"), "missing explanation in {html}");
    assert!(!html.contains("scoreSummary"), "summary shown early in {html}");
    assert!(!html.contains("q-answer visible"), "explanation visible in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_reports_missing_topic() {
    let banks = BankDir::new("quiz-missing");
    banks.write("symmetry", SYMMETRY);

    let mut harness = setup_view_harness(ViewKind::Quiz("kinetics".into()), banks).await;
    harness.settle().await;
    let html = harness.render();

    assert!(
        html.contains("No test bank exists for this topic."),
        "missing error in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_reports_broken_bank() {
    let banks = BankDir::new("quiz-broken");
    banks.write("symmetry", "{ not json");

    let mut harness = setup_view_harness(ViewKind::Quiz("symmetry".into()), banks).await;
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("could not be read"), "missing error in {html}");
}

struct LaunchApp;

impl UiApp for LaunchApp {
    fn open_topic_on_launch(&self) -> Option<TopicSlug> {
        TopicSlug::new("orbitals").ok()
    }

    fn banks(&self) -> Arc<services::BankService> {
        Arc::new(services::BankService::new("banks"))
    }

    fn progress(&self) -> Arc<services::ProgressService> {
        Arc::new(services::ProgressService::new(Arc::new(InMemoryStore::new())))
    }
}

#[test]
fn launch_topic_is_handed_out_once() {
    let app: Arc<dyn UiApp> = Arc::new(LaunchApp);
    let ctx = AppContext::new(&app);
    let other = ctx.clone();

    assert_eq!(ctx.open_topic_configured().map(TopicSlug::as_str), Some("orbitals"));
    assert_eq!(
        other.take_open_topic_on_launch().map(|t| t.to_string()),
        Some("orbitals".to_owned())
    );
    assert_eq!(ctx.take_open_topic_on_launch(), None);
}
