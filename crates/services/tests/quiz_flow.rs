use std::sync::Arc;

use services::{AnswerResult, ProgressService, QuizController};
use storage::repository::{InMemoryStore, KeyValueStore, StorageError};
use testbank_core::TestBank;
use testbank_core::model::{BlockId, BlockState, PersistedSummary, TopicSlug};

fn bank(questions: usize) -> TestBank {
    let docs: Vec<String> = (1..=questions)
        .map(|i| {
            format!(
                r#"{{"question": "Q{i}", "options": ["right", "wrong 1", "wrong 2", "wrong 3"], "answer": "A", "explanation": "E{i}"}}"#
            )
        })
        .collect();
    let raw = format!("[{}]", docs.join(","));
    TestBank::from_json(TopicSlug::new("coordination").unwrap(), &raw).unwrap()
}

fn controller(questions: usize) -> (QuizController, InMemoryStore) {
    let store = InMemoryStore::new();
    let progress = Arc::new(ProgressService::new(Arc::new(store.clone())));
    (QuizController::initialize(bank(questions), progress), store)
}

async fn stored(store: &InMemoryStore) -> Option<PersistedSummary> {
    store
        .get_item("testbank_coordination")
        .await
        .unwrap()
        .map(|raw| PersistedSummary::from_json(&raw).unwrap())
}

#[tokio::test]
async fn three_correct_answers_show_summary() {
    let (mut quiz, store) = controller(3);
    for id in 1..=3 {
        let result = quiz.select_option(BlockId::new(id), &"A".into()).await;
        assert!(matches!(result, AnswerResult::Scored { correct: true, .. }));
    }

    let display = quiz.score_display();
    assert_eq!(display.pill.to_string(), "3 / 3");
    assert!(display.summary_visible());
    assert_eq!(display.final_score.unwrap().to_string(), "3 / 3");
    assert_eq!(
        stored(&store).await,
        Some(PersistedSummary {
            answered: 3,
            correct: 3,
            total: 3,
        })
    );
}

#[tokio::test]
async fn wrong_then_right_reads_one_of_two() {
    let (mut quiz, _store) = controller(2);
    let first = quiz.select_option(BlockId::new(1), &"C".into()).await;
    assert!(matches!(first, AnswerResult::Scored { correct: false, .. }));
    let second = quiz.select_option(BlockId::new(2), &"A".into()).await;

    let AnswerResult::Scored { display, .. } = second else {
        panic!("second answer ignored");
    };
    assert_eq!(display.pill.to_string(), "1 / 2");

    let block = quiz.session().block(BlockId::new(1)).unwrap();
    assert!(block.option(&"C".into()).unwrap().marks().wrong);
    assert!(block.option(&"A".into()).unwrap().marks().correct);
}

#[tokio::test]
async fn second_click_changes_nothing() {
    let (mut quiz, store) = controller(2);
    quiz.select_option(BlockId::new(1), &"B".into()).await;
    let session_after_first = quiz.session().clone();
    let stored_after_first = stored(&store).await;

    let result = quiz.select_option(BlockId::new(1), &"A".into()).await;
    assert_eq!(result, AnswerResult::Ignored);
    assert_eq!(quiz.session(), &session_after_first);
    assert_eq!(stored(&store).await, stored_after_first);
}

#[tokio::test]
async fn reveal_leaves_score_and_options_alone() {
    let (mut quiz, store) = controller(2);
    assert!(quiz.reveal_answer(BlockId::new(1)));

    let block = quiz.session().block(BlockId::new(1)).unwrap();
    assert!(block.explanation_visible());
    assert!(!block.reveal_control_visible());
    assert!(block.options().iter().all(|o| !o.marks().disabled));
    assert_eq!(quiz.session().score().total_answered(), 0);
    assert_eq!(quiz.session().score().total_correct(), 0);
    assert_eq!(stored(&store).await, None);

    assert!(!quiz.reveal_answer(BlockId::new(42)));
}

#[tokio::test]
async fn reset_clears_state_and_saved_record() {
    let (mut quiz, store) = controller(3);
    quiz.select_option(BlockId::new(1), &"A".into()).await;
    quiz.select_option(BlockId::new(2), &"D".into()).await;
    assert!(stored(&store).await.is_some());

    let display = quiz.reset_all().await;
    assert_eq!(display.pill.to_string(), "0 / 0");
    assert!(!display.summary_visible());
    for block in quiz.session().blocks() {
        assert_eq!(block.state(), BlockState::Unanswered);
        assert!(block.options().iter().all(|o| o.marks().is_clear()));
        assert!(!block.explanation_visible());
        assert!(block.reveal_control_visible());
    }
    assert_eq!(quiz.session().score().total_answered(), 0);
    assert_eq!(quiz.session().score().total_correct(), 0);
    assert_eq!(stored(&store).await, None);
}

#[tokio::test]
async fn persisted_record_matches_counters_then_clears() {
    let (mut quiz, store) = controller(4);
    quiz.select_option(BlockId::new(2), &"A".into()).await;
    quiz.select_option(BlockId::new(4), &"B".into()).await;
    quiz.persist_summary().await;

    let raw = store
        .get_item("testbank_coordination")
        .await
        .unwrap()
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        serde_json::json!({ "answered": 2, "correct": 1, "total": 4 })
    );

    quiz.clear_summary().await;
    assert!(
        store
            .items_with_prefix("testbank_")
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn initialize_does_not_restore_saved_summary() {
    let store = InMemoryStore::new();
    store
        .set_item(
            "testbank_coordination",
            r#"{"answered":3,"correct":2,"total":3}"#,
        )
        .await
        .unwrap();
    let progress = Arc::new(ProgressService::new(Arc::new(store.clone())));

    let quiz = QuizController::initialize(bank(3), progress);
    assert_eq!(quiz.session().score().total_answered(), 0);
    assert!(
        quiz.session()
            .blocks()
            .iter()
            .all(|b| b.state() == BlockState::Unanswered)
    );
    // The record is left as it was until the next answer.
    assert!(stored(&store).await.is_some());
}

struct UnavailableStore;

#[async_trait::async_trait]
impl KeyValueStore for UnavailableStore {
    async fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("storage disabled".to_string()))
    }

    async fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Connection("storage disabled".to_string()))
    }

    async fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("storage disabled".to_string()))
    }

    async fn items_with_prefix(
        &self,
        _prefix: &str,
    ) -> Result<Vec<(String, String)>, StorageError> {
        Err(StorageError::Connection("storage disabled".to_string()))
    }
}

#[tokio::test]
async fn scoring_works_without_storage() {
    let progress = Arc::new(ProgressService::new(Arc::new(UnavailableStore)));
    let mut quiz = QuizController::initialize(bank(2), progress);

    let result = quiz.select_option(BlockId::new(1), &"A".into()).await;
    assert!(matches!(result, AnswerResult::Scored { correct: true, .. }));
    quiz.select_option(BlockId::new(2), &"A".into()).await;
    assert_eq!(quiz.score_display().pill.to_string(), "2 / 2");

    let display = quiz.reset_all().await;
    assert_eq!(display.pill.to_string(), "0 / 0");
}

#[tokio::test]
async fn apply_selection_returns_pending_write() {
    let (mut quiz, store) = controller(2);
    let (result, request) = quiz.apply_selection(BlockId::new(1), &"A".into());
    assert!(matches!(result, AnswerResult::Scored { .. }));
    let request = request.expect("write requested");
    assert_eq!(
        request.summary(),
        Some(PersistedSummary {
            answered: 1,
            correct: 1,
            total: 2,
        })
    );
    assert_eq!(stored(&store).await, None);

    request.run().await;
    assert!(stored(&store).await.is_some());

    let (again, none) = quiz.apply_selection(BlockId::new(1), &"B".into());
    assert_eq!(again, AnswerResult::Ignored);
    assert!(none.is_none());
}
