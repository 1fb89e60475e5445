use testbank_core::QuizSession;
use testbank_core::model::{OptionMarks, QuestionBlock, QuizOption, ScoreDisplay};

use super::markdown_vm::markdown_to_html;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizOptionVm {
    pub token: String,
    pub text: String,
    pub class: String,
    pub disabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionBlockVm {
    pub id: u64,
    pub number: usize,
    pub prompt: String,
    pub class: &'static str,
    pub options: Vec<QuizOptionVm>,
    pub explanation_html: String,
    pub explanation_visible: bool,
    pub reveal_visible: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizPageVm {
    pub title: String,
    pub pill: String,
    pub final_score: Option<String>,
    pub blocks: Vec<QuestionBlockVm>,
}

/// CSS classes for an option, mirroring its marks.
#[must_use]
pub fn option_class(marks: OptionMarks) -> String {
    let mut class = String::from("q-option");
    for (on, name) in [
        (marks.correct, " correct"),
        (marks.wrong, " wrong"),
        (marks.selected, " selected"),
        (marks.disabled, " disabled"),
    ] {
        if on {
            class.push_str(name);
        }
    }
    class
}

fn map_option(option: &QuizOption) -> QuizOptionVm {
    QuizOptionVm {
        token: option.token().to_string(),
        text: option.text().to_owned(),
        class: option_class(option.marks()),
        disabled: option.marks().disabled,
    }
}

#[must_use]
pub fn map_question_block(number: usize, block: &QuestionBlock) -> QuestionBlockVm {
    QuestionBlockVm {
        id: block.id().value(),
        number,
        prompt: block.prompt().to_owned(),
        class: if block.is_answered() {
            "q-block answered"
        } else {
            "q-block"
        },
        options: block.options().iter().map(map_option).collect(),
        explanation_html: markdown_to_html(block.explanation()),
        explanation_visible: block.explanation_visible(),
        reveal_visible: block.reveal_control_visible(),
    }
}

#[must_use]
pub fn map_quiz_page(session: &QuizSession, display: ScoreDisplay) -> QuizPageVm {
    QuizPageVm {
        title: session.title().to_owned(),
        pill: display.pill.to_string(),
        final_score: display.final_score.map(|line| line.to_string()),
        blocks: session
            .blocks()
            .iter()
            .enumerate()
            .map(|(idx, block)| map_question_block(idx + 1, block))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testbank_core::TestBank;
    use testbank_core::model::{BlockId, TopicSlug};

    fn session() -> QuizSession {
        let raw = r#"[
            {"question": "Which has a center of inversion?", "options": ["CH4", "SF6", "NH3"], "answer": "SF6", "explanation": "**SF6** is octahedral."},
            {"question": "Point group of water?", "options": ["C2v", "D3h"], "answer": "A", "explanation": ""}
        ]"#;
        QuizSession::new(TestBank::from_json(TopicSlug::new("symmetry").unwrap(), raw).unwrap())
    }

    #[test]
    fn fresh_page_has_plain_options() {
        let session = session();
        let vm = map_quiz_page(&session, session.score_display());

        assert_eq!(vm.title, "Symmetry");
        assert_eq!(vm.pill, "0 / 0");
        assert_eq!(vm.final_score, None);
        assert_eq!(vm.blocks.len(), 2);
        assert_eq!(vm.blocks[0].number, 1);
        assert_eq!(vm.blocks[0].class, "q-block");
        assert!(vm.blocks[0].reveal_visible);
        assert!(!vm.blocks[0].explanation_visible);
        assert!(vm.blocks[0].explanation_html.contains("<strong>SF6</strong>"));
        assert!(
            vm.blocks[0]
                .options
                .iter()
                .all(|opt| opt.class == "q-option" && !opt.disabled)
        );
    }

    #[test]
    fn wrong_answer_maps_to_classes() {
        let mut session = session();
        session.select_option(BlockId::new(1), &"A".into()).unwrap();
        let vm = map_quiz_page(&session, session.score_display());

        let block = &vm.blocks[0];
        assert_eq!(block.class, "q-block answered");
        assert_eq!(block.options[0].class, "q-option wrong selected disabled");
        assert_eq!(block.options[1].class, "q-option correct disabled");
        assert_eq!(block.options[2].class, "q-option disabled");
        assert!(block.options.iter().all(|opt| opt.disabled));
        assert!(block.explanation_visible);
        assert!(!block.reveal_visible);
        assert_eq!(vm.pill, "0 / 1");
    }

    #[test]
    fn completed_page_shows_final_score() {
        let mut session = session();
        session.select_option(BlockId::new(1), &"B".into()).unwrap();
        session.select_option(BlockId::new(2), &"A".into()).unwrap();
        let vm = map_quiz_page(&session, session.score_display());

        assert_eq!(vm.pill, "2 / 2");
        assert_eq!(vm.final_score.as_deref(), Some("2 / 2"));
        assert_eq!(
            vm.blocks[1].options[0].class,
            "q-option correct selected disabled"
        );
    }
}
