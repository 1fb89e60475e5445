mod hub_vm;
mod markdown_vm;
mod quiz_vm;

pub use hub_vm::{TopicCardVm, map_topic_card};
pub use markdown_vm::{markdown_to_html, sanitize_html};
pub use quiz_vm::{
    QuestionBlockVm, QuizOptionVm, QuizPageVm, map_question_block, map_quiz_page, option_class,
};
