use services::TopicOverview;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicCardVm {
    pub topic: String,
    pub title: String,
    pub questions_label: String,
    pub score_label: String,
    pub complete: bool,
}

#[must_use]
pub fn map_topic_card(row: &TopicOverview) -> TopicCardVm {
    let questions_label = match row.questions {
        1 => "1 question".to_string(),
        n => format!("{n} questions"),
    };
    let (score_label, complete) = match row.last_summary {
        Some(summary) if summary.is_complete() => {
            (format!("Last score: {} / {}", summary.correct, summary.total), true)
        }
        Some(summary) => (
            format!("In progress: {} / {} answered", summary.answered, summary.total),
            false,
        ),
        None => ("Not started".to_string(), false),
    };

    TopicCardVm {
        topic: row.topic.to_string(),
        title: row.title.clone(),
        questions_label,
        score_label,
        complete,
    }
}
