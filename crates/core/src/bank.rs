//! Test bank documents: the JSON question files a topic page is built from.
//!
//! Accepted shapes:
//! - one question object: `{"question", "options", "answer", "explanation"}`
//! - an array of question objects
//! - `{"title": "...", "questions": [...]}`
//!
//! Options are either bare strings (tokens `A`, `B`, ... by position) or
//! `{"token", "text"}` objects. Extra fields are ignored.

use serde::Deserialize;
use thiserror::Error;

use crate::model::{BlockId, OptionToken, QuestionBlock, QuestionError, QuizOption, TopicSlug};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankError {
    #[error("invalid test bank json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("test bank has no questions")]
    Empty,

    #[error("question {index}: {source}")]
    Question {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BankDocument {
    Wrapped {
        #[serde(default)]
        title: Option<String>,
        questions: Vec<QuestionDocument>,
    },
    Many(Vec<QuestionDocument>),
    Single(QuestionDocument),
}

#[derive(Debug, Deserialize)]
struct QuestionDocument {
    question: String,
    options: Vec<OptionDocument>,
    answer: String,
    #[serde(default)]
    explanation: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OptionDocument {
    Text(String),
    Tagged { token: String, text: String },
}

/// All question blocks for one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestBank {
    topic: TopicSlug,
    title: String,
    blocks: Vec<QuestionBlock>,
}

impl TestBank {
    /// Build a bank from already validated blocks.
    #[must_use]
    pub fn new(topic: TopicSlug, title: impl Into<String>, blocks: Vec<QuestionBlock>) -> Self {
        Self {
            topic,
            title: title.into(),
            blocks,
        }
    }

    /// Parse a test bank document.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Parse` for malformed JSON, `BankError::Empty` when no
    /// questions are present, and `BankError::Question` for the first invalid question.
    pub fn from_json(topic: TopicSlug, raw: &str) -> Result<Self, BankError> {
        let (title, questions) = match serde_json::from_str::<BankDocument>(raw)? {
            BankDocument::Wrapped { title, questions } => (title, questions),
            BankDocument::Many(questions) => (None, questions),
            BankDocument::Single(question) => (None, vec![question]),
        };

        if questions.is_empty() {
            return Err(BankError::Empty);
        }

        let blocks = questions
            .into_iter()
            .enumerate()
            .map(|(index, doc)| {
                let id = BlockId::new(u64::try_from(index).unwrap_or(u64::MAX).saturating_add(1));
                build_block(id, doc).map_err(|source| BankError::Question {
                    index: index + 1,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| default_title(&topic));

        Ok(Self::new(topic, title, blocks))
    }

    #[must_use]
    pub fn topic(&self) -> &TopicSlug {
        &self.topic
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn blocks(&self) -> &[QuestionBlock] {
        &self.blocks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    #[must_use]
    pub fn into_parts(self) -> (TopicSlug, String, Vec<QuestionBlock>) {
        (self.topic, self.title, self.blocks)
    }
}

fn build_block(id: BlockId, doc: QuestionDocument) -> Result<QuestionBlock, QuestionError> {
    let options: Vec<QuizOption> = doc
        .options
        .into_iter()
        .enumerate()
        .map(|(idx, opt)| match opt {
            OptionDocument::Text(text) => QuizOption::new(OptionToken::from_index(idx), text),
            OptionDocument::Tagged { token, text } => QuizOption::new(OptionToken::new(token), text),
        })
        .collect();

    let correct = resolve_answer(&options, doc.answer.trim())?;
    QuestionBlock::new(id, doc.question, options, correct, doc.explanation)
}

/// Match the answer against option tokens first, then option text.
fn resolve_answer(options: &[QuizOption], answer: &str) -> Result<OptionToken, QuestionError> {
    if options.is_empty() {
        return Err(QuestionError::NoOptions);
    }

    let found = options
        .iter()
        .find(|opt| opt.token().as_str() == answer)
        .or_else(|| {
            options
                .iter()
                .find(|opt| opt.token().as_str().eq_ignore_ascii_case(answer))
        })
        .or_else(|| options.iter().find(|opt| opt.text().trim() == answer));

    found
        .map(|opt| opt.token().clone())
        .ok_or_else(|| QuestionError::UnknownAnswer(answer.to_owned()))
}

fn default_title(topic: &TopicSlug) -> String {
    topic
        .as_str()
        .split(['-', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
