//! Structural contract for generated questions.
//!
//! Anything coming out of the question source is untrusted JSON. A question is
//! only accepted when all four fields are present, non-blank, and every
//! correct answer is one of the offered options, verbatim.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::quiz::{QuizError, QuizResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub answers: Vec<String>,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("question is not an object")]
    NotAnObject,
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{0}` has the wrong type")]
    WrongType(&'static str),
    #[error("question text is blank")]
    BlankQuestion,
    #[error("expected at least 2 options, got {0}")]
    TooFewOptions(usize),
    #[error("option #{0} is blank")]
    BlankOption(usize),
    #[error("option `{0}` is repeated")]
    DuplicateOption(String),
    #[error("answers are empty")]
    NoAnswers,
    #[error("answer `{0}` is not one of the options")]
    AnswerNotInOptions(String),
    #[error("explanation is blank")]
    BlankExplanation,
}

impl Question {
    /// Checks an already typed question, e.g. one carried in a progress snapshot.
    pub fn check(&self) -> Result<(), Rejection> {
        if self.question.trim().is_empty() {
            return Err(Rejection::BlankQuestion);
        }

        if self.options.len() < 2 {
            return Err(Rejection::TooFewOptions(self.options.len()));
        }

        let mut seen = HashSet::with_capacity(self.options.len());
        for (idx, option) in self.options.iter().enumerate() {
            if option.trim().is_empty() {
                return Err(Rejection::BlankOption(idx));
            }
            if !seen.insert(option.as_str()) {
                return Err(Rejection::DuplicateOption(option.clone()));
            }
        }

        if self.answers.is_empty() {
            return Err(Rejection::NoAnswers);
        }

        // repeated answers are fine as long as each one is an option
        if let Some(stray) = self.answers.iter().find(|a| !seen.contains(a.as_str())) {
            return Err(Rejection::AnswerNotInOptions(stray.clone()));
        }

        if self.explanation.trim().is_empty() {
            return Err(Rejection::BlankExplanation);
        }

        Ok(())
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

fn string_field(obj: &serde_json::Map<String, Value>, name: &'static str) -> Result<String, Rejection> {
    match obj.get(name) {
        None => Err(Rejection::MissingField(name)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(Rejection::WrongType(name)),
    }
}

fn string_list_field(
    obj: &serde_json::Map<String, Value>,
    name: &'static str,
) -> Result<Vec<String>, Rejection> {
    let items = match obj.get(name) {
        None => return Err(Rejection::MissingField(name)),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(Rejection::WrongType(name)),
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            _ => Err(Rejection::WrongType(name)),
        })
        .collect()
}

/// Validates one raw question object.
pub fn validate(raw: &Value) -> Result<Question, Rejection> {
    let obj = raw.as_object().ok_or(Rejection::NotAnObject)?;

    let question = Question {
        question: string_field(obj, "question")?,
        options: string_list_field(obj, "options")?,
        answers: string_list_field(obj, "answers")?,
        explanation: string_field(obj, "explanation")?,
    };

    question.check()?;
    Ok(question)
}

/// Keeps the accepted questions in their original order and cuts the list at
/// `requested`. Never pads. An empty result is a generation failure.
pub fn filter_and_truncate(raw: &[Value], requested: usize) -> QuizResult<Vec<Question>> {
    let accepted: Vec<Question> = raw
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| match validate(item) {
            Ok(q) => Some(q),
            Err(reason) => {
                tracing::debug!("dropping generated question #{idx}: {reason}");
                None
            }
        })
        .take(requested)
        .collect();

    if accepted.is_empty() {
        tracing::warn!(
            "question source returned {} items, none of them usable",
            raw.len()
        );
        return Err(QuizError::GenerationFailure);
    }

    Ok(accepted)
}
