//! Typed progress snapshot: which options the user picked, per question index.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::quiz::{Question, QuizError, QuizResult};

/// One or more selected option strings. A bare string is accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SelectionRepr")]
pub struct Selection(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum SelectionRepr {
    One(String),
    Many(Vec<String>),
}

impl From<SelectionRepr> for Selection {
    fn from(value: SelectionRepr) -> Self {
        match value {
            SelectionRepr::One(s) => Self(vec![s]),
            SelectionRepr::Many(v) => Self(v),
        }
    }
}

impl Selection {
    pub fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(options.into_iter().map(Into::into).collect())
    }

    pub fn options(&self) -> &[String] {
        &self.0
    }
}

/// Question index -> selection. Serialized as a JSON object keyed by index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserAnswers(BTreeMap<u32, Selection>);

impl UserAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, index: u32, selection: Selection) -> Self {
        self.0.insert(index, selection);
        self
    }

    pub fn get(&self, index: u32) -> Option<&Selection> {
        self.0.get(&index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &Selection)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    /// Bounds every answer by `total_questions` and, when the question set is
    /// known, by the options of the question it answers.
    pub fn check(&self, total_questions: i32, questions: Option<&[Question]>) -> QuizResult<()> {
        for (index, selection) in self.iter() {
            if i64::from(index) >= i64::from(total_questions) {
                return Err(QuizError::validation(format!(
                    "answer for question {index} is out of range, quiz has {total_questions} questions"
                )));
            }

            if selection.options().is_empty() {
                return Err(QuizError::validation(format!(
                    "answer for question {index} selects nothing"
                )));
            }

            let Some(question) = questions.and_then(|qs| qs.get(index as usize)) else {
                continue;
            };

            if let Some(stray) = selection.options().iter().find(|o| !question.has_option(o)) {
                return Err(QuizError::validation(format!(
                    "answer `{stray}` for question {index} is not one of its options"
                )));
            }
        }

        Ok(())
    }
}
