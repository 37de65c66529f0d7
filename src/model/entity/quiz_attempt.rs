use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use uuid::Uuid;

use crate::{
    model::{DatabaseError, ResourceType, ResourceTyped},
    quiz::{Question, UserAnswers},
};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(format!("unknown difficulty `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AttemptStatus {
    Ongoing,
    Completed,
}

impl AttemptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttemptStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ongoing" => Ok(Self::Ongoing),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown attempt status `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct QuizAttempt {
    id: Uuid,
    user_id: Uuid,
    topic: String,
    difficulty: Difficulty,
    total_questions: i32,
    status: AttemptStatus,
    current_index: i32,
    questions: Option<Vec<Question>>,
    #[schema(value_type = Object)]
    user_answers: UserAnswers,
    score: i32,
    percentage: f64,
    correct_count: i32,
    incorrect_count: i32,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    time_taken: Option<i64>,
}

impl ResourceTyped for QuizAttempt {
    fn get_resource_type() -> ResourceType {
        ResourceType::QuizAttempt
    }
}

/// What the owner picks when a quiz starts.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct QuizAttemptCreate {
    pub topic: String,
    pub difficulty: Difficulty,
    pub total_questions: i32,
}

impl QuizAttempt {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn total_questions(&self) -> i32 {
        self.total_questions
    }

    pub fn status(&self) -> AttemptStatus {
        self.status
    }

    pub fn current_index(&self) -> i32 {
        self.current_index
    }

    pub fn questions(&self) -> Option<&[Question]> {
        self.questions.as_deref()
    }

    pub fn user_answers(&self) -> &UserAnswers {
        &self.user_answers
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    pub fn correct_count(&self) -> i32 {
        self.correct_count
    }

    pub fn incorrect_count(&self) -> i32 {
        self.incorrect_count
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn time_taken(&self) -> Option<i64> {
        self.time_taken
    }

    pub fn is_ongoing(&self) -> bool {
        self.status == AttemptStatus::Ongoing
    }
}

// Transitions. Callers validate input first; these only keep the row consistent.
impl QuizAttempt {
    pub(crate) fn ongoing(owner: Uuid, data: QuizAttemptCreate, questions: Vec<Question>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: owner,
            topic: data.topic,
            difficulty: data.difficulty,
            total_questions: data.total_questions,
            status: AttemptStatus::Ongoing,
            current_index: 0,
            questions: Some(questions),
            user_answers: UserAnswers::new(),
            score: 0,
            percentage: 0.0,
            correct_count: 0,
            incorrect_count: 0,
            started_at: Utc::now(),
            completed_at: None,
            time_taken: None,
        }
    }

    pub(crate) fn record_progress(
        &mut self,
        current_index: i32,
        questions: Option<Vec<Question>>,
        user_answers: UserAnswers,
        elapsed_seconds: i64,
    ) {
        self.current_index = current_index;
        if let Some(questions) = questions {
            self.questions = Some(questions);
        }
        self.user_answers = user_answers;
        self.time_taken = Some(elapsed_seconds);
    }

    /// Final transition. The snapshot is dropped to keep completed rows small.
    pub(crate) fn mark_completed(
        &mut self,
        correct_count: i32,
        percentage: f64,
        elapsed_seconds: i64,
    ) {
        self.status = AttemptStatus::Completed;
        self.score = correct_count;
        self.percentage = percentage;
        self.correct_count = correct_count;
        self.incorrect_count = self.total_questions - correct_count;
        self.completed_at = Some(Utc::now());
        self.time_taken = Some(elapsed_seconds);
        self.questions = None;
        self.user_answers = UserAnswers::new();
    }

    #[cfg(test)]
    pub(crate) fn backdated(
        mut self,
        started_at: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Self {
        self.started_at = started_at;
        if self.completed_at.is_some() {
            self.completed_at = completed_at;
        }
        self
    }
}

/// Raw `quiz_attempts` row; enums are stored as text.
#[derive(Debug, FromRow)]
pub(crate) struct QuizAttemptRow {
    id: Uuid,
    user_id: Uuid,
    topic: String,
    difficulty: String,
    total_questions: i32,
    status: String,
    current_index: i32,
    questions: Option<Json<Vec<Question>>>,
    user_answers: Json<UserAnswers>,
    score: i32,
    percentage: f64,
    correct_count: i32,
    incorrect_count: i32,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    time_taken: Option<i64>,
}

impl TryFrom<QuizAttemptRow> for QuizAttempt {
    type Error = DatabaseError;

    fn try_from(row: QuizAttemptRow) -> Result<Self, Self::Error> {
        let difficulty = row
            .difficulty
            .parse()
            .map_err(|_| DatabaseError::invalid_column("difficulty", &row.difficulty))?;
        let status = row
            .status
            .parse()
            .map_err(|_| DatabaseError::invalid_column("status", &row.status))?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            topic: row.topic,
            difficulty,
            total_questions: row.total_questions,
            status,
            current_index: row.current_index,
            questions: row.questions.map(|j| j.0),
            user_answers: row.user_answers.0,
            score: row.score,
            percentage: row.percentage,
            correct_count: row.correct_count,
            incorrect_count: row.incorrect_count,
            started_at: row.started_at,
            completed_at: row.completed_at,
            time_taken: row.time_taken,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample() -> QuizAttempt {
        let q = Question {
            question: "q".into(),
            options: vec!["A".into(), "B".into()],
            answers: vec!["A".into()],
            explanation: "x".into(),
        };
        QuizAttempt::ongoing(
            Uuid::new_v4(),
            QuizAttemptCreate {
                topic: "Rust".into(),
                difficulty: Difficulty::Hard,
                total_questions: 1,
            },
            vec![q],
        )
    }

    #[test]
    fn new_attempt_starts_ongoing_at_zero() {
        let a = sample();
        assert!(a.is_ongoing());
        assert_eq!(a.current_index(), 0);
        assert!(a.questions().is_some());
        assert!(a.completed_at().is_none());
    }

    #[test]
    fn completion_clears_snapshot_and_balances_counts() {
        let mut a = sample();
        a.record_progress(1, None, UserAnswers::new(), 12);
        a.mark_completed(1, 100.0, 15);

        assert_eq!(a.status(), AttemptStatus::Completed);
        assert!(a.questions().is_none());
        assert!(a.user_answers().is_empty());
        assert!(a.completed_at().is_some());
        assert_eq!(a.correct_count() + a.incorrect_count(), a.total_questions());
        assert_eq!(a.time_taken(), Some(15));
    }

    #[test]
    fn enums_round_trip_through_text() {
        for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(d.as_str().parse::<Difficulty>().unwrap(), d);
        }
        assert_eq!("completed".parse::<AttemptStatus>().unwrap(), AttemptStatus::Completed);
        assert!("abandoned".parse::<AttemptStatus>().is_err());
    }
}
