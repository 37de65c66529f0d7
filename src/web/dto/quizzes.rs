use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    model::entity::{AttemptStatus, Difficulty, QuizAttempt, QuizAttemptCreate},
    quiz::{
        Question, QuizError, QuizResult, UserAnswers,
        attempts::{Completion, CompletionTarget, Progress, ProgressTarget},
    },
};

const DEFAULT_TOPIC: &str = "Custom Quiz";

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct StartQuizRequest {
    pub topic: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub total_questions: i32,
    pub questions: Vec<Question>,
}

impl StartQuizRequest {
    pub fn into_parts(self) -> (QuizAttemptCreate, Vec<Question>) {
        let data = QuizAttemptCreate {
            topic: self.topic,
            difficulty: self.difficulty,
            total_questions: self.total_questions,
        };
        (data, self.questions)
    }
}

/// Without `quiz_id` the save starts a new attempt; `topic`, `difficulty`
/// and `total_questions` only matter in that case.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SaveProgressRequest {
    pub quiz_id: Option<Uuid>,
    pub topic: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub total_questions: Option<i32>,
    #[serde(default)]
    pub current_question_index: i32,
    pub questions_data: Option<Vec<Question>>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub user_answers: UserAnswers,
    #[serde(default)]
    pub time_taken: i64,
}

impl SaveProgressRequest {
    pub fn into_parts(self) -> QuizResult<(ProgressTarget, Progress)> {
        let target = match self.quiz_id {
            Some(id) => ProgressTarget::Existing(id),
            None => {
                let total_questions = self
                    .total_questions
                    .or_else(|| self.questions_data.as_ref().map(|q| q.len() as i32))
                    .ok_or_else(|| QuizError::validation("total_questions is required"))?;

                ProgressTarget::New(QuizAttemptCreate {
                    topic: self.topic.unwrap_or_else(|| DEFAULT_TOPIC.to_string()),
                    difficulty: self.difficulty.unwrap_or_default(),
                    total_questions,
                })
            }
        };

        let progress = Progress {
            current_index: self.current_question_index,
            questions: self.questions_data,
            user_answers: self.user_answers,
            elapsed_seconds: self.time_taken,
        };
        Ok((target, progress))
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CompleteQuizRequest {
    pub quiz_id: Option<Uuid>,
    pub topic: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub total_questions: i32,
    /// Omit to grade the stored answers of an ongoing attempt.
    pub correct_answers: Option<i32>,
    #[serde(default)]
    pub time_taken: i64,
}

impl CompleteQuizRequest {
    pub fn into_parts(self) -> (CompletionTarget, Completion) {
        let target = match self.quiz_id {
            Some(id) => CompletionTarget::Existing(id),
            None => CompletionTarget::New {
                topic: self.topic.unwrap_or_else(|| DEFAULT_TOPIC.to_string()),
                difficulty: self.difficulty.unwrap_or_default(),
            },
        };

        let completion = Completion {
            correct_count: self.correct_answers,
            total_questions: self.total_questions,
            elapsed_seconds: self.time_taken,
        };
        (target, completion)
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SavedResponse {
    pub message: String,
    pub quiz_id: Uuid,
    pub status: AttemptStatus,
}

impl SavedResponse {
    pub fn new(message: &str, attempt: &QuizAttempt) -> Self {
        Self {
            message: message.to_string(),
            quiz_id: attempt.id(),
            status: attempt.status(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ResumeResponse {
    pub quiz_id: Uuid,
    pub topic: String,
    pub difficulty: Difficulty,
    pub total_questions: i32,
    pub current_question_index: i32,
    pub questions_data: Vec<Question>,
    #[schema(value_type = Object)]
    pub user_answers: UserAnswers,
    pub time_taken: i64,
    pub started_at: DateTime<Utc>,
}

impl From<QuizAttempt> for ResumeResponse {
    fn from(a: QuizAttempt) -> Self {
        Self {
            quiz_id: a.id(),
            topic: a.topic().to_string(),
            difficulty: a.difficulty(),
            total_questions: a.total_questions(),
            current_question_index: a.current_index(),
            questions_data: a.questions().map(<[Question]>::to_vec).unwrap_or_default(),
            user_answers: a.user_answers().clone(),
            time_taken: a.time_taken().unwrap_or(0),
            started_at: a.started_at(),
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn save_without_id_defaults_topic_and_counts_questions() {
        let req: SaveProgressRequest = serde_json::from_value(json!({
            "questions_data": [{
                "question": "q",
                "options": ["a", "b"],
                "answers": ["a"],
                "explanation": "e",
            }],
            "user_answers": {"0": "a"},
        }))
        .unwrap();

        let (target, progress) = req.into_parts().unwrap();
        match target {
            ProgressTarget::New(data) => {
                assert_eq!(data.topic, "Custom Quiz");
                assert_eq!(data.difficulty, Difficulty::Medium);
                assert_eq!(data.total_questions, 1);
            }
            other => panic!("unexpected target {other:?}"),
        }
        assert_eq!(progress.current_index, 0);
        assert_eq!(progress.elapsed_seconds, 0);
        assert_eq!(progress.user_answers.len(), 1);
    }

    #[test]
    fn save_without_id_or_questions_needs_a_total() {
        let req: SaveProgressRequest = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(req.into_parts(), Err(QuizError::Validation(_))));
    }

    #[test]
    fn complete_with_id_targets_existing_attempt() {
        let id = Uuid::new_v4();
        let req: CompleteQuizRequest = serde_json::from_value(json!({
            "quiz_id": id,
            "total_questions": 3,
        }))
        .unwrap();

        let (target, completion) = req.into_parts();
        assert!(matches!(target, CompletionTarget::Existing(got) if got == id));
        assert_eq!(completion.correct_count, None);
    }
}
