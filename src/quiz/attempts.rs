//! Quiz attempt lifecycle: `ongoing` -> `completed`, or removed at any point.
//!
//! Every state change goes through [`AttemptStore::update_by_id`], which runs
//! the checks and the mutation inside one transaction. A failed check leaves
//! the stored attempt exactly as it was.
//!
//! [`AttemptStore::update_by_id`]: crate::model::AttemptStore::update_by_id

use uuid::Uuid;

use crate::{
    model::{
        ModelManager,
        entity::{Difficulty, QuizAttempt, QuizAttemptCreate},
    },
    quiz::{
        Question, QuizError, QuizResult, UserAnswers, scoring,
        source::{check_topic, check_total},
    },
};

/// Mutable part of an ongoing attempt, overwritten wholesale on every save.
#[derive(Debug, Clone)]
pub struct Progress {
    pub current_index: i32,
    /// `None` keeps the stored question set.
    pub questions: Option<Vec<Question>>,
    pub user_answers: UserAnswers,
    pub elapsed_seconds: i64,
}

#[derive(Debug, Clone)]
pub enum ProgressTarget {
    Existing(Uuid),
    /// First save of a quiz nobody created yet.
    New(QuizAttemptCreate),
}

#[derive(Debug, Clone)]
pub struct Completion {
    /// `None` grades the stored snapshot instead. Required for quick results.
    pub correct_count: Option<i32>,
    pub total_questions: i32,
    pub elapsed_seconds: i64,
}

#[derive(Debug, Clone)]
pub enum CompletionTarget {
    Existing(Uuid),
    /// Quick result: the attempt is born completed.
    New { topic: String, difficulty: Difficulty },
}

fn check_new(data: &QuizAttemptCreate) -> QuizResult<()> {
    check_topic(&data.topic)?;
    check_total(data.total_questions, "total_questions")
}

fn check_questions(questions: &[Question], total_questions: i32) -> QuizResult<()> {
    if questions.len() != total_questions as usize {
        return Err(QuizError::validation(format!(
            "expected {total_questions} questions in snapshot, got {}",
            questions.len()
        )));
    }

    for (idx, question) in questions.iter().enumerate() {
        question
            .check()
            .map_err(|reason| QuizError::validation(format!("question {idx}: {reason}")))?;
    }

    Ok(())
}

fn check_elapsed(elapsed_seconds: i64) -> QuizResult<()> {
    if elapsed_seconds < 0 {
        return Err(QuizError::validation("elapsed seconds must not be negative"));
    }
    Ok(())
}

/// Validates a save against the attempt it lands on.
fn apply_progress(attempt: &mut QuizAttempt, progress: Progress) -> QuizResult<()> {
    let total = attempt.total_questions();
    if !(0..=total).contains(&progress.current_index) {
        return Err(QuizError::validation(format!(
            "current_index must be between 0 and {total}"
        )));
    }
    check_elapsed(progress.elapsed_seconds)?;

    if let Some(questions) = &progress.questions {
        check_questions(questions, total)?;
    }

    let questions = progress.questions.as_deref().or(attempt.questions());
    progress.user_answers.check(total, questions)?;

    attempt.record_progress(
        progress.current_index,
        progress.questions,
        progress.user_answers,
        progress.elapsed_seconds,
    );
    Ok(())
}

fn apply_completion(attempt: &mut QuizAttempt, completion: &Completion) -> QuizResult<()> {
    let total = completion.total_questions;
    if total != attempt.total_questions() {
        return Err(QuizError::validation(format!(
            "total_questions {total} does not match the attempt's {}",
            attempt.total_questions()
        )));
    }

    let correct = match completion.correct_count {
        Some(correct) => correct,
        None => match attempt.questions() {
            Some(questions) => scoring::grade(questions, attempt.user_answers()),
            None => return Err(QuizError::validation("correct_count is required")),
        },
    };
    if !(0..=total).contains(&correct) {
        return Err(QuizError::validation(format!(
            "correct_count must be between 0 and {total}"
        )));
    }

    let result = scoring::aggregate(correct, total);
    attempt.mark_completed(result.score, result.percentage, completion.elapsed_seconds);
    Ok(())
}

#[tracing::instrument(skip(mm, questions))]
pub async fn create(
    mm: &ModelManager,
    owner: Uuid,
    data: QuizAttemptCreate,
    questions: Vec<Question>,
) -> QuizResult<QuizAttempt> {
    check_new(&data)?;
    check_questions(&questions, data.total_questions)?;

    let attempt = mm
        .attempts()
        .create(QuizAttempt::ongoing(owner, data, questions))
        .await?;

    tracing::info!("quiz attempt {} started", attempt.id());
    Ok(attempt)
}

#[tracing::instrument(skip(mm, progress))]
pub async fn save_progress(
    mm: &ModelManager,
    owner: Uuid,
    target: ProgressTarget,
    progress: Progress,
) -> QuizResult<QuizAttempt> {
    match target {
        ProgressTarget::Existing(id) => {
            let attempt = mm
                .attempts()
                .update_by_id(
                    id,
                    owner,
                    Box::new(move |attempt: &mut QuizAttempt| {
                        // saving into a finished attempt looks like saving into nothing
                        if !attempt.is_ongoing() {
                            return Err(QuizError::NotFound);
                        }
                        apply_progress(attempt, progress)
                    }),
                )
                .await?;

            tracing::debug!("quiz attempt {id} at question {}", attempt.current_index());
            Ok(attempt)
        }
        ProgressTarget::New(data) => {
            check_new(&data)?;
            let Some(questions) = progress.questions.clone() else {
                return Err(QuizError::validation(
                    "questions are required to start a quiz",
                ));
            };
            check_questions(&questions, data.total_questions)?;

            let mut attempt = QuizAttempt::ongoing(owner, data, questions);
            apply_progress(&mut attempt, Progress { questions: None, ..progress })?;

            let attempt = mm.attempts().create(attempt).await?;
            tracing::info!("quiz attempt {} started from a progress save", attempt.id());
            Ok(attempt)
        }
    }
}

/// Full snapshot of an ongoing attempt. Completed ones are not resumable.
#[tracing::instrument(skip(mm))]
pub async fn resume(mm: &ModelManager, owner: Uuid, id: Uuid) -> QuizResult<QuizAttempt> {
    mm.attempts()
        .get_by_id_for_owner(id, owner)
        .await?
        .filter(QuizAttempt::is_ongoing)
        .ok_or(QuizError::NotFound)
}

#[tracing::instrument(skip(mm))]
pub async fn complete(
    mm: &ModelManager,
    owner: Uuid,
    target: CompletionTarget,
    completion: Completion,
) -> QuizResult<QuizAttempt> {
    check_total(completion.total_questions, "total_questions")?;
    check_elapsed(completion.elapsed_seconds)?;

    let attempt = match target {
        CompletionTarget::Existing(id) => {
            mm.attempts()
                .update_by_id(
                    id,
                    owner,
                    Box::new(move |attempt: &mut QuizAttempt| {
                        if !attempt.is_ongoing() {
                            return Err(QuizError::Conflict);
                        }
                        apply_completion(attempt, &completion)
                    }),
                )
                .await?
        }
        CompletionTarget::New { topic, difficulty } => {
            if completion.correct_count.is_none() {
                return Err(QuizError::validation("correct_count is required"));
            }
            let data = QuizAttemptCreate {
                topic,
                difficulty,
                total_questions: completion.total_questions,
            };
            check_new(&data)?;

            let mut attempt = QuizAttempt::ongoing(owner, data, Vec::new());
            apply_completion(&mut attempt, &completion)?;
            mm.attempts().create(attempt).await?
        }
    };

    tracing::info!(
        "quiz attempt {} completed with {:.1}%",
        attempt.id(),
        attempt.percentage()
    );
    Ok(attempt)
}

#[tracing::instrument(skip(mm))]
pub async fn delete(mm: &ModelManager, owner: Uuid, id: Uuid) -> QuizResult<()> {
    if !mm.attempts().delete_by_id(id, owner).await? {
        return Err(QuizError::NotFound);
    }

    tracing::info!("quiz attempt {id} deleted");
    Ok(())
}

/// Stored attempt in any state.
#[tracing::instrument(skip(mm))]
pub async fn details(mm: &ModelManager, owner: Uuid, id: Uuid) -> QuizResult<QuizAttempt> {
    mm.attempts()
        .get_by_id_for_owner(id, owner)
        .await?
        .ok_or(QuizError::NotFound)
}
