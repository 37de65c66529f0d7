//! Read-only views over an owner's attempts. Nothing here is persisted.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    model::{
        ListWindow, ModelManager, Page,
        entity::{AttemptStatus, Difficulty, QuizAttempt},
    },
    quiz::QuizResult,
};

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn ratio_percent(part: i64, whole: i64) -> f64 {
    if whole > 0 {
        part as f64 / whole as f64 * 100.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, utoipa::ToSchema)]
pub struct DashboardStats {
    pub total_quizzes: i64,
    pub ongoing_quizzes: i64,
    pub average_score: f64,
    pub best_score: f64,
    pub lowest_score: f64,
    pub total_time_spent: i64,
    pub total_correct: i64,
    pub total_questions: i64,
    pub accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct AttemptSummary {
    pub id: Uuid,
    pub topic: String,
    pub difficulty: Difficulty,
    pub score: i32,
    pub percentage: f64,
    pub correct_count: i32,
    pub total_questions: i32,
    pub time_taken: Option<i64>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<QuizAttempt> for AttemptSummary {
    fn from(a: QuizAttempt) -> Self {
        Self {
            id: a.id(),
            topic: a.topic().to_string(),
            difficulty: a.difficulty(),
            score: a.score(),
            percentage: round_to(a.percentage(), 2),
            correct_count: a.correct_count(),
            total_questions: a.total_questions(),
            time_taken: a.time_taken(),
            started_at: a.started_at(),
            completed_at: a.completed_at(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct OngoingAttempt {
    pub id: Uuid,
    pub topic: String,
    pub difficulty: Difficulty,
    pub total_questions: i32,
    pub current_question: i32,
    pub progress_percentage: f64,
    pub started_at: DateTime<Utc>,
}

impl From<QuizAttempt> for OngoingAttempt {
    fn from(a: QuizAttempt) -> Self {
        let current_question = a.current_index() + 1;
        let progress = ratio_percent(i64::from(current_question), i64::from(a.total_questions()));

        Self {
            id: a.id(),
            topic: a.topic().to_string(),
            difficulty: a.difficulty(),
            total_questions: a.total_questions(),
            current_question,
            progress_percentage: round_to(progress, 1),
            started_at: a.started_at(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct TopicPerformance {
    pub topic: String,
    pub total_quizzes: i64,
    pub average_score: f64,
    pub accuracy: f64,
}

#[tracing::instrument(skip(mm))]
pub async fn dashboard_stats(mm: &ModelManager, owner: Uuid) -> QuizResult<DashboardStats> {
    let agg = mm.attempts().aggregate_by_owner(owner).await?;

    let average = if agg.completed > 0 {
        agg.percentage_sum / agg.completed as f64
    } else {
        0.0
    };

    Ok(DashboardStats {
        total_quizzes: agg.completed,
        ongoing_quizzes: agg.ongoing,
        average_score: round_to(average, 2),
        best_score: round_to(agg.best_percentage, 2),
        lowest_score: round_to(agg.lowest_percentage, 2),
        total_time_spent: agg.time_spent,
        total_correct: agg.correct_sum,
        total_questions: agg.questions_sum,
        accuracy: round_to(ratio_percent(agg.correct_sum, agg.questions_sum), 2),
    })
}

#[tracing::instrument(skip(mm))]
pub async fn history(
    mm: &ModelManager,
    owner: Uuid,
    window: ListWindow,
) -> QuizResult<Page<AttemptSummary>> {
    let store = mm.attempts();
    let items = store
        .list_by_owner_and_status(owner, AttemptStatus::Completed, Some(window))
        .await?;
    let total = store
        .count_by_owner_and_status(owner, AttemptStatus::Completed)
        .await?;

    Ok(Page::new(items, total, window.limit(), window.offset()).map(AttemptSummary::from))
}

#[tracing::instrument(skip(mm))]
pub async fn ongoing_list(mm: &ModelManager, owner: Uuid) -> QuizResult<Vec<OngoingAttempt>> {
    let items = mm
        .attempts()
        .list_by_owner_and_status(owner, AttemptStatus::Ongoing, None)
        .await?;

    Ok(items.into_iter().map(OngoingAttempt::from).collect())
}

#[derive(Default)]
struct TopicTotals {
    quizzes: i64,
    percentage_sum: f64,
    correct: i64,
    questions: i64,
}

#[tracing::instrument(skip(mm))]
pub async fn performance_by_topic(
    mm: &ModelManager,
    owner: Uuid,
) -> QuizResult<Vec<TopicPerformance>> {
    let completed = mm
        .attempts()
        .list_by_owner_and_status(owner, AttemptStatus::Completed, None)
        .await?;

    let mut groups: BTreeMap<String, TopicTotals> = BTreeMap::new();
    for attempt in &completed {
        let totals = groups.entry(attempt.topic().to_string()).or_default();
        totals.quizzes += 1;
        totals.percentage_sum += attempt.percentage();
        totals.correct += i64::from(attempt.correct_count());
        totals.questions += i64::from(attempt.total_questions());
    }

    let mut result: Vec<TopicPerformance> = groups
        .into_iter()
        .map(|(topic, t)| TopicPerformance {
            topic,
            total_quizzes: t.quizzes,
            average_score: round_to(t.percentage_sum / t.quizzes as f64, 2),
            accuracy: round_to(ratio_percent(t.correct, t.questions), 2),
        })
        .collect();

    // stable sort keeps the alphabetical order among equal scores
    result.sort_by(|a, b| b.average_score.total_cmp(&a.average_score));
    Ok(result)
}
