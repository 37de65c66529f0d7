use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    model::{
        AttemptMutation, AttemptStore, DbConnection, ListWindow, OwnerAggregate,
        entity::{AttemptStatus, QuizAttempt, QuizAttemptRow},
    },
    quiz::{QuizError, QuizResult},
};

const COLUMNS: &str = "id, user_id, topic, difficulty, total_questions, status, current_index, \
    questions, user_answers, score, percentage, correct_count, incorrect_count, started_at, \
    completed_at, time_taken";

#[derive(Debug, Clone)]
pub struct PgAttemptStore {
    db: DbConnection,
}

impl PgAttemptStore {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

fn to_entity(row: QuizAttemptRow) -> QuizResult<QuizAttempt> {
    Ok(QuizAttempt::try_from(row)?)
}

#[async_trait::async_trait]
impl AttemptStore for PgAttemptStore {
    async fn create(&self, attempt: QuizAttempt) -> QuizResult<QuizAttempt> {
        let row: QuizAttemptRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO quiz_attempts ({COLUMNS})
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(attempt.id())
        .bind(attempt.user_id())
        .bind(attempt.topic())
        .bind(attempt.difficulty().as_str())
        .bind(attempt.total_questions())
        .bind(attempt.status().as_str())
        .bind(attempt.current_index())
        .bind(attempt.questions().map(Json))
        .bind(Json(attempt.user_answers()))
        .bind(attempt.score())
        .bind(attempt.percentage())
        .bind(attempt.correct_count())
        .bind(attempt.incorrect_count())
        .bind(attempt.started_at())
        .bind(attempt.completed_at())
        .bind(attempt.time_taken())
        .fetch_one(self.db.pool())
        .await?;

        to_entity(row)
    }

    async fn get_by_id_for_owner(&self, id: Uuid, owner: Uuid) -> QuizResult<Option<QuizAttempt>> {
        let row: Option<QuizAttemptRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM quiz_attempts WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(self.db.pool())
        .await?;

        row.map(to_entity).transpose()
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        owner: Uuid,
        apply: AttemptMutation<'_>,
    ) -> QuizResult<QuizAttempt> {
        // dropping `tx` without commit rolls back, whichever way we leave
        let mut tx = self.db.pool().begin().await?;

        let row: Option<QuizAttemptRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM quiz_attempts WHERE id = $1 AND user_id = $2 FOR UPDATE"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?;

        let mut attempt = to_entity(row.ok_or(QuizError::NotFound)?)?;
        apply(&mut attempt)?;

        let row: QuizAttemptRow = sqlx::query_as(&format!(
            r#"
            UPDATE quiz_attempts
            SET status = $1, current_index = $2, questions = $3, user_answers = $4,
                score = $5, percentage = $6, correct_count = $7, incorrect_count = $8,
                completed_at = $9, time_taken = $10
            WHERE id = $11
            RETURNING {COLUMNS}
            "#
        ))
        .bind(attempt.status().as_str())
        .bind(attempt.current_index())
        .bind(attempt.questions().map(Json))
        .bind(Json(attempt.user_answers()))
        .bind(attempt.score())
        .bind(attempt.percentage())
        .bind(attempt.correct_count())
        .bind(attempt.incorrect_count())
        .bind(attempt.completed_at())
        .bind(attempt.time_taken())
        .bind(attempt.id())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        // stored timestamps are microsecond precision
        to_entity(row)
    }

    async fn delete_by_id(&self, id: Uuid, owner: Uuid) -> QuizResult<bool> {
        let result = sqlx::query("DELETE FROM quiz_attempts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_by_owner_and_status(
        &self,
        owner: Uuid,
        status: AttemptStatus,
        window: Option<ListWindow>,
    ) -> QuizResult<Vec<QuizAttempt>> {
        let order = match status {
            AttemptStatus::Completed => "completed_at DESC",
            AttemptStatus::Ongoing => "started_at DESC",
        };
        let window = window.map(|w| (w.limit(), w.offset()));

        let rows: Vec<QuizAttemptRow> = sqlx::query_as(&format!(
            r#"
            SELECT {COLUMNS} FROM quiz_attempts
            WHERE user_id = $1 AND status = $2
            ORDER BY {order}, id
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(owner)
        .bind(status.as_str())
        .bind(window.map(|(limit, _)| limit))
        .bind(window.map_or(0, |(_, offset)| offset))
        .fetch_all(self.db.pool())
        .await?;

        rows.into_iter().map(to_entity).collect()
    }

    async fn count_by_owner_and_status(&self, owner: Uuid, status: AttemptStatus) -> QuizResult<i64> {
        let result: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM quiz_attempts WHERE user_id = $1 AND status = $2",
        )
        .bind(owner)
        .bind(status.as_str())
        .fetch_one(self.db.pool())
        .await?;

        Ok(result)
    }

    async fn aggregate_by_owner(&self, owner: Uuid) -> QuizResult<OwnerAggregate> {
        let agg: OwnerAggregate = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'completed') AS completed,
                COUNT(*) FILTER (WHERE status = 'ongoing') AS ongoing,
                COALESCE(SUM(percentage) FILTER (WHERE status = 'completed'), 0)::FLOAT8 AS percentage_sum,
                COALESCE(MAX(percentage) FILTER (WHERE status = 'completed'), 0)::FLOAT8 AS best_percentage,
                COALESCE(MIN(percentage) FILTER (WHERE status = 'completed'), 0)::FLOAT8 AS lowest_percentage,
                COALESCE(SUM(COALESCE(time_taken, 0)) FILTER (WHERE status = 'completed'), 0)::BIGINT AS time_spent,
                COALESCE(SUM(correct_count) FILTER (WHERE status = 'completed'), 0)::BIGINT AS correct_sum,
                COALESCE(SUM(total_questions) FILTER (WHERE status = 'completed'), 0)::BIGINT AS questions_sum
            FROM quiz_attempts
            WHERE user_id = $1
            "#,
        )
        .bind(owner)
        .fetch_one(self.db.pool())
        .await?;

        Ok(agg)
    }
}
