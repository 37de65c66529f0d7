//! Persistence boundary for quiz attempts.
//!
//! Every lookup is scoped by owner. A row owned by somebody else is reported
//! exactly like a missing one.

use serde::Serialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::{
    model::{
        ListWindow,
        entity::{AttemptStatus, QuizAttempt},
    },
    quiz::QuizResult,
};

/// Mutation applied inside the store's transaction. Returning an error rolls
/// the whole thing back and leaves the stored row untouched.
pub type AttemptMutation<'a> = Box<dyn FnOnce(&mut QuizAttempt) -> QuizResult<()> + Send + 'a>;

/// Per-owner totals over completed attempts plus the ongoing count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
pub struct OwnerAggregate {
    pub completed: i64,
    pub ongoing: i64,
    pub percentage_sum: f64,
    pub best_percentage: f64,
    pub lowest_percentage: f64,
    pub time_spent: i64,
    pub correct_sum: i64,
    pub questions_sum: i64,
}

#[async_trait::async_trait]
pub trait AttemptStore: std::fmt::Debug + Send + Sync {
    async fn create(&self, attempt: QuizAttempt) -> QuizResult<QuizAttempt>;

    async fn get_by_id_for_owner(&self, id: Uuid, owner: Uuid) -> QuizResult<Option<QuizAttempt>>;

    /// Read-validate-mutate-commit as one unit. `QuizError::NotFound` when the
    /// row is absent or not owned.
    async fn update_by_id(
        &self,
        id: Uuid,
        owner: Uuid,
        apply: AttemptMutation<'_>,
    ) -> QuizResult<QuizAttempt>;

    /// Returns whether a row was removed.
    async fn delete_by_id(&self, id: Uuid, owner: Uuid) -> QuizResult<bool>;

    /// Completed attempts come newest-completed first, ongoing ones
    /// newest-started first.
    async fn list_by_owner_and_status(
        &self,
        owner: Uuid,
        status: AttemptStatus,
        window: Option<ListWindow>,
    ) -> QuizResult<Vec<QuizAttempt>>;

    async fn count_by_owner_and_status(&self, owner: Uuid, status: AttemptStatus) -> QuizResult<i64>;

    async fn aggregate_by_owner(&self, owner: Uuid) -> QuizResult<OwnerAggregate>;
}
