use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    model::{
        AttemptMutation, AttemptStore, ListWindow, OwnerAggregate,
        entity::{AttemptStatus, QuizAttempt},
    },
    quiz::{QuizError, QuizResult},
};

/// Process-local store for tests and database-less runs.
#[derive(Debug, Default)]
pub struct MemoryAttemptStore {
    rows: RwLock<HashMap<Uuid, QuizAttempt>>,
}

impl MemoryAttemptStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn owned_by(&self, owner: Uuid, status: AttemptStatus) -> Vec<QuizAttempt> {
        self.rows
            .read()
            .await
            .values()
            .filter(|a| a.user_id() == owner && a.status() == status)
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl AttemptStore for MemoryAttemptStore {
    async fn create(&self, attempt: QuizAttempt) -> QuizResult<QuizAttempt> {
        self.rows.write().await.insert(attempt.id(), attempt.clone());
        Ok(attempt)
    }

    async fn get_by_id_for_owner(&self, id: Uuid, owner: Uuid) -> QuizResult<Option<QuizAttempt>> {
        let rows = self.rows.read().await;
        Ok(rows.get(&id).filter(|a| a.user_id() == owner).cloned())
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        owner: Uuid,
        apply: AttemptMutation<'_>,
    ) -> QuizResult<QuizAttempt> {
        let mut rows = self.rows.write().await;
        let stored = rows
            .get_mut(&id)
            .filter(|a| a.user_id() == owner)
            .ok_or(QuizError::NotFound)?;

        // mutate a copy so a failed mutation leaves nothing behind
        let mut draft = stored.clone();
        apply(&mut draft)?;
        *stored = draft.clone();
        Ok(draft)
    }

    async fn delete_by_id(&self, id: Uuid, owner: Uuid) -> QuizResult<bool> {
        let mut rows = self.rows.write().await;
        match rows.get(&id) {
            Some(a) if a.user_id() == owner => {
                rows.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_by_owner_and_status(
        &self,
        owner: Uuid,
        status: AttemptStatus,
        window: Option<ListWindow>,
    ) -> QuizResult<Vec<QuizAttempt>> {
        let mut items = self.owned_by(owner, status).await;
        match status {
            AttemptStatus::Completed => items.sort_by(|a, b| {
                b.completed_at()
                    .cmp(&a.completed_at())
                    .then_with(|| a.id().cmp(&b.id()))
            }),
            AttemptStatus::Ongoing => items.sort_by(|a, b| {
                b.started_at()
                    .cmp(&a.started_at())
                    .then_with(|| a.id().cmp(&b.id()))
            }),
        }

        Ok(match window {
            Some(window) => window.slice(items),
            None => items,
        })
    }

    async fn count_by_owner_and_status(&self, owner: Uuid, status: AttemptStatus) -> QuizResult<i64> {
        Ok(self.owned_by(owner, status).await.len() as i64)
    }

    async fn aggregate_by_owner(&self, owner: Uuid) -> QuizResult<OwnerAggregate> {
        let rows = self.rows.read().await;
        let mut agg = OwnerAggregate::default();
        let mut best: Option<f64> = None;
        let mut lowest: Option<f64> = None;

        for attempt in rows.values().filter(|a| a.user_id() == owner) {
            if attempt.is_ongoing() {
                agg.ongoing += 1;
                continue;
            }

            let pct = attempt.percentage();
            agg.completed += 1;
            agg.percentage_sum += pct;
            agg.time_spent += attempt.time_taken().unwrap_or(0);
            agg.correct_sum += i64::from(attempt.correct_count());
            agg.questions_sum += i64::from(attempt.total_questions());
            best = Some(best.map_or(pct, |b| b.max(pct)));
            lowest = Some(lowest.map_or(pct, |l| l.min(pct)));
        }

        agg.best_percentage = best.unwrap_or(0.0);
        agg.lowest_percentage = lowest.unwrap_or(0.0);
        Ok(agg)
    }
}
