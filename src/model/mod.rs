mod database;
pub use database::DbConnection;

pub mod entity;

mod error;
pub use error::{DatabaseError, DatabaseResult};

mod repo;
pub use repo::{ListWindow, Page, ResourceType, ResourceTyped};

mod store;
pub use store::{AttemptMutation, AttemptStore, OwnerAggregate};

mod memory;
pub use memory::MemoryAttemptStore;

mod postgres;
pub use postgres::PgAttemptStore;

use std::sync::Arc;

/// Storage handle passed explicitly into every quiz operation.
#[derive(Debug, Clone)]
pub struct ModelManager {
    store: Arc<dyn AttemptStore>, // cloning is cheap
}

impl ModelManager {
    pub fn new(store: Arc<dyn AttemptStore>) -> Self {
        Self { store }
    }

    pub fn postgres(conn: DbConnection) -> Self {
        Self::new(Arc::new(PgAttemptStore::new(conn)))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryAttemptStore::new()))
    }

    pub fn attempts(&self) -> &dyn AttemptStore {
        self.store.as_ref()
    }
}
