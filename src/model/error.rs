use thiserror::Error;

pub type DatabaseResult<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("sqlx migrate error: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("sqlx error: {0}")]
    SqlxError(#[from] sqlx::Error),
    #[error("json error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("column `{column}` holds unexpected value `{value}`")]
    InvalidColumn { column: &'static str, value: String },
}

impl DatabaseError {
    pub fn invalid_column(column: &'static str, value: &str) -> Self {
        Self::InvalidColumn {
            column,
            value: value.to_string(),
        }
    }
}
