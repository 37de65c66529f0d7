use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use crate::{
    auth::CryptError,
    error::log_error,
    model::{DatabaseError, ResourceType, ResourceTyped, entity::QuizAttempt},
    quiz::{QuizError, SourceError},
};

pub type WebResult<T> = std::result::Result<T, WebError>;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("RequestInvalid: {reason}")]
    RequestInvalid { reason: String },
}

#[derive(Debug, Error)]
pub enum AuthenticationError {
    #[error("AuthenticationTokenInvalid, source: {source_name}. Error: {error}")]
    AuthenticationTokenInvalid {
        source_name: &'static str,
        error: CryptError,
    },

    #[error("AuthenticationRequired")]
    AuthenticationRequired,
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("ResourceNotFound: {resource_type:?}")]
    ResourceNotFound { resource_type: ResourceType },

    #[error("ResourceConflict: {resource_type:?}")]
    ResourceConflict { resource_type: ResourceType },

    #[error("ResourceFetchError: {resource_type:?}. Error: {error}")]
    ResourceFetchError {
        resource_type: ResourceType,
        error: DatabaseError,
    },
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("ServerGenerationFailure")]
    ServerGenerationFailure,
    #[error("ServerSourceError: {0}")]
    ServerSourceError(#[from] SourceError),
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::RequestInvalid { reason } => format!("Invalid request: {reason}."),
        }
    }
}

impl AuthenticationError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::AuthenticationTokenInvalid { .. } => {
                String::from("Authentication error, token invalid.")
            }
            Self::AuthenticationRequired => String::from("Authentication required."),
        }
    }
}

impl ResourceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            Self::ResourceConflict { .. } => StatusCode::CONFLICT,
            Self::ResourceFetchError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ResourceNotFound { .. } => String::from("Resource error, resource not found."),
            Self::ResourceConflict { .. } => {
                String::from("Resource error, resource is already completed.")
            }
            Self::ResourceFetchError { .. } => {
                String::from("Resource error, unable to fetch resource.")
            }
        }
    }
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ServerGenerationFailure => {
                String::from("Question generation failed, no usable questions were produced.")
            }
            Self::ServerSourceError(_) => String::from("Question source is unavailable."),
        }
    }
}

#[derive(Debug, Error)]
pub enum WebError {
    #[error("RequestError - {0}")]
    RequestError(#[from] RequestError),
    #[error("ResourceError - {0}")]
    ResourceError(#[from] ResourceError),
    #[error("AuthenticationError - {0}")]
    AuthenticationError(#[from] AuthenticationError),
    #[error("ServerError - {0}")]
    ServerError(#[from] ServerError),
}

impl WebError {
    pub fn invalid_request<S: Into<String>>(reason: S) -> Self {
        Self::RequestError(RequestError::RequestInvalid {
            reason: reason.into(),
        })
    }

    pub fn resource_not_found(r#type: ResourceType) -> Self {
        Self::ResourceError(ResourceError::ResourceNotFound {
            resource_type: r#type,
        })
    }

    pub fn resource_conflict(r#type: ResourceType) -> Self {
        Self::ResourceError(ResourceError::ResourceConflict {
            resource_type: r#type,
        })
    }

    pub fn resource_fetch_error(r#type: ResourceType, error: DatabaseError) -> Self {
        Self::ResourceError(ResourceError::ResourceFetchError {
            resource_type: r#type,
            error,
        })
    }

    pub fn auth_token_invalid(source_name: &'static str, error: CryptError) -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationTokenInvalid {
            source_name,
            error,
        })
    }

    pub fn auth_required() -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationRequired)
    }

    /// Maps a domain failure onto the resource it was about.
    pub fn from_quiz(r#type: ResourceType, error: QuizError) -> Self {
        match error {
            QuizError::Validation(reason) => Self::invalid_request(reason),
            QuizError::NotFound => Self::resource_not_found(r#type),
            QuizError::Conflict => Self::resource_conflict(r#type),
            QuizError::GenerationFailure => {
                Self::ServerError(ServerError::ServerGenerationFailure)
            }
            QuizError::Source(e) => Self::ServerError(ServerError::ServerSourceError(e)),
            QuizError::Persistence(e) => Self::resource_fetch_error(r#type, e),
        }
    }

    pub fn status_code(&self) -> axum::http::StatusCode {
        match self {
            Self::RequestError(e) => e.status_code(),
            Self::ResourceError(e) => e.status_code(),
            Self::AuthenticationError(e) => e.status_code(),
            Self::ServerError(e) => e.status_code(),
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::RequestError(e) => e.client_display(),
            Self::ResourceError(e) => e.client_display(),
            Self::AuthenticationError(e) => e.client_display(),
            Self::ServerError(e) => e.client_display(),
        }
    }
}

impl From<QuizError> for WebError {
    fn from(error: QuizError) -> Self {
        Self::from_quiz(QuizAttempt::get_resource_type(), error)
    }
}

#[derive(serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message for the client
    pub message: String,
    /// HTTP status code (stringified)
    pub status_code: String,
    /// Optional debug details (only in debug mode)
    pub details: Option<String>,
}

impl IntoResponse for WebError {
    fn into_response(self) -> axum::response::Response {
        log_error(&self);

        let status_code = self.status_code();
        let display = self.client_display();

        let body = ErrorResponse {
            message: display,
            status_code: status_code.as_str().to_string(),
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        };

        (status_code, Json(body)).into_response()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn quiz_errors_map_to_statuses() {
        let cases = [
            (QuizError::validation("bad"), StatusCode::BAD_REQUEST),
            (QuizError::NotFound, StatusCode::NOT_FOUND),
            (QuizError::Conflict, StatusCode::CONFLICT),
            (QuizError::GenerationFailure, StatusCode::INTERNAL_SERVER_ERROR),
            (
                QuizError::Persistence(DatabaseError::invalid_column("status", "done")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(WebError::from(error).status_code(), status);
        }
    }

    #[test]
    fn validation_reason_reaches_the_client() {
        let err = WebError::from(QuizError::validation("limit must be between 1 and 100"));
        assert_eq!(
            err.client_display(),
            "Invalid request: limit must be between 1 and 100."
        );
    }

    #[test]
    fn not_found_hides_the_resource_owner() {
        let err = WebError::from(QuizError::NotFound);
        assert_eq!(err.client_display(), "Resource error, resource not found.");
    }
}
