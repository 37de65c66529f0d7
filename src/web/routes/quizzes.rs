use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    model::entity::QuizAttempt,
    quiz::attempts,
    web::{
        AppState, JsonBody, RequestContext, WebResult,
        dto::{CompleteQuizRequest, ResumeResponse, SaveProgressRequest, SavedResponse, StartQuizRequest},
        error::ErrorResponse,
        middlewares,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", post(quiz_start_handler))
        .route("/progress", post(quiz_progress_handler))
        .route("/complete", post(quiz_complete_handler))
        .route("/{id}", get(quiz_details_handler).delete(quiz_delete_handler))
        .route("/{id}/resume", get(quiz_resume_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/quizzes",
    description = "Starts an ongoing attempt over a validated question snapshot",
    request_body = StartQuizRequest,
    responses(
        (status = 201, description = "Attempt started", body = QuizAttempt),
        (status = 400, description = "Invalid topic, count or snapshot", body = ErrorResponse),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "quizzes",
    security(("cookie" = []), ("bearer" = []))
)]
pub(crate) async fn quiz_start_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<StartQuizRequest>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let (data, questions) = payload.into_parts();

    let attempt = attempts::create(state.mm(), user.user_id(), data, questions).await?;
    Ok((StatusCode::CREATED, Json(attempt)))
}

#[utoipa::path(
    post,
    path = "/api/v1/quizzes/progress",
    description = "Overwrites the progress of an ongoing attempt. Without `quiz_id` a new attempt is started",
    request_body = SaveProgressRequest,
    responses(
        (status = 200, description = "Progress saved", body = SavedResponse),
        (status = 400, description = "Index, answers or snapshot invalid", body = ErrorResponse),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
        (status = 404, description = "No ongoing attempt with this id", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "quizzes",
    security(("cookie" = []), ("bearer" = []))
)]
pub(crate) async fn quiz_progress_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SaveProgressRequest>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let (target, progress) = payload.into_parts()?;

    let attempt = attempts::save_progress(state.mm(), user.user_id(), target, progress).await?;
    Ok((
        StatusCode::OK,
        Json(SavedResponse::new("Quiz state saved successfully", &attempt)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/quizzes/{id}/resume",
    description = "Full snapshot of an ongoing attempt",
    params(("id" = Uuid, Path, description = "Attempt id")),
    responses(
        (status = 200, description = "Attempt snapshot", body = ResumeResponse),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
        (status = 404, description = "Not found or already completed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "quizzes",
    security(("cookie" = []), ("bearer" = []))
)]
pub(crate) async fn quiz_resume_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let attempt = attempts::resume(state.mm(), user.user_id(), id).await?;

    Ok((StatusCode::OK, Json(ResumeResponse::from(attempt))))
}

#[utoipa::path(
    post,
    path = "/api/v1/quizzes/complete",
    description = "Completes an ongoing attempt, or records a quick result when `quiz_id` is omitted",
    request_body = CompleteQuizRequest,
    responses(
        (status = 200, description = "Completed attempt", body = QuizAttempt),
        (status = 400, description = "Counts out of range or mismatched", body = ErrorResponse),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
        (status = 404, description = "Attempt not found", body = ErrorResponse),
        (status = 409, description = "Attempt is already completed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "quizzes",
    security(("cookie" = []), ("bearer" = []))
)]
pub(crate) async fn quiz_complete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CompleteQuizRequest>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let (target, completion) = payload.into_parts();

    let attempt = attempts::complete(state.mm(), user.user_id(), target, completion).await?;
    Ok((StatusCode::OK, Json(attempt)))
}

#[utoipa::path(
    get,
    path = "/api/v1/quizzes/{id}",
    description = "Stored attempt in any state",
    params(("id" = Uuid, Path, description = "Attempt id")),
    responses(
        (status = 200, description = "Attempt", body = QuizAttempt),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
        (status = 404, description = "Attempt not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "quizzes",
    security(("cookie" = []), ("bearer" = []))
)]
pub(crate) async fn quiz_details_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let attempt = attempts::details(state.mm(), user.user_id(), id).await?;

    Ok((StatusCode::OK, Json(attempt)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/quizzes/{id}",
    description = "Deletes the attempt whatever its state",
    params(("id" = Uuid, Path, description = "Attempt id")),
    responses(
        (status = 200, description = "Attempt deleted"),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
        (status = 404, description = "Attempt not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "quizzes",
    security(("cookie" = []), ("bearer" = []))
)]
pub(crate) async fn quiz_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    attempts::delete(state.mm(), user.user_id(), id).await?;

    Ok(StatusCode::OK)
}
