use axum::{
    Json, Router, extract::State, http::StatusCode, middleware, response::IntoResponse,
    routing::post,
};

use crate::{
    model::ResourceType,
    quiz::{self, GenerationRequest},
    web::{
        AppState, JsonBody, RequestContext, WebError, WebResult, dto::GenerateQuestionsResponse,
        error::ErrorResponse, middlewares,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/generate", post(generate_questions_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/questions/generate",
    description = "Asks the question source for a batch and keeps only structurally valid questions",
    request_body = GenerationRequest,
    responses(
        (status = 200, description = "Validated questions, at most `number_questions`", body = GenerateQuestionsResponse),
        (status = 400, description = "Topic or count out of range", body = ErrorResponse),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
        (status = 500, description = "Source failed or produced nothing usable", body = ErrorResponse),
    ),
    tag = "questions",
    security(
        ("cookie" = []),
        ("bearer" = [])
    )
)]
pub(crate) async fn generate_questions_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<GenerationRequest>,
) -> WebResult<impl IntoResponse> {
    ctx.user()?;

    let questions = quiz::source::generate(state.source(), &payload)
        .await
        .map_err(|e| WebError::from_quiz(ResourceType::Question, e))?;

    let body = GenerateQuestionsResponse {
        topic: payload.topic,
        difficulty: payload.difficulty,
        questions,
    };
    Ok((StatusCode::OK, Json(body)))
}
