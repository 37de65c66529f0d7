use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};

use crate::{
    model::Page,
    quiz::stats::{self, AttemptSummary, DashboardStats, OngoingAttempt, TopicPerformance},
    web::{
        AppState, QueryParams, RequestContext, WebResult, dto::PaginationQuery, error::ErrorResponse,
        middlewares,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/stats", get(dashboard_stats_handler))
        .route("/history", get(dashboard_history_handler))
        .route("/ongoing", get(dashboard_ongoing_handler))
        .route("/performance-by-topic", get(dashboard_performance_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/stats",
    description = "Totals over completed attempts plus the number of ongoing ones",
    responses(
        (status = 200, description = "Dashboard totals", body = DashboardStats),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "dashboard",
    security(("cookie" = []), ("bearer" = []))
)]
pub(crate) async fn dashboard_stats_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let stats = stats::dashboard_stats(state.mm(), user.user_id()).await?;

    Ok((StatusCode::OK, Json(stats)))
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/history",
    description = "Completed attempts, newest first",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Requested page", body = Page<AttemptSummary>),
        (status = 400, description = "Limit or offset out of range", body = ErrorResponse),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "dashboard",
    security(("cookie" = []), ("bearer" = []))
)]
pub(crate) async fn dashboard_history_handler(
    ctx: RequestContext,
    QueryParams(page): QueryParams<PaginationQuery>,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let page = stats::history(state.mm(), user.user_id(), page.window()?).await?;

    Ok((StatusCode::OK, Json(page)))
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/ongoing",
    description = "Ongoing attempts with their progress, newest first",
    responses(
        (status = 200, description = "Ongoing attempts", body = Vec<OngoingAttempt>),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "dashboard",
    security(("cookie" = []), ("bearer" = []))
)]
pub(crate) async fn dashboard_ongoing_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let list = stats::ongoing_list(state.mm(), user.user_id()).await?;

    Ok((StatusCode::OK, Json(list)))
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/performance-by-topic",
    description = "Completed attempts grouped by topic, best average first",
    responses(
        (status = 200, description = "Per-topic performance", body = Vec<TopicPerformance>),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "dashboard",
    security(("cookie" = []), ("bearer" = []))
)]
pub(crate) async fn dashboard_performance_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let perf = stats::performance_by_topic(state.mm(), user.user_id()).await?;

    Ok((StatusCode::OK, Json(perf)))
}
