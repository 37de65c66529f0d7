use std::{path::Path, sync::Arc};

use axum::Router;
use tokio::net::TcpListener;

use crate::error::AppResult;
use crate::model::{DbConnection, ModelManager};
use crate::quiz::{HttpQuestionSource, QuestionSource};
use crate::utils::signal::shutdown_signal;
use crate::web::AppState;

pub mod config;
pub use config::{Config, ConfigError, ConfigResult};

pub mod auth;
pub mod error;
pub mod model;
pub mod quiz;
pub mod utils;
pub mod web;

static APPLICATION_NAME: &str = "quizlog";

/// Wires everything from `config.toml`: Postgres store, migrations, HTTP
/// question source.
pub async fn build_server(config: &'static Config) -> AppResult<(AppState, Router)> {
    let db = DbConnection::connect(config.app().database_uri())?;

    tracing::debug!("applying migrations...");
    db.migrate(Path::new("./migrations")).await?;

    let source = HttpQuestionSource::new(config.generator())?;
    let state = AppState::new(ModelManager::postgres(db), Arc::new(source), config.app().jwt())
        .with_docs(config.app().docs());

    let app = web::routes::build_app(state.clone());
    Ok((state, app))
}

/// Same router over a caller-provided store and source. No config file is read.
pub fn build_server_with(
    mm: ModelManager,
    source: Arc<dyn QuestionSource>,
    jwt: &str,
) -> (AppState, Router) {
    let state = AppState::new(mm, source, jwt);
    let app = web::routes::build_app(state.clone());
    (state, app)
}

#[tracing::instrument]
pub async fn setup_workers() -> AppResult<()> {
    let config = Config::get_or_init(cfg!(debug_assertions)).await;
    let (_, app) = build_server(config).await?;
    let listener = TcpListener::bind(config.host().bindto()).await?;

    tracing::info!("axum is starting at: {}", config.host().bindto());
    let axum_handle = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    axum_handle.await?;
    tracing::info!("server stopped");
    Ok(())
}

fn setup_trace() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

    // load .env file for RUST_LOG etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .with(ErrorLayer::default())
        .init();

    tracing::debug!("tracing initialized.");
}

#[tracing::instrument]
pub async fn run() -> AppResult<()> {
    setup_trace();
    setup_workers().await?;
    Ok(())
}
