//! Vodokanal preset API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod dto;
mod error;
mod handlers;
mod state;

use std::sync::Arc;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use vodokanal_application::PresetService;
use vodokanal_core::AppError;
use vodokanal_infrastructure::PostgresPresetRepository;

use crate::api_config::ApiConfig;
use crate::handlers::{
    create_preset_handler, delete_preset_handler, get_preset_configuration_handler,
    get_preset_handler, health_handler, list_presets_handler, update_preset_handler,
};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    api_config::init_tracing();

    let config = ApiConfig::load()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let state = AppState {
        preset_service: PresetService::new(Arc::new(PostgresPresetRepository::new(pool))),
    };

    let router = api_router(&config.frontend_url, state)?;
    let address = config.socket_address()?;

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind {address}: {error}")))?;

    info!(%address, "vodokanal preset api listening");

    axum::serve(listener, router)
        .await
        .map_err(|error| AppError::Internal(format!("server error: {error}")))?;

    Ok(())
}

fn api_router(frontend_url: &str, state: AppState) -> Result<Router, AppError> {
    let allow_origin = frontend_url.parse::<HeaderValue>().map_err(|error| {
        AppError::Validation(format!("invalid FRONTEND_URL '{frontend_url}': {error}"))
    })?;

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    Ok(Router::new()
        .route("/api/health", get(health_handler))
        .route(
            "/api/presets",
            get(list_presets_handler).post(create_preset_handler),
        )
        .route(
            "/api/presets/{id}",
            get(get_preset_handler)
                .put(update_preset_handler)
                .delete(delete_preset_handler),
        )
        .route(
            "/api/presets/{id}/configuration",
            get(get_preset_configuration_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}
