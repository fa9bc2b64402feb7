use axum::{
    Json, Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::{handlers::handle_filter, state::AppState};
use crate::config::FilterConfig;

/// Create the application router from the process environment.
pub async fn create_router() -> anyhow::Result<Router> {
    let config = FilterConfig::from_env()?;
    tracing::debug!("Loaded configuration: {:?}", config);

    let cors_origin = std::env::var("CORS_ALLOWED_ORIGIN").unwrap_or_else(|_| "*".to_string());
    build_router(&config, &cors_origin)
}

/// Create the application router from an explicit configuration.
pub fn build_router(config: &FilterConfig, cors_origin: &str) -> anyhow::Result<Router> {
    let state = AppState::new(config)?;

    let cors = if cors_origin == "*" {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(cors_origin.parse::<HeaderValue>()?)
            .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
            .allow_headers(Any)
    };

    let app = Router::new()
        .route("/filter", post(handle_filter))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
