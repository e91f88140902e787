//! API Router and Application State
//!
//! Central routing configuration and shared state.

mod docs;
mod error;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::OpenApi;

pub use docs::ApiDoc;
pub use error::{ApiError, ErrorBody};

use crate::config::Config;
use crate::store::Store;
use crate::{thoughts, users};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Persistence gateway
    pub store: Arc<dyn Store>,
    /// Server configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        .nest("/api/users", users::router())
        .nest("/api/thoughts", thoughts::router())
        // API documentation
        .route("/api/openapi.json", get(openapi_json))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// "ok" when the store answers, "degraded" otherwise
    status: &'static str,
    /// Store backend in use
    backend: &'static str,
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = match state.store.ping().await {
        Ok(()) => "ok",
        Err(e) => {
            warn!(error = %e, "Store health check failed");
            "degraded"
        }
    };

    Json(HealthResponse {
        status,
        backend: state.store.backend(),
    })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
