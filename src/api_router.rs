//! Combines every module's routes into the application router.

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::core::shared::state::AppState;
use crate::core::urls::ApiUrls;

pub fn configure_api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(ApiUrls::HEALTH, get(health))
        .merge(crate::directory::configure())
        .merge(crate::committees::configure())
        .merge(crate::meet::configure())
}

/// The full application with state and request tracing attached.
pub fn app(state: Arc<AppState>) -> Router {
    configure_api_routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
