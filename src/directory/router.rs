use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::core::shared::state::AppState;
use crate::core::urls::ApiUrls;

pub fn configure() -> Router<Arc<AppState>> {
    Router::new()
        .route(ApiUrls::ME, get(super::get_me))
        .route(ApiUrls::USERS_TREE, post(super::build_tree))
}
