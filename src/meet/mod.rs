use axum::{routing::post, Json, Router};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::core::shared::error::ApiError;
use crate::core::shared::record::Record;
use crate::core::shared::state::AppState;
use crate::core::shared::viewer::Viewer;
use crate::core::urls::ApiUrls;
use crate::security::auth_api::CurrentUser;

pub mod types;

pub use types::{Meet, MeetBase, MeetCreate, MeetResponse, MeetUpdate};

pub fn configure() -> Router<Arc<AppState>> {
    Router::new().route(ApiUrls::MEETS_PREVIEW, post(preview_meeting))
}

/// Shows the caller the meeting they would get from this request. Nothing is
/// stored.
pub async fn preview_meeting(
    CurrentUser(claims): CurrentUser,
    Json(body): Json<Value>,
) -> Result<Json<MeetResponse>, ApiError> {
    let create = MeetCreate::from_value(body)?;
    let meet_id = format!("meet_{}", Uuid::new_v4().simple());
    let meet = Meet::from_create(create, meet_id, claims.uid.clone())?;
    info!("Previewed meeting '{}' for {}", meet.base.title, claims.uid);

    Ok(Json(MeetResponse::from_meet(&meet, &Viewer::from(&claims))))
}
