use axum::{
    extract::Path,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::core::shared::enums::Committee;
use crate::core::shared::error::ApiError;
use crate::core::shared::state::AppState;
use crate::core::shared::viewer::Viewer;
use crate::core::urls::ApiUrls;
use crate::security::auth_api::CurrentUser;

pub mod types;

pub use types::{
    get_all_committees, CommitteeCreate, CommitteeInfo, CommitteeMember, CommitteeResponse,
    CommitteeStats, CommitteeUpdate,
};

pub fn configure() -> Router<Arc<AppState>> {
    Router::new()
        .route(ApiUrls::COMMITTEES, get(list_committees))
        .route(ApiUrls::COMMITTEE_BY_NAME, get(get_committee))
}

pub async fn list_committees(CurrentUser(claims): CurrentUser) -> Json<Vec<CommitteeResponse>> {
    let viewer = Viewer::from(&claims);
    Json(
        get_all_committees()
            .iter()
            .map(|info| CommitteeResponse::from_info(info, &viewer))
            .collect(),
    )
}

pub async fn get_committee(
    CurrentUser(claims): CurrentUser,
    Path(name): Path<String>,
) -> Result<Json<CommitteeResponse>, ApiError> {
    let committee: Committee = name
        .parse()
        .map_err(|_| ApiError::not_found(format!("Committee '{name}'")))?;
    let viewer = Viewer::from(&claims);

    get_all_committees()
        .into_iter()
        .find(|info| info.name == committee)
        .map(|info| Json(CommitteeResponse::from_info(&info, &viewer)))
        .ok_or_else(|| ApiError::not_found(format!("Committee '{name}'")))
}
