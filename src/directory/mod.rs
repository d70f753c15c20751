use axum::Json;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::core::shared::error::ApiError;
use crate::core::shared::record::{Record, RecordError};
use crate::security::auth_api::{Claims, CurrentUser};
use crate::security::validation::{ValidationError, ValidationErrors};

pub mod router;
pub mod tree;
pub mod users;

pub use router::configure;
pub use tree::{build_user_tree, UserNode, UserTree};
pub use users::User;

#[derive(Debug, Serialize)]
pub struct UserTreeResponse {
    pub roots: Vec<UserNode>,
    pub orphans: Vec<String>,
}

impl From<&UserTree> for UserTreeResponse {
    fn from(tree: &UserTree) -> Self {
        Self {
            roots: tree.to_nested(),
            orphans: tree.orphans().map(|u| u.uid.clone()).collect(),
        }
    }
}

pub async fn get_me(CurrentUser(claims): CurrentUser) -> Json<Claims> {
    Json(claims)
}

/// Validates every user in the roster, reporting errors as `[i].field`, and
/// returns the hierarchy built from them.
pub async fn build_tree(
    CurrentUser(claims): CurrentUser,
    Json(roster): Json<Vec<Value>>,
) -> Result<Json<UserTreeResponse>, ApiError> {
    let users = parse_roster(roster)?;
    let tree = build_user_tree(users);
    info!(
        "{} built a hierarchy of {} users ({} orphaned)",
        claims.uid,
        tree.len(),
        tree.orphan_ids().len()
    );
    Ok(Json(UserTreeResponse::from(&tree)))
}

pub fn parse_roster(roster: Vec<Value>) -> Result<Vec<User>, ValidationErrors> {
    let mut users = Vec::with_capacity(roster.len());
    let mut errors = ValidationErrors::new();

    for (i, value) in roster.into_iter().enumerate() {
        let prefix = format!("[{i}]");
        match User::from_value(value) {
            Ok(user) => users.push(user),
            Err(RecordError::Invalid(e)) => errors.merge(e.nested(&prefix)),
            Err(RecordError::Decode(e)) => errors.add_error(ValidationError::InvalidValue {
                field: prefix,
                message: e.to_string(),
            }),
        }
    }

    if errors.is_valid() {
        Ok(users)
    } else {
        Err(errors)
    }
}
