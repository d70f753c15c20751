use serde::{Deserialize, Serialize};

use crate::core::shared::enums::UserRole;
use crate::security::auth_api::Claims;

/// Who is looking at a record. Permission flags on response types are
/// computed from this at read time and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub user_id: String,
    pub role: Option<UserRole>,
}

impl Viewer {
    pub fn new(user_id: impl Into<String>, role: Option<UserRole>) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn is_fc(&self) -> bool {
        self.role == Some(UserRole::Fc)
    }
}

impl From<&Claims> for Viewer {
    fn from(claims: &Claims) -> Self {
        Self::new(claims.uid.clone(), claims.role)
    }
}
