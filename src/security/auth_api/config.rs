use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::types::Claims;

pub const DEFAULT_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";
pub const DEFAULT_ISSUER_BASE: &str = "https://securetoken.google.com/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub bearer_prefix: String,
    /// Fixed token → claims table. When non-empty the static verifier is used
    /// instead of Firebase.
    pub static_tokens: HashMap<String, Claims>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            bearer_prefix: "Bearer ".to_string(),
            static_tokens: HashMap::new(),
        }
    }
}

impl AuthConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bearer_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.bearer_prefix = prefix.into();
        self
    }

    pub fn with_static_token(mut self, token: impl Into<String>, claims: Claims) -> Self {
        self.static_tokens.insert(token.into(), claims);
        self
    }

    pub fn uses_static_tokens(&self) -> bool {
        !self.static_tokens.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirebaseConfig {
    pub project_id: String,
    pub jwks_url: String,
    pub issuer_base: String,
    pub timeout_secs: u64,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            jwks_url: DEFAULT_JWKS_URL.to_string(),
            issuer_base: DEFAULT_ISSUER_BASE.to_string(),
            timeout_secs: 10,
        }
    }
}

impl FirebaseConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            ..Self::default()
        }
    }

    pub fn with_jwks_url(mut self, url: impl Into<String>) -> Self {
        self.jwks_url = url.into();
        self
    }

    /// `iss` every token for this project must carry.
    pub fn issuer(&self) -> String {
        format!("{}{}", self.issuer_base, self.project_id)
    }
}
