use anyhow::Result;
use axum::extract::FromRef;
use std::sync::Arc;
use tracing::info;

use crate::core::config::AppConfig;
use crate::security::auth_api::AuthGate;
use crate::security::auth_provider::{FirebaseTokenVerifier, StaticTokenVerifier, TokenVerifier};

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: AuthGate,
}

impl AppState {
    pub fn new(config: AppConfig, verifier: Arc<dyn TokenVerifier>) -> Self {
        let auth = AuthGate::with_config(verifier, &config.auth);
        Self {
            config: Arc::new(config),
            auth,
        }
    }

    /// Static tokens take precedence; otherwise tokens are checked against
    /// Firebase.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let verifier: Arc<dyn TokenVerifier> = if config.auth.uses_static_tokens() {
            info!(
                "Using static token verifier ({} tokens)",
                config.auth.static_tokens.len()
            );
            Arc::new(StaticTokenVerifier::from_config(&config.auth))
        } else {
            Arc::new(FirebaseTokenVerifier::new(config.firebase.clone())?)
        };
        Ok(Self::new(config, verifier))
    }
}

impl FromRef<Arc<AppState>> for AuthGate {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.auth.clone()
    }
}
