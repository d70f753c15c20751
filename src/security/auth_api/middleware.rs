use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{config::AuthConfig, error::AuthError, types::Claims, utils::extract_bearer_token};
use crate::security::auth_provider::TokenVerifier;

/// Turns an `Authorization` header into verified claims.
#[derive(Clone)]
pub struct AuthGate {
    verifier: Arc<dyn TokenVerifier>,
    bearer_prefix: Arc<str>,
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("verifier", &self.verifier.name())
            .field("bearer_prefix", &self.bearer_prefix)
            .finish()
    }
}

impl AuthGate {
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self::with_config(verifier, &AuthConfig::default())
    }

    pub fn with_config(verifier: Arc<dyn TokenVerifier>, config: &AuthConfig) -> Self {
        Self {
            verifier,
            bearer_prefix: Arc::from(config.bearer_prefix.as_str()),
        }
    }

    pub fn verifier_name(&self) -> &str {
        self.verifier.name()
    }

    /// Any failure, including a panic inside the verifier, is an `AuthError`.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Claims, AuthError> {
        let token = extract_bearer_token(headers, &self.bearer_prefix)?;

        let outcome = AssertUnwindSafe(self.verifier.verify(token))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(claims)) => {
                debug!("Authenticated {} via {}", claims.uid, self.verifier.name());
                Ok(claims)
            }
            Ok(Err(e)) => {
                warn!("Verifier {} rejected token: {}", self.verifier.name(), e);
                Err(e)
            }
            Err(_) => {
                warn!("Verifier {} panicked", self.verifier.name());
                Err(AuthError::VerifierPanicked)
            }
        }
    }
}

/// Extractor for handlers that require a verified caller.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Claims);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AuthGate: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let gate = AuthGate::from_ref(state);
        let claims = gate.authenticate(&parts.headers).await?;
        Ok(CurrentUser(claims))
    }
}
