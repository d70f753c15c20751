use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::debug;

pub const INVALID_CREDENTIALS_DETAIL: &str = "Invalid authentication credentials";

/// Why a request was refused. Callers only ever see a generic 401; the
/// variant is for logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("authorization header missing or not valid UTF-8")]
    MissingHeader,
    #[error("authorization header does not use the bearer scheme")]
    InvalidScheme,
    #[error("bearer token is empty")]
    MissingToken,
    #[error("token verification failed: {0}")]
    VerificationFailed(String),
    #[error("token verifier panicked")]
    VerifierPanicked,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingHeader => "missing_header",
            Self::InvalidScheme => "invalid_scheme",
            Self::MissingToken => "missing_token",
            Self::VerificationFailed(_) => "verification_failed",
            Self::VerifierPanicked => "verifier_panicked",
        }
    }

    pub(crate) fn verification(reason: impl std::fmt::Display) -> Self {
        Self::VerificationFailed(reason.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        debug!("Rejecting request ({}): {}", self.error_code(), self);
        let body = Json(json!({ "detail": INVALID_CREDENTIALS_DETAIL }));
        (self.status_code(), body).into_response()
    }
}
