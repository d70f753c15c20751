//! Bearer-token authentication for the HTTP API.
//!
//! [`AuthGate`] extracts the token and hands it to a
//! [`TokenVerifier`](crate::security::auth_provider::TokenVerifier);
//! [`CurrentUser`] exposes the result to handlers.

pub mod config;
pub mod error;
pub mod middleware;
pub mod types;
pub mod utils;

pub use config::{AuthConfig, FirebaseConfig};
pub use error::{AuthError, INVALID_CREDENTIALS_DETAIL};
pub use middleware::{AuthGate, CurrentUser};
pub use types::Claims;
pub use utils::{extract_bearer_token, is_jwt_format};
