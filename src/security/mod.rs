pub mod auth_api;
pub mod auth_provider;
pub mod validation;

pub use auth_api::{AuthConfig, AuthError, AuthGate, Claims, CurrentUser, FirebaseConfig};
pub use auth_provider::{FirebaseTokenVerifier, StaticTokenVerifier, TokenVerifier};
pub use validation::{FieldError, ValidationError, ValidationErrors, Validator};
