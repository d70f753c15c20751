pub mod api_router;
pub mod committees;
pub mod core;
pub mod directory;
pub mod meet;
pub mod security;

pub use crate::core::config::AppConfig;
pub use crate::core::shared::state::AppState;
