use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::security::auth_api::{AuthConfig, FirebaseConfig};

pub const ENV_PREFIX: &str = "COMMITTEESERVER_";
pub const CONFIG_PATH_ENV: &str = "COMMITTEESERVER_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "committeeserver.toml";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub firebase: FirebaseConfig,
    pub log_level: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            firebase: FirebaseConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults, then the TOML file (if present), then `COMMITTEESERVER_*`
    /// environment variables. Nested keys use `__`, e.g.
    /// `COMMITTEESERVER_FIREBASE__PROJECT_ID`.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config: Self = Self::figment(path)
            .extract()
            .with_context(|| format!("Failed to load configuration (file: {})", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.auth.uses_static_tokens() && self.firebase.project_id.trim().is_empty() {
            bail!("firebase.project_id is required when no auth.static_tokens are configured");
        }
        if self.auth.bearer_prefix.is_empty() {
            bail!("auth.bearer_prefix must not be empty");
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| {
                format!(
                    "Invalid listen address {}:{}",
                    self.server.host, self.server.port
                )
            })
    }
}
