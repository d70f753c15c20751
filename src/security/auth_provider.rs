use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

use crate::core::shared::enums::{ClosedEnum, UserRole};
use crate::security::auth_api::{is_jwt_format, AuthConfig, AuthError, Claims, FirebaseConfig};

/// Clock skew tolerated on `exp`, `iat` and `auth_time`.
const CLOCK_SKEW_SECS: u64 = 60;

/// Identity boundary: turns an opaque bearer token into claims.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    fn name(&self) -> &str;
    async fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}

// ============================================================================
// Firebase ID tokens
// ============================================================================

/// Verifies Firebase ID tokens against Google's published signing keys.
///
/// The key set is fetched on every call; there is no cache.
pub struct FirebaseTokenVerifier {
    client: reqwest::Client,
    config: FirebaseConfig,
}

#[derive(Debug, Deserialize)]
struct FirebasePayload {
    #[serde(default)]
    sub: String,
    email: Option<String>,
    email_verified: Option<bool>,
    name: Option<String>,
    role: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl FirebasePayload {
    /// `iat` must be present and `auth_time` is optional; neither may lie in
    /// the future.
    fn check_timestamps(&self, now: i64) -> Result<(), AuthError> {
        check_not_after(&self.extra, "iat", true, now)?;
        check_not_after(&self.extra, "auth_time", false, now)
    }

    fn into_claims(self) -> Claims {
        let role = match self.role {
            Some(Value::String(raw)) => {
                let parsed = UserRole::parse(&raw);
                if parsed.is_none() {
                    debug!("Ignoring unrecognised role claim '{raw}'");
                }
                parsed
            }
            _ => None,
        };

        Claims {
            uid: self.sub,
            email: self.email,
            email_verified: self.email_verified,
            name: self.name,
            role,
            extra: self.extra,
        }
    }
}

fn check_not_after(
    claims: &Map<String, Value>,
    claim: &str,
    required: bool,
    now: i64,
) -> Result<(), AuthError> {
    let Some(value) = claims.get(claim) else {
        return if required {
            Err(AuthError::verification(format!("missing {claim}")))
        } else {
            Ok(())
        };
    };
    let at = value
        .as_i64()
        .ok_or_else(|| AuthError::verification(format!("{claim} is not a timestamp")))?;
    if at > now.saturating_add(CLOCK_SKEW_SECS as i64) {
        return Err(AuthError::verification(format!("{claim} is in the future")));
    }
    Ok(())
}

impl FirebaseTokenVerifier {
    pub fn new(config: FirebaseConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client for key fetches")?;
        info!("Firebase verifier for project '{}'", config.project_id);
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FirebaseConfig {
        &self.config
    }

    async fn fetch_keys(&self) -> Result<JwkSet, AuthError> {
        let response = self
            .client
            .get(&self.config.jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::verification(format!("key fetch failed: {e}")))?
            .error_for_status()
            .map_err(|e| AuthError::verification(format!("key fetch failed: {e}")))?;

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthError::verification(format!("malformed key set: {e}")))
    }
}

#[async_trait]
impl TokenVerifier for FirebaseTokenVerifier {
    fn name(&self) -> &str {
        "firebase"
    }

    async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        if !is_jwt_format(token) {
            return Err(AuthError::verification("not a JWT"));
        }
        let header = decode_header(token)
            .map_err(|e| AuthError::verification(format!("malformed header: {e}")))?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::verification(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| AuthError::verification("header has no kid"))?;

        let keys = self.fetch_keys().await?;
        let jwk = keys
            .find(&kid)
            .ok_or_else(|| AuthError::verification(format!("no signing key '{kid}'")))?;
        let key = DecodingKey::from_jwk(jwk)
            .map_err(|e| AuthError::verification(format!("unusable signing key: {e}")))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.config.project_id]);
        validation.set_issuer(&[self.config.issuer()]);
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);
        validation.leeway = CLOCK_SKEW_SECS;

        let data = decode::<FirebasePayload>(token, &key, &validation)
            .map_err(AuthError::verification)?;

        if data.claims.sub.is_empty() {
            return Err(AuthError::verification("empty subject"));
        }
        data.claims.check_timestamps(Utc::now().timestamp())?;

        Ok(data.claims.into_claims())
    }
}

// ============================================================================
// Static tokens
// ============================================================================

/// Fixed token table for local development and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, Claims>,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            tokens: config.static_tokens.clone(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>, claims: Claims) -> Self {
        self.tokens.insert(token.into(), claims);
        self
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    fn name(&self) -> &str {
        "static"
    }

    async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| AuthError::verification("unknown static token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_static_verifier() {
        let verifier = StaticTokenVerifier::new()
            .with_token("t-1", Claims::new("u1").with_role(UserRole::Fc));
        assert_eq!(verifier.len(), 1);

        let claims = verifier.verify("t-1").await.unwrap();
        assert_eq!(claims.uid, "u1");
        assert_eq!(claims.role, Some(UserRole::Fc));

        assert!(matches!(
            verifier.verify("t-2").await,
            Err(AuthError::VerificationFailed(_))
        ));
    }

    #[test]
    fn test_static_verifier_from_config() {
        let config = AuthConfig::new().with_static_token("dev", Claims::new("dev-user"));
        let verifier = StaticTokenVerifier::from_config(&config);
        assert!(!verifier.is_empty());
    }

    #[test]
    fn test_payload_mapping() {
        let payload: FirebasePayload = serde_json::from_value(json!({
            "sub": "abc",
            "email": "a@example.com",
            "email_verified": true,
            "role": "coord",
            "iss": "https://securetoken.google.com/p",
            "firebase": { "sign_in_provider": "password" }
        }))
        .unwrap();

        let claims = payload.into_claims();
        assert_eq!(claims.uid, "abc");
        assert_eq!(claims.role, Some(UserRole::Coord));
        assert_eq!(claims.email_verified, Some(true));
        assert_eq!(claims.claim("iss"), Some(&json!("https://securetoken.google.com/p")));
        assert!(claims.claim("firebase").is_some());
    }

    #[test]
    fn test_unknown_role_claim_is_dropped() {
        let payload: FirebasePayload =
            serde_json::from_value(json!({ "sub": "abc", "role": "ADMIN" })).unwrap();
        assert_eq!(payload.into_claims().role, None);

        let payload: FirebasePayload =
            serde_json::from_value(json!({ "sub": "abc", "role": 7 })).unwrap();
        assert_eq!(payload.into_claims().role, None);
    }

    #[test]
    fn test_timestamps_must_not_be_in_the_future() {
        let now = 1_700_000_000;
        let payload = |extra: Value| -> FirebasePayload {
            let mut value = json!({ "sub": "abc" });
            if let (Some(obj), Value::Object(extra)) = (value.as_object_mut(), extra) {
                obj.extend(extra);
            }
            serde_json::from_value(value).unwrap()
        };

        assert!(payload(json!({ "iat": now })).check_timestamps(now).is_ok());
        assert!(payload(json!({ "iat": now + 30, "auth_time": now + 30 }))
            .check_timestamps(now)
            .is_ok());
        assert!(payload(json!({ "iat": now, "auth_time": now - 10 }))
            .check_timestamps(now)
            .is_ok());

        assert!(payload(json!({})).check_timestamps(now).is_err());
        assert!(payload(json!({ "iat": now + 3600 })).check_timestamps(now).is_err());
        assert!(payload(json!({ "iat": now, "auth_time": now + 3600 }))
            .check_timestamps(now)
            .is_err());
        assert!(payload(json!({ "iat": "yesterday" })).check_timestamps(now).is_err());
    }

    #[tokio::test]
    async fn test_firebase_rejects_garbage_before_fetching() {
        let verifier = FirebaseTokenVerifier::new(
            FirebaseConfig::new("demo").with_jwks_url("http://127.0.0.1:9/keys"),
        )
        .unwrap();
        assert!(matches!(
            verifier.verify("not-a-jwt").await,
            Err(AuthError::VerificationFailed(_))
        ));
        assert!(matches!(
            verifier.verify("a..c").await,
            Err(AuthError::VerificationFailed(_))
        ));
    }
}
