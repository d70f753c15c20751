use axum::http::{header, HeaderMap};

use super::error::AuthError;

/// Pulls the token out of `Authorization: <prefix><token>`.
///
/// The prefix match is case-sensitive. Only the first space-delimited segment
/// after it counts, so `Bearer abc def` yields `abc`.
pub fn extract_bearer_token<'a>(headers: &'a HeaderMap, prefix: &str) -> Result<&'a str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::MissingHeader)?;

    let rest = value.strip_prefix(prefix).ok_or(AuthError::InvalidScheme)?;

    match rest.split(' ').next() {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MissingToken),
    }
}

pub fn is_jwt_format(token: &str) -> bool {
    let parts: Vec<&str> = token.split('.').collect();
    parts.len() == 3 && parts.iter().all(|p| !p.is_empty())
}
