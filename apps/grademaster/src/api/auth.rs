//! # Authentication Module
//!
//! HTTP Basic authentication against the gradebook's account list.
//!
//! ## Usage
//!
//! ```text
//! Authorization: Basic base64(username:password)
//! ```
//!
//! On success the matching account is attached to the request as a
//! [`CurrentUser`] extension for the handlers to act as.

use super::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use grademaster_core::User;
use subtle::ConstantTimeEq;

/// The authenticated account for the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

// =============================================================================
// CREDENTIAL PARSING
// =============================================================================

/// Decode a `Basic` Authorization header into (username, password).
pub fn parse_basic_auth(header_value: &str) -> Option<(String, String)> {
    let encoded = header_value
        .strip_prefix("Basic ")
        .or_else(|| header_value.strip_prefix("basic "))?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let text = String::from_utf8(decoded).ok()?;
    let (username, password) = text.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Encode credentials as a `Basic` Authorization header value.
pub fn basic_auth_header(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

/// Constant-time string comparison.
///
/// Both sides are padded to the same length so the comparison always runs
/// over the same number of bytes.
fn constant_time_eq(provided: &str, expected: &str) -> bool {
    let provided_bytes = provided.as_bytes();
    let expected_bytes = expected.as_bytes();

    let max_len = provided_bytes.len().max(expected_bytes.len());
    let mut padded_provided = vec![0u8; max_len];
    let mut padded_expected = vec![0u8; max_len];
    padded_provided[..provided_bytes.len()].copy_from_slice(provided_bytes);
    padded_expected[..expected_bytes.len()].copy_from_slice(expected_bytes);

    let bytes_match: bool = padded_provided.ct_eq(&padded_expected).into();
    bytes_match && provided_bytes.len() == expected_bytes.len()
}

// =============================================================================
// MIDDLEWARE
// =============================================================================

/// Basic authentication middleware for the gradebook routes.
pub async fn basic_auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    let credentials = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_basic_auth);

    let Some((username, password)) = credentials else {
        tracing::warn!(
            event = "auth_failure",
            reason = "missing_credentials",
            "Missing or malformed Authorization header"
        );
        return Err((StatusCode::UNAUTHORIZED, "Unauthorized"));
    };

    let user = {
        let book = state.gradebook.read().await;
        book.login_with(&username, &password, constant_time_eq)
    };

    match user {
        Ok(user) => {
            tracing::debug!(user = %user.username, role = %user.role, "Authenticated");
            request.extensions_mut().insert(CurrentUser(user));
            Ok(next.run(request).await)
        }
        Err(_) => {
            tracing::warn!(
                event = "auth_failure",
                reason = "invalid_credentials",
                "Authentication failed for '{}'",
                username
            );
            Err((StatusCode::UNAUTHORIZED, "Unauthorized"))
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trips() {
        let header = basic_auth_header("teacher", "pa:ss");
        assert_eq!(
            parse_basic_auth(&header),
            Some(("teacher".to_string(), "pa:ss".to_string()))
        );
    }

    #[test]
    fn bearer_is_not_basic() {
        assert_eq!(parse_basic_auth("Bearer abc"), None);
        assert_eq!(parse_basic_auth("Basic !!!"), None);
    }

    #[test]
    fn constant_time_eq_checks_length() {
        assert!(constant_time_eq("password", "password"));
        assert!(!constant_time_eq("password", "password1"));
        assert!(!constant_time_eq("", "x"));
    }
}
