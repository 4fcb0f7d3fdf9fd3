//! Bearer token inspection.
//!
//! Tokens are JWTs: three `.`-separated segments, the middle one a
//! URL-safe base64 (unpadded) JSON payload carrying an `exp` claim in
//! seconds since the Unix epoch. The signature is never checked here;
//! only the server can do that.

use base64::{Engine, engine::general_purpose};
use serde::Deserialize;

use crate::error::{DriveError, Result};

/// Claims read from a token payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenClaims {
    /// Expiry, Unix seconds. Some issuers emit fractional values.
    pub exp: f64,
    /// Subject (the account email).
    #[serde(default)]
    pub sub: Option<String>,
}

/// Decode URL-safe base64, tolerating padding and the standard alphabet.
fn decode_segment(s: &str) -> Result<Vec<u8>> {
    let normalized = s.trim_end_matches('=').replace('+', "-").replace('/', "_");
    general_purpose::URL_SAFE_NO_PAD
        .decode(normalized)
        .map_err(|e| DriveError::InvalidToken(e.to_string()))
}

/// Decode the payload claims of a token.
pub fn decode_claims(token: &str) -> Result<TokenClaims> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
        return Err(DriveError::InvalidToken(
            "expected three dot-separated segments".to_string(),
        ));
    }
    let payload = decode_segment(parts[1])?;
    serde_json::from_slice(&payload).map_err(|e| DriveError::InvalidToken(e.to_string()))
}

/// True if the token decodes and its expiry is later than `now` (Unix seconds).
pub fn is_token_valid_at(token: &str, now: i64) -> bool {
    decode_claims(token).is_ok_and(|claims| claims.exp > now as f64)
}

/// [`is_token_valid_at`] against the system clock.
pub fn is_token_valid(token: &str) -> bool {
    is_token_valid_at(token, chrono::Utc::now().timestamp())
}

#[cfg(test)]
pub(crate) fn make_token(exp: i64) -> String {
    let header = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = general_purpose::URL_SAFE_NO_PAD
        .encode(format!(r#"{{"sub":"ada@example.com","exp":{}}}"#, exp));
    format!("{}.{}.c2lnbmF0dXJl", header, payload)
}
