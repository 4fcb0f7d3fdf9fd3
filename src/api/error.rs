//! Normalisation of error responses from the storage API.

use reqwest::{Response, StatusCode};
use serde_json::Value;

use crate::error::DriveError;

/// Build the error for a non-success response, consuming its body.
pub(crate) async fn error_from_response(response: Response) -> DriveError {
    let status = response.status();
    let body = response.bytes().await.ok();
    let message = extract_message(status, body.as_deref());
    classify(status, message)
}

/// Pull a human-readable message out of an error body.
///
/// Prefers `detail`, then `message`, then `HTTP <code>`. Bodies that are not
/// JSON fall back to the status line.
pub fn extract_message(status: StatusCode, body: Option<&[u8]>) -> String {
    let parsed = body.and_then(|b| serde_json::from_slice::<Value>(b).ok());

    let Some(value) = parsed else {
        return format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        )
        .trim_end()
        .to_string();
    };

    field_message(&value, "detail")
        .or_else(|| field_message(&value, "message"))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

// Validation errors carry a structured `detail`; keep it as JSON text.
fn field_message(value: &Value, field: &str) -> Option<String> {
    match value.get(field)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Map a status and message onto the crate error taxonomy.
pub fn classify(status: StatusCode, message: String) -> DriveError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DriveError::Unauthorized {
            status: status.as_u16(),
            message,
        },
        _ => DriveError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_preferred() {
        let body = br#"{"detail": "File not found", "message": "ignored"}"#;
        assert_eq!(
            extract_message(StatusCode::NOT_FOUND, Some(body)),
            "File not found"
        );
    }

    #[test]
    fn test_message_fallback() {
        let body = br#"{"message": "Quota exceeded"}"#;
        assert_eq!(
            extract_message(StatusCode::BAD_REQUEST, Some(body)),
            "Quota exceeded"
        );
    }

    #[test]
    fn test_json_without_fields() {
        let body = br#"{"error": true}"#;
        assert_eq!(
            extract_message(StatusCode::INTERNAL_SERVER_ERROR, Some(body)),
            "HTTP 500"
        );
    }

    #[test]
    fn test_structured_detail() {
        let body = br#"{"detail": [{"loc": ["body", "email"], "msg": "invalid"}]}"#;
        let message = extract_message(StatusCode::UNPROCESSABLE_ENTITY, Some(body));
        assert!(message.starts_with('['));
        assert!(message.contains("invalid"));
    }

    #[test]
    fn test_non_json_body() {
        assert_eq!(
            extract_message(StatusCode::BAD_GATEWAY, Some(b"<html>oops</html>")),
            "HTTP 502: Bad Gateway"
        );
        assert_eq!(
            extract_message(StatusCode::SERVICE_UNAVAILABLE, None),
            "HTTP 503: Service Unavailable"
        );
    }

    #[test]
    fn test_classification() {
        assert!(classify(StatusCode::UNAUTHORIZED, "x".into()).is_auth_failure());
        assert!(classify(StatusCode::FORBIDDEN, "x".into()).is_auth_failure());
        assert!(!classify(StatusCode::NOT_FOUND, "x".into()).is_auth_failure());
        assert!(!classify(StatusCode::BAD_REQUEST, "x".into()).is_auth_failure());
    }
}
