//! Error taxonomy for backend calls.
//!
//! Every failed request is converted into an [`ApiError`] at the call site.
//! The backend answers errors with a FastAPI-style body,
//! `{"detail": "..."}` or `{"detail": [{"loc": [...], "msg": "..."}]}`;
//! only the `detail` content is kept, never the raw body.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing field. `field` is empty when the backend did not
    /// name one; `message` already names every offending field.
    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    /// Expired or invalid session (HTTP 401/403).
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// No response was received.
    #[error("network error: {0}")]
    Network(String),

    /// A local precondition failed before any request was issued.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to decode response from {path}: {message}")]
    Decode { path: String, message: String },
}

impl ApiError {
    /// Build an error from a non-success status and the response body text.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let detail = parse_detail(body);
        match status.as_u16() {
            400 | 422 => {
                let (field, message) = detail
                    .unwrap_or_else(|| (String::new(), "invalid request".to_owned()));
                Self::Validation { field, message }
            }
            401 | 403 => Self::Auth(
                detail
                    .map(|(_, m)| m)
                    .unwrap_or_else(|| "session expired".to_owned()),
            ),
            404 => Self::NotFound(
                detail
                    .map(|(_, m)| m)
                    .unwrap_or_else(|| "resource not found".to_owned()),
            ),
            409 => Self::Conflict(
                detail
                    .map(|(_, m)| m)
                    .unwrap_or_else(|| "conflicting change".to_owned()),
            ),
            code => Self::Server {
                status: code,
                message: detail
                    .map(|(_, m)| m)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_owned()),
            },
        }
    }

    /// True for errors that invalidate the current session.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// True for errors where repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Server { .. } | Self::Network(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            let path = err
                .url()
                .map(|u| u.path().to_owned())
                .unwrap_or_default();
            Self::Decode {
                path,
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::from_status(status, "")
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Extract `(field, message)` from a FastAPI error body.
///
/// A list of validation items is flattened into `field: msg` pairs joined by
/// `", "`; the field of the first item is reported as the offending field.
fn parse_detail(body: &str) -> Option<(String, String)> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) => Some((String::new(), s.clone())),
        Value::Array(items) => {
            let mut first_field = None;
            let parts: Vec<String> = items
                .iter()
                .map(|item| {
                    let msg = item
                        .get("msg")
                        .and_then(Value::as_str)
                        .map(str::to_owned)
                        .unwrap_or_else(|| item.to_string());
                    let field = item
                        .get("loc")
                        .and_then(Value::as_array)
                        .and_then(|loc| loc.last())
                        .map(|f| match f {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        });
                    match field {
                        Some(f) => {
                            first_field.get_or_insert_with(|| f.clone());
                            format!("{f}: {msg}")
                        }
                        None => msg,
                    }
                })
                .collect();
            if parts.is_empty() {
                return None;
            }
            Some((first_field.unwrap_or_default(), parts.join(", ")))
        }
        Value::Object(obj) => obj
            .get("msg")
            .or_else(|| obj.get("message"))
            .and_then(Value::as_str)
            .map(|m| (String::new(), m.to_owned())),
        other => Some((String::new(), other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_becomes_message() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, r#"{"detail":"Rutina not found"}"#);
        match err {
            ApiError::NotFound(msg) => assert_eq!(msg, "Rutina not found"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn validation_list_is_flattened() {
        let body = r#"{"detail":[
            {"loc":["body","altura"],"msg":"field required","type":"value_error.missing"},
            {"loc":["body","email"],"msg":"invalid email","type":"value_error"}
        ]}"#;
        let err = ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, body);
        match &err {
            ApiError::Validation { field, message } => {
                assert_eq!(field, "altura");
                assert_eq!(message, "altura: field required, email: invalid email");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
        assert_eq!(err.to_string(), "altura: field required, email: invalid email");
    }

    #[test]
    fn unauthorized_maps_to_auth() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, "");
        assert!(err.is_auth());
        assert_eq!(err.to_string(), "authentication failed: session expired");
    }

    #[test]
    fn server_error_keeps_status() {
        let err = ApiError::from_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"detail":"Error copying exercises"}"#,
        );
        match &err {
            ApiError::Server { status, message } => {
                assert_eq!(*status, 500);
                assert_eq!(message, "Error copying exercises");
            }
            other => panic!("expected Server, got {other:?}"),
        }
        assert!(err.is_retryable());
    }

    #[test]
    fn non_json_body_falls_back_to_reason() {
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(err.to_string(), "server error (502): Bad Gateway");
    }

    #[test]
    fn conflict_status() {
        let err = ApiError::from_status(StatusCode::CONFLICT, r#"{"detail":"already exists"}"#);
        assert!(matches!(err, ApiError::Conflict(ref m) if m == "already exists"));
        assert!(!err.is_retryable());
    }
}
