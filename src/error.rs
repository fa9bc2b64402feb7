use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid configuration: {key} - {reason}")]
    InvalidConfig { key: String, reason: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: String,
}

impl Error {
    pub fn invalid_config(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "INVALID_CONFIG",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidConfig { .. } | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.error_code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Failure to obtain a token for a single link.
///
/// Never fatal to a filter call: the affected link is left as-is and the
/// failure is reported alongside the filtered text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IssueError {
    #[error("Account identifier is not configured")]
    MissingAccountId,

    #[error("Token signing is disabled")]
    Disabled,

    #[error("Token service timed out after {0} ms")]
    Timeout(u64),

    #[error("Token service rejected the request: HTTP {status}")]
    Rejected { status: u16 },

    #[error("Token service unreachable: {0}")]
    Transport(String),

    #[error("Invalid token service response: {0}")]
    InvalidResponse(String),
}

impl IssueError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingAccountId => "MISSING_ACCOUNT_ID",
            Self::Disabled => "SIGNING_DISABLED",
            Self::Timeout(_) => "ISSUER_TIMEOUT",
            Self::Rejected { .. } => "ISSUER_REJECTED",
            Self::Transport(_) => "ISSUER_UNREACHABLE",
            Self::InvalidResponse(_) => "INVALID_ISSUER_RESPONSE",
        }
    }
}

impl From<reqwest::Error> for IssueError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else if let Some(status) = e.status() {
            Self::Rejected {
                status: status.as_u16(),
            }
        } else {
            Self::Transport(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_maps_to_500() {
        let err = Error::invalid_config("STREAM_PLAYER_WIDTH", "not a number");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "INVALID_CONFIG");
        assert!(err.to_string().contains("STREAM_PLAYER_WIDTH"));
    }

    #[test]
    fn test_invalid_request_maps_to_400() {
        let err = Error::InvalidRequest("missing user".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_issue_error_codes_are_stable() {
        assert_eq!(IssueError::MissingAccountId.code(), "MISSING_ACCOUNT_ID");
        assert_eq!(IssueError::Timeout(5000).code(), "ISSUER_TIMEOUT");
        assert_eq!(
            IssueError::Rejected { status: 403 }.to_string(),
            "Token service rejected the request: HTTP 403"
        );
    }
}
