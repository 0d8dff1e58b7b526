//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and how each
//! variant is rendered to HTTP clients.

use crate::config::ConfigError;
use crate::extract::ExtractError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use interview_coach_core::{interview::InterviewError, ports::PortError};
use serde_json::json;
use tracing::{error, warn};

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents an error from the interview state machine.
    #[error("Interview error: {0}")]
    Interview(#[from] InterviewError),

    /// Represents a failure to turn an uploaded resume into text.
    #[error("Resume extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents an error while running the embedded database migrations.
    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The upload carried neither a usable file nor pasted text.
    #[error("No resume text found")]
    NoResumeText,

    /// The request was malformed.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Authentication required")]
    Unauthorized,

    /// A login attempt with an unknown username or a wrong password.
    #[error("{0}")]
    BadCredentials(String),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl ApiError {
    fn status_code_and_message(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Extract(ExtractError::UnsupportedFormat(_)) => (
                StatusCode::BAD_REQUEST,
                "INVALID_FILE_TYPE",
                "Invalid file type".to_string(),
            ),
            ApiError::Extract(e) => {
                warn!("Resume extraction failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXTRACTION_FAILED",
                    "Failed to parse resume".to_string(),
                )
            }
            ApiError::NoResumeText => (
                StatusCode::BAD_REQUEST,
                "NO_RESUME_TEXT",
                "No resume text found".to_string(),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::Unauthorized | ApiError::Port(PortError::Unauthorized) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            ApiError::BadCredentials(msg) => {
                (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS", msg.clone())
            }
            ApiError::Port(PortError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "CONFLICT", msg.clone())
            }
            ApiError::Port(PortError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone())
            }
            ApiError::Interview(InterviewError::NoActiveSession) => (
                StatusCode::CONFLICT,
                "NO_ACTIVE_SESSION",
                "No interview in progress. Upload a resume to start one.".to_string(),
            ),
            ApiError::Interview(InterviewError::CompletionUnavailable(e)) => {
                error!("Completion service failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "COMPLETION_UNAVAILABLE",
                    "The interview assistant is unavailable right now. Please try again."
                        .to_string(),
                )
            }
            other => {
                error!("Internal error: {:?}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.status_code_and_message();
        let body = Json(json!({
            "error": message,
            "code": code,
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_unsupported_format_is_a_400() {
        let (status, body) =
            render(ExtractError::UnsupportedFormat("exe".to_string()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid file type");
    }

    #[tokio::test]
    async fn test_no_resume_text_is_a_400() {
        let (status, body) = render(ApiError::NoResumeText).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No resume text found");
        assert_eq!(body["code"], "NO_RESUME_TEXT");
    }

    #[tokio::test]
    async fn test_completion_failure_does_not_leak_provider_text() {
        let err: ApiError = InterviewError::CompletionUnavailable(PortError::Unavailable(
            "invalid_api_key sk-secret".to_string(),
        ))
        .into();
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body["error"].as_str().unwrap().contains("sk-secret"));
    }

    #[tokio::test]
    async fn test_no_active_session_is_a_conflict() {
        let (status, body) = render(InterviewError::NoActiveSession.into()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "NO_ACTIVE_SESSION");
    }

    #[tokio::test]
    async fn test_internal_errors_are_generic() {
        let (status, body) = render(ApiError::Internal("disk on fire".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "An internal server error occurred");
    }
}
