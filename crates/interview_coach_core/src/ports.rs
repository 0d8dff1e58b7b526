//! crates/interview_coach_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{AuthSession, InterviewRecord, User, UserCredentials};
use crate::prompts::CompletionRequest;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unauthorized")]
    Unauthorized,
    /// The external service failed, timed out, or returned nothing usable.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- User Management ---
    async fn create_user(&self, username: &str, hashed_password: &str) -> PortResult<User>;

    async fn get_user(&self, user_id: Uuid) -> PortResult<User>;

    async fn get_user_credentials(&self, username: &str) -> PortResult<UserCredentials>;

    async fn list_users(&self) -> PortResult<Vec<User>>;

    // --- Auth Methods ---
    async fn create_auth_session(&self, session: &AuthSession) -> PortResult<()>;

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Interview History ---
    /// Stores a finished interview and advances the user's streak in one unit of work.
    /// Returns the user with updated streak counters.
    async fn record_interview(
        &self,
        user_id: Uuid,
        job_title: &str,
        score: u8,
        completed_at: DateTime<Utc>,
    ) -> PortResult<User>;

    /// All interviews for a user, oldest first.
    async fn get_interview_history(&self, user_id: Uuid) -> PortResult<Vec<InterviewRecord>>;
}

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Sends a single prompt to the hosted text-completion model and returns its reply.
    async fn complete(&self, request: &CompletionRequest) -> PortResult<String>;
}

#[async_trait]
pub trait TextToSpeechService: Send + Sync {
    /// Generates audio data from a string of text.
    async fn generate_audio(&self, text: &str) -> PortResult<Vec<u8>>;
}
