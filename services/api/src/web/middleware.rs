//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use interview_coach_core::ports::PortError;
use std::sync::Arc;
use tracing::{debug, error};

use crate::error::ApiError;
use crate::web::auth::session_id_from_headers;
use crate::web::state::AppState;

/// Middleware that validates the auth session cookie and extracts the user_id.
///
/// If valid, inserts the user_id into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_session_id = session_id_from_headers(req.headers())
        .ok_or(ApiError::Unauthorized)?
        .to_string();

    let user_id = state
        .db
        .validate_auth_session(&auth_session_id)
        .await
        .map_err(|e| {
            match e {
                PortError::Unauthorized | PortError::NotFound(_) => {
                    debug!("Rejected auth session: {}", e)
                }
                _ => error!("Failed to validate auth session: {:?}", e),
            }
            ApiError::Unauthorized
        })?;

    req.extensions_mut().insert(user_id);
    Ok(next.run(req).await)
}
