//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for user registration, login, and logout.

use crate::error::ApiError;
use crate::web::protocol::{AuthRequest, AuthResponse};
use crate::web::state::AppState;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Utc};
use interview_coach_core::domain::AuthSession;
use interview_coach_core::ports::PortError;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Name of the cookie carrying the auth session id.
pub const SESSION_COOKIE: &str = "session";
const SESSION_DAYS: i64 = 30;
const INVALID_CREDENTIALS: &str = "Invalid username or password";

//=========================================================================================
// Helpers
//=========================================================================================

/// Pulls the auth session id out of the `Cookie` header, if present.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())?
        .split(';')
        .find_map(|c| {
            c.trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .filter(|id| !id.is_empty())
}

/// Creates a 30-day auth session for the user and returns its `Set-Cookie` value.
async fn open_auth_session(state: &AppState, user_id: Uuid) -> Result<String, ApiError> {
    let session = AuthSession {
        id: Uuid::new_v4().to_string(),
        user_id,
        expires_at: Utc::now() + Duration::days(SESSION_DAYS),
    };
    state.db.create_auth_session(&session).await?;

    Ok(format!(
        "{}={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE,
        session.id,
        Duration::days(SESSION_DAYS).num_seconds()
    ))
}

fn validate(req: &AuthRequest) -> Result<(), ApiError> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }
    Ok(())
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/register - Create a new user account
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = AuthRequest,
    responses(
        (status = 201, description = "User created successfully", body = AuthResponse),
        (status = 400, description = "Missing username or password"),
        (status = 409, description = "Username already exists"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AuthRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // 1. Validate the submitted fields
    validate(&req)?;
    let username = req.username.trim();

    // 2. Hash the password
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            ApiError::Internal("Failed to hash password".to_string())
        })?
        .to_string();

    // 3. Create user in database
    let user = state.db.create_user(username, &password_hash).await?;

    // 4. Open an auth session and build its cookie
    let cookie = open_auth_session(&state, user.user_id).await?;
    info!("Registered user '{}'.", user.username);

    // 5. Return response with cookie
    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            user_id: user.user_id,
            username: user.username,
        }),
    ))
}

/// POST /auth/login - Login with existing account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AuthRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // 1. Validate the submitted fields
    validate(&req)?;

    // 2. Get user by username
    let creds = match state.db.get_user_credentials(req.username.trim()).await {
        Ok(creds) => creds,
        Err(PortError::NotFound(_)) => {
            return Err(ApiError::BadCredentials(INVALID_CREDENTIALS.to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    // 3. Verify password
    let parsed_hash = PasswordHash::new(&creds.hashed_password).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        ApiError::Internal("Authentication error".to_string())
    })?;

    let valid = Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .is_ok();
    if !valid {
        return Err(ApiError::BadCredentials(INVALID_CREDENTIALS.to_string()));
    }

    // 4. Open an auth session and build its cookie
    let cookie = open_auth_session(&state, creds.user_id).await?;

    // 5. Return response with cookie
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            user_id: creds.user_id,
            username: creds.username,
        }),
    ))
}

/// POST /auth/logout - Logout and invalidate session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 401, description = "No active session")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    // 1. Parse session ID from cookie
    let auth_session_id = session_id_from_headers(&headers).ok_or(ApiError::Unauthorized)?;

    // 2. Delete auth session from database
    state.db.delete_auth_session(auth_session_id).await?;

    // 3. Clear cookie
    let cookie = format!(
        "{}=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0",
        SESSION_COOKIE
    );
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_session_cookie_is_found_among_others() {
        let h = headers("theme=dark; session=abc-123; lang=en");
        assert_eq!(session_id_from_headers(&h), Some("abc-123"));
    }

    #[test]
    fn test_similarly_named_cookies_are_ignored() {
        assert_eq!(session_id_from_headers(&headers("session_hint=x")), None);
        assert_eq!(session_id_from_headers(&headers("session=")), None);
        assert_eq!(session_id_from_headers(&HeaderMap::new()), None);
    }
}
