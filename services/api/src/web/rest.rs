//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::error::ApiError;
use crate::extract::extract_upload;
use crate::web::protocol::{
    newest_first, AuthRequest, AuthResponse, BadgeDto, ChatRequest, ChatResponse,
    DashboardResponse, HistoryEntry, SpeakRequest, UploadResponse,
};
use crate::web::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Json},
    Extension,
};
use bytes::Bytes;
use chrono::Utc;
use interview_coach_core::gamification::summarize;
use interview_coach_core::interview::SubmitOutcome;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::OpenApi;
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::register_handler,
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
        upload_handler,
        chat_handler,
        speak_handler,
        career_home_handler,
        history_handler,
    ),
    components(
        schemas(
            AuthRequest,
            AuthResponse,
            UploadResponse,
            ChatRequest,
            ChatResponse,
            SpeakRequest,
            DashboardResponse,
            HistoryEntry,
            BadgeDto
        )
    ),
    tags(
        (name = "Interview Coach API", description = "API endpoints for the mock interview coach.")
    )
)]
pub struct ApiDoc;

/// Multipart field carrying the resume file.
const RESUME_FILE_FIELD: &str = "resume";
/// Multipart field carrying pasted resume text.
const RESUME_TEXT_FIELD: &str = "resume_text";

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Start a new interview from a resume.
///
/// Accepts multipart/form-data with either a `resume` file (.pdf, .docx, .txt)
/// or a `resume_text` field. The file wins when both are present. Any interview
/// already in progress for the user is replaced.
#[utoipa::path(
    post,
    path = "/upload",
    request_body(content_type = "multipart/form-data", description = "The resume to interview against."),
    responses(
        (status = 200, description = "Interview started", body = UploadResponse),
        (status = 400, description = "Invalid file type or no resume text"),
        (status = 401, description = "Authentication required"),
        (status = 500, description = "Resume could not be parsed or the model is unavailable")
    )
)]
pub async fn upload_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    // 1. Collect the file and pasted-text fields
    let mut file: Option<(String, Bytes)> = None;
    let mut pasted: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart data: {}", e)))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            RESUME_FILE_FIELD => {
                let name = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read file bytes: {}", e))
                })?;
                // Browsers send an empty part when no file was chosen.
                if !name.is_empty() {
                    file = Some((name, data));
                }
            }
            RESUME_TEXT_FIELD => {
                let text = field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read resume text: {}", e))
                })?;
                pasted = Some(text);
            }
            _ => {}
        }
    }

    // 2. Extract text from the file, falling back to the pasted text
    let resume_text = match file {
        Some((name, data)) => {
            info!("Extracting uploaded resume '{}' ({} bytes).", name, data.len());
            tokio::task::spawn_blocking(move || extract_upload(&name, &data))
                .await
                .map_err(|e| ApiError::Internal(format!("Extraction task failed: {}", e)))??
        }
        None => pasted.map(|text| text.trim().to_string()).unwrap_or_default(),
    };

    if resume_text.is_empty() {
        return Err(ApiError::NoResumeText);
    }

    // 3. Infer the role and start the interview
    let job_title = app_state.coach.guess_job_title(&resume_text).await?;
    let question_text = app_state
        .coach
        .start(user_id, resume_text.clone(), job_title.clone())
        .await?;

    // 4. Return the first question
    Ok(Json(UploadResponse {
        job_title,
        question_text,
        is_followup: false,
        resume_text,
    }))
}

/// Answer the current interview question.
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Follow-up question, scored result, or completion notice", body = ChatResponse),
        (status = 401, description = "Authentication required"),
        (status = 409, description = "No interview in progress"),
        (status = 500, description = "The model is unavailable")
    )
)]
pub async fn chat_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    // 1. Advance the interview
    let outcome = app_state.coach.submit(user_id, &req.message).await?;

    // 2. Record a scored interview; a storage failure still returns the feedback
    let response = match outcome {
        SubmitOutcome::FollowUp { question } => ChatResponse::follow_up(question),
        SubmitOutcome::Scored(result) => {
            let recorded = match app_state
                .db
                .record_interview(user_id, &result.job_title, result.score.score, Utc::now())
                .await
            {
                Ok(user) => {
                    info!(
                        "Recorded interview for user {}; streak is now {}.",
                        user_id, user.streak_count
                    );
                    true
                }
                Err(e) => {
                    error!("Failed to record interview for user {}: {:?}", user_id, e);
                    false
                }
            };
            ChatResponse::scored(result, recorded)
        }
        SubmitOutcome::AlreadyComplete { message } => ChatResponse::Complete {
            message: message.to_string(),
        },
    };

    Ok(Json(response))
}

/// Read text aloud. Returns MP3 audio.
#[utoipa::path(
    post,
    path = "/speak",
    request_body = SpeakRequest,
    responses(
        (status = 200, description = "MP3 audio (audio/mpeg)"),
        (status = 400, description = "No text provided"),
        (status = 401, description = "Authentication required"),
        (status = 500, description = "Speech service unavailable")
    )
)]
pub async fn speak_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<SpeakRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let text = req
        .text
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ApiError::BadRequest("No text provided".to_string()))?;

    let audio = app_state.tts_adapter.generate_audio(text).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "audio/mpeg"),
            (header::CONTENT_DISPOSITION, "inline"),
        ],
        audio,
    ))
}

/// The signed-in user's career dashboard.
#[utoipa::path(
    get,
    path = "/career_home",
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardResponse),
        (status = 401, description = "Authentication required")
    )
)]
pub async fn career_home_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<DashboardResponse>, ApiError> {
    // 1. Load the user and their history
    let user = app_state.db.get_user(user_id).await?;
    let history = app_state.db.get_interview_history(user_id).await?;

    // 2. Aggregate the dashboard
    let summary = summarize(&user, &history);

    Ok(Json(DashboardResponse::new(user.username, summary, &history)))
}

/// The signed-in user's finished interviews, newest first.
#[utoipa::path(
    get,
    path = "/history",
    responses(
        (status = 200, description = "Interview history", body = Vec<HistoryEntry>),
        (status = 401, description = "Authentication required")
    )
)]
pub async fn history_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let history = app_state.db.get_interview_history(user_id).await?;
    Ok(Json(newest_first(&history)))
}
