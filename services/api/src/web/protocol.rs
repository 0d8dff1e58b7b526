//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the browser client and the API server.
//! Core types stay free of serde; they are mapped into these structs here.

use chrono::{DateTime, Utc};
use interview_coach_core::domain::InterviewRecord;
use interview_coach_core::gamification::{Badge, CareerSummary};
use interview_coach_core::interview::InterviewResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Format used for the dashboard chart labels.
pub const CHART_LABEL_FORMAT: &str = "%Y-%m-%d %H:%M";

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct AuthRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// One answer from the candidate.
#[derive(Deserialize, ToSchema)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SpeakRequest {
    pub text: Option<String>,
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub username: String,
}

/// Sent once a resume has been read and the first question generated.
#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    pub job_title: String,
    pub question_text: String,
    pub is_followup: bool,
    pub resume_text: String,
}

/// The reply to a chat message, tagged by `type`.
#[derive(Serialize, ToSchema, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatResponse {
    /// The first answer was accepted; here is the follow-up question.
    FollowUp {
        question_text: String,
        is_followup: bool,
    },
    /// Both answers were evaluated.
    Scored {
        feedback: String,
        score: u8,
        score_parsed: bool,
        breakdown: String,
        job_title: String,
        /// Whether the result made it into the interview history.
        recorded: bool,
    },
    /// The interview was already finished.
    Complete { message: String },
}

impl ChatResponse {
    pub fn follow_up(question_text: String) -> Self {
        Self::FollowUp {
            question_text,
            is_followup: true,
        }
    }

    pub fn scored(result: InterviewResult, recorded: bool) -> Self {
        Self::Scored {
            feedback: result.feedback,
            score: result.score.score,
            score_parsed: result.score.parsed,
            breakdown: result.score.breakdown,
            job_title: result.job_title,
            recorded,
        }
    }
}

#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct HistoryEntry {
    pub job_title: String,
    pub score: u8,
    pub timestamp: DateTime<Utc>,
}

impl From<&InterviewRecord> for HistoryEntry {
    fn from(record: &InterviewRecord) -> Self {
        Self {
            job_title: record.job_title.clone(),
            score: record.score,
            timestamp: record.created_at,
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
pub struct BadgeDto {
    pub name: String,
    pub icon: String,
    pub earned: bool,
}

impl From<Badge> for BadgeDto {
    fn from(badge: Badge) -> Self {
        Self {
            name: badge.name,
            icon: badge.icon.to_string(),
            earned: badge.earned,
        }
    }
}

/// Everything the career dashboard shows.
#[derive(Serialize, ToSchema, Debug)]
pub struct DashboardResponse {
    pub username: String,
    pub total_interviews: usize,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub highest_score: u8,
    /// Newest first.
    pub history: Vec<HistoryEntry>,
    /// Oldest first, aligned with `chart_scores`.
    pub chart_labels: Vec<String>,
    pub chart_scores: Vec<u8>,
    pub badges: Vec<BadgeDto>,
}

impl DashboardResponse {
    /// `history` must be ordered oldest first.
    pub fn new(username: String, summary: CareerSummary, history: &[InterviewRecord]) -> Self {
        let chart_labels = history
            .iter()
            .map(|record| record.created_at.format(CHART_LABEL_FORMAT).to_string())
            .collect();
        let chart_scores = history.iter().map(|record| record.score).collect();

        Self {
            username,
            total_interviews: summary.total_interviews,
            current_streak: summary.current_streak,
            longest_streak: summary.longest_streak,
            highest_score: summary.highest_score,
            history: newest_first(history),
            chart_labels,
            chart_scores,
            badges: summary.badges.into_iter().map(BadgeDto::from).collect(),
        }
    }
}

pub fn newest_first(history: &[InterviewRecord]) -> Vec<HistoryEntry> {
    history.iter().rev().map(HistoryEntry::from).collect()
}
