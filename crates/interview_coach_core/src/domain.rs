//! crates/interview_coach_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Represents a registered user together with their streak counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: Uuid,
    pub username: String,
    pub streak_count: u32,
    pub longest_streak: u32,
    pub last_interview_time: Option<DateTime<Utc>>,
}

impl User {
    /// The streak-related slice of the user, as consumed by the streak rule.
    pub fn streak(&self) -> StreakState {
        StreakState {
            streak_count: self.streak_count,
            longest_streak: self.longest_streak,
            last_interview_time: self.last_interview_time,
        }
    }
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub username: String,
    pub hashed_password: String,
}

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// A completed, scored interview. Created once per finished interview and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_title: String,
    pub score: u8,
    pub created_at: DateTime<Utc>,
}

/// Streak counters for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreakState {
    pub streak_count: u32,
    pub longest_streak: u32,
    pub last_interview_time: Option<DateTime<Utc>>,
}

/// Progress through the two-question interview protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The first question has been asked and is awaiting an answer.
    Initial,
    /// The follow-up question has been asked and is awaiting an answer.
    Followup,
    /// Feedback and score have been returned. Terminal.
    Done,
}

/// The live state of one mock interview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewSession {
    pub resume_text: String,
    pub job_title: String,
    /// Every question asked so far, in order. Append-only.
    pub previous_questions: Vec<String>,
    pub current_question: String,
    pub first_answer: String,
    pub stage: Stage,
}

impl InterviewSession {
    /// A freshly started session that has asked `first_question`.
    pub fn new(resume_text: String, job_title: String, first_question: String) -> Self {
        Self {
            resume_text,
            job_title,
            previous_questions: vec![first_question.clone()],
            current_question: first_question,
            first_answer: String::new(),
            stage: Stage::Initial,
        }
    }
}
