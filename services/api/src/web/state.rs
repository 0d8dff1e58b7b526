//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use interview_coach_core::interview::InterviewCoach;
use interview_coach_core::ports::{DatabaseService, TextToSpeechService};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub config: Arc<Config>,
    /// Live interviews, one per signed-in user.
    pub coach: Arc<InterviewCoach>,
    pub tts_adapter: Arc<dyn TextToSpeechService>,
}
