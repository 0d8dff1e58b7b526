pub mod domain;
pub mod gamification;
pub mod interview;
pub mod ports;
pub mod prompts;
pub mod scoring;

pub use domain::{
    AuthSession, InterviewRecord, InterviewSession, Stage, StreakState, User, UserCredentials,
};
pub use interview::{InterviewCoach, InterviewError, InterviewResult, SubmitOutcome};
pub use ports::{CompletionService, DatabaseService, PortError, PortResult, TextToSpeechService};
pub use prompts::{CompletionRequest, PromptTask};
pub use scoring::{parse_score, ScoreReport};
