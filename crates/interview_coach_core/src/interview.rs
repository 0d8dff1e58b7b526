//! crates/interview_coach_core/src/interview.rs
//!
//! The interview session state machine.
//!
//! Each session moves `Initial -> Followup -> Done` and never backwards. Sessions
//! are stored per caller-supplied id; every session has its own lock so that two
//! messages for the same id are handled one after the other, while different ids
//! never wait on each other.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{InterviewSession, Stage};
use crate::ports::{CompletionService, PortError};
use crate::prompts;
use crate::scoring::{parse_score, ScoreReport};

/// Returned for any message received after the interview has been scored.
pub const COMPLETION_NOTICE: &str =
    "The interview is complete. Upload a new resume to start a new interview.";

#[derive(Debug, thiserror::Error)]
pub enum InterviewError {
    #[error("No interview session has been started")]
    NoActiveSession,
    #[error("Completion service unavailable: {0}")]
    CompletionUnavailable(#[from] PortError),
}

/// What a call to [`InterviewCoach::submit`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The first answer was accepted and a follow-up question was generated.
    FollowUp { question: String },
    /// Both answers were evaluated. The caller should persist the result once.
    Scored(InterviewResult),
    /// The interview was already finished; nothing changed.
    AlreadyComplete { message: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewResult {
    pub job_title: String,
    pub feedback: String,
    pub score: ScoreReport,
}

type SessionSlot = Arc<Mutex<InterviewSession>>;

/// Owns every live interview and drives them through their stages.
pub struct InterviewCoach {
    completion: Arc<dyn CompletionService>,
    sessions: Mutex<HashMap<Uuid, SessionSlot>>,
}

impl InterviewCoach {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self {
            completion,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Asks the model for the single most likely job title for a resume.
    pub async fn guess_job_title(&self, resume_text: &str) -> Result<String, InterviewError> {
        let request = prompts::guess_job_title(resume_text);
        Ok(self.complete(&request).await?)
    }

    /// Starts (or restarts) the interview for `session_id` and returns the first question.
    pub async fn start(
        &self,
        session_id: Uuid,
        resume_text: String,
        job_title: String,
    ) -> Result<String, InterviewError> {
        let request = prompts::ask_interview_question(&resume_text, &job_title, &[]);
        let first_question = self.complete(&request).await?;

        let session = InterviewSession::new(resume_text, job_title, first_question.clone());
        self.sessions
            .lock()
            .await
            .insert(session_id, Arc::new(Mutex::new(session)));

        info!("Interview started for session {}.", session_id);
        Ok(first_question)
    }

    /// Feeds one user message into the session and advances its stage.
    pub async fn submit(
        &self,
        session_id: Uuid,
        message: &str,
    ) -> Result<SubmitOutcome, InterviewError> {
        let slot = self
            .sessions
            .lock()
            .await
            .get(&session_id)
            .cloned()
            .ok_or(InterviewError::NoActiveSession)?;

        // Held for the whole turn so two messages for one session cannot interleave.
        let mut session = slot.lock().await;
        let stage = session.stage;

        match stage {
            Stage::Initial => {
                let request = prompts::ask_interview_question(
                    &session.resume_text,
                    &session.job_title,
                    &session.previous_questions,
                );
                let follow_up = self.complete(&request).await?;

                session.first_answer = message.to_string();
                session.previous_questions.push(follow_up.clone());
                session.current_question = follow_up.clone();
                session.stage = Stage::Followup;

                info!("Session {} moved to follow-up.", session_id);
                Ok(SubmitOutcome::FollowUp {
                    question: follow_up,
                })
            }
            Stage::Followup => {
                let answer = format!("{}\n\n{}", session.first_answer, message);
                let questions = session.previous_questions.join("\n");

                let feedback_request = prompts::get_feedback(
                    &questions,
                    &answer,
                    &session.resume_text,
                    &session.job_title,
                );
                let feedback = self.complete(&feedback_request).await?;

                let score_request = prompts::score_answer(
                    &questions,
                    &answer,
                    &session.resume_text,
                    &session.job_title,
                );
                let score = parse_score(&self.complete(&score_request).await?);

                session.stage = Stage::Done;
                // A finished session only answers with the completion notice.
                session.resume_text = String::new();
                session.first_answer = String::new();

                info!(
                    "Session {} scored {} (parsed: {}).",
                    session_id, score.score, score.parsed
                );
                Ok(SubmitOutcome::Scored(InterviewResult {
                    job_title: session.job_title.clone(),
                    feedback,
                    score,
                }))
            }
            Stage::Done => Ok(SubmitOutcome::AlreadyComplete {
                message: COMPLETION_NOTICE,
            }),
        }
    }

    /// A snapshot of the session, if one exists.
    pub async fn session(&self, session_id: Uuid) -> Option<InterviewSession> {
        let slot = self.sessions.lock().await.get(&session_id).cloned()?;
        let session = slot.lock().await;
        Some(session.clone())
    }

    async fn complete(&self, request: &prompts::CompletionRequest) -> Result<String, PortError> {
        let started = Instant::now();
        let reply = self.completion.complete(request).await?;
        debug!("{:?} completion took {:?}", request.task, started.elapsed());
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PortResult;
    use crate::prompts::{CompletionRequest, PromptTask};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    /// Replies according to the task and records every request it sees.
    struct ScriptedCompletion {
        score_reply: String,
        questions_asked: AtomicUsize,
        requests: StdMutex<Vec<CompletionRequest>>,
        fail_on: Option<PromptTask>,
        delay: Duration,
    }

    impl ScriptedCompletion {
        fn new(score_reply: &str) -> Self {
            Self {
                score_reply: score_reply.to_string(),
                questions_asked: AtomicUsize::new(0),
                requests: StdMutex::new(Vec::new()),
                fail_on: None,
                delay: Duration::ZERO,
            }
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionService for ScriptedCompletion {
        async fn complete(&self, request: &CompletionRequest) -> PortResult<String> {
            self.requests.lock().unwrap().push(request.clone());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail_on == Some(request.task) {
                return Err(PortError::Unavailable("timed out".to_string()));
            }
            Ok(match request.task {
                PromptTask::JobTitle => "Backend Engineer".to_string(),
                PromptTask::Question => {
                    let n = self.questions_asked.fetch_add(1, Ordering::SeqCst) + 1;
                    format!("Question {n}?")
                }
                PromptTask::Feedback => "- Be more specific.".to_string(),
                PromptTask::Score => self.score_reply.clone(),
            })
        }
    }

    fn coach(completion: ScriptedCompletion) -> (InterviewCoach, Arc<ScriptedCompletion>) {
        let completion = Arc::new(completion);
        (InterviewCoach::new(completion.clone()), completion)
    }

    #[tokio::test]
    async fn test_guess_job_title() {
        let (coach, _) = coach(ScriptedCompletion::new("Score: 8"));
        let title = coach.guess_job_title("resume").await.unwrap();
        assert_eq!(title, "Backend Engineer");
    }

    #[tokio::test]
    async fn test_start_sets_initial_stage_with_one_question() {
        let (coach, completion) = coach(ScriptedCompletion::new("Score: 8"));
        let id = Uuid::new_v4();

        let question = coach
            .start(id, "resume".into(), "Backend Engineer".into())
            .await
            .unwrap();

        assert_eq!(question, "Question 1?");
        let session = coach.session(id).await.unwrap();
        assert_eq!(session.stage, Stage::Initial);
        assert_eq!(session.previous_questions, vec!["Question 1?"]);
        assert_eq!(session.current_question, "Question 1?");
        assert!(completion.requests()[0]
            .prompt
            .contains("Avoid repeating these previous questions:\n\n"));
    }

    #[tokio::test]
    async fn test_full_interview_walks_every_stage() {
        let (coach, completion) =
            coach(ScriptedCompletion::new("Score: 7\nBreakdown:\n- Clarity: good"));
        let id = Uuid::new_v4();
        coach
            .start(id, "resume".into(), "Backend Engineer".into())
            .await
            .unwrap();

        let first = coach.submit(id, "answer").await.unwrap();
        assert_eq!(
            first,
            SubmitOutcome::FollowUp {
                question: "Question 2?".to_string()
            }
        );
        let session = coach.session(id).await.unwrap();
        assert_eq!(session.stage, Stage::Followup);
        assert_eq!(session.first_answer, "answer");
        assert_eq!(session.previous_questions, vec!["Question 1?", "Question 2?"]);
        assert_eq!(session.current_question, "Question 2?");

        let second = coach.submit(id, "second answer").await.unwrap();
        let result = match second {
            SubmitOutcome::Scored(result) => result,
            other => panic!("expected a scored outcome, got {other:?}"),
        };
        assert_eq!(result.job_title, "Backend Engineer");
        assert_eq!(result.feedback, "- Be more specific.");
        assert_eq!(result.score.score, 7);
        assert!(result.score.parsed);
        assert_eq!(result.score.breakdown, "Breakdown:\n- Clarity: good");

        let session = coach.session(id).await.unwrap();
        assert_eq!(session.stage, Stage::Done);
        assert_eq!(session.previous_questions.len(), 2);

        // The follow-up prompt saw the first question; feedback and scoring saw both answers.
        let requests = completion.requests();
        assert!(requests[1]
            .prompt
            .contains("Avoid repeating these previous questions:\nQuestion 1?\n"));
        let scoring = requests.iter().find(|r| r.task == PromptTask::Score).unwrap();
        assert!(scoring.prompt.contains("Question 1?\nQuestion 2?"));
        assert!(scoring.prompt.contains("answer\n\nsecond answer"));
    }

    #[tokio::test]
    async fn test_done_is_idempotent() {
        let (coach, completion) = coach(ScriptedCompletion::new("Score: 4"));
        let id = Uuid::new_v4();
        coach.start(id, "r".into(), "t".into()).await.unwrap();
        coach.submit(id, "a").await.unwrap();
        coach.submit(id, "b").await.unwrap();
        let before = coach.session(id).await.unwrap();
        let calls = completion.requests().len();

        let third = coach.submit(id, "anything").await.unwrap();

        assert_eq!(
            third,
            SubmitOutcome::AlreadyComplete {
                message: COMPLETION_NOTICE
            }
        );
        assert_eq!(coach.session(id).await.unwrap(), before);
        assert_eq!(completion.requests().len(), calls);
    }

    #[tokio::test]
    async fn test_done_session_releases_resume_text() {
        let (coach, _) = coach(ScriptedCompletion::new("Score: 6"));
        let id = Uuid::new_v4();
        coach
            .start(id, "a very long resume".into(), "Chef".into())
            .await
            .unwrap();
        coach.submit(id, "first").await.unwrap();
        coach.submit(id, "second").await.unwrap();

        let session = coach.session(id).await.unwrap();
        assert_eq!(session.stage, Stage::Done);
        assert!(session.resume_text.is_empty());
        assert!(session.first_answer.is_empty());
        assert_eq!(session.job_title, "Chef");
    }

    #[tokio::test]
    async fn test_malformed_score_reply_yields_zero() {
        let (coach, _) = coach(ScriptedCompletion::new("I would rate this highly."));
        let id = Uuid::new_v4();
        coach.start(id, "r".into(), "t".into()).await.unwrap();
        coach.submit(id, "a").await.unwrap();

        let SubmitOutcome::Scored(result) = coach.submit(id, "b").await.unwrap() else {
            panic!("expected a scored outcome");
        };
        assert_eq!(result.score.score, 0);
        assert!(!result.score.parsed);
        assert_eq!(result.score.breakdown, "I would rate this highly.");
    }

    #[tokio::test]
    async fn test_submit_without_start_is_an_error() {
        let (coach, _) = coach(ScriptedCompletion::new("Score: 8"));
        let err = coach.submit(Uuid::new_v4(), "hello").await.unwrap_err();
        assert!(matches!(err, InterviewError::NoActiveSession));
    }

    #[tokio::test]
    async fn test_sessions_are_isolated_by_id() {
        let (coach, _) = coach(ScriptedCompletion::new("Score: 8"));
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        coach.start(alice, "r".into(), "Nurse".into()).await.unwrap();
        coach.start(bob, "r".into(), "Chef".into()).await.unwrap();

        coach.submit(alice, "a").await.unwrap();

        assert_eq!(coach.session(alice).await.unwrap().stage, Stage::Followup);
        assert_eq!(coach.session(bob).await.unwrap().stage, Stage::Initial);
        assert_eq!(coach.session(bob).await.unwrap().job_title, "Chef");
    }

    #[tokio::test]
    async fn test_restart_replaces_session() {
        let (coach, _) = coach(ScriptedCompletion::new("Score: 8"));
        let id = Uuid::new_v4();
        coach.start(id, "old".into(), "Nurse".into()).await.unwrap();
        coach.submit(id, "a").await.unwrap();

        coach.start(id, "new".into(), "Chef".into()).await.unwrap();

        let session = coach.session(id).await.unwrap();
        assert_eq!(session.stage, Stage::Initial);
        assert_eq!(session.resume_text, "new");
        assert_eq!(session.previous_questions.len(), 1);
    }

    #[tokio::test]
    async fn test_completion_failure_leaves_session_untouched() {
        let mut completion = ScriptedCompletion::new("Score: 8");
        completion.fail_on = Some(PromptTask::Score);
        let (coach, _) = coach(completion);
        let id = Uuid::new_v4();
        coach.start(id, "r".into(), "t".into()).await.unwrap();
        coach.submit(id, "a").await.unwrap();
        let before = coach.session(id).await.unwrap();

        let err = coach.submit(id, "b").await.unwrap_err();

        assert!(matches!(err, InterviewError::CompletionUnavailable(_)));
        assert_eq!(coach.session(id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_start_failure_does_not_create_session() {
        let mut completion = ScriptedCompletion::new("Score: 8");
        completion.fail_on = Some(PromptTask::Question);
        let (coach, _) = coach(completion);
        let id = Uuid::new_v4();

        assert!(coach.start(id, "r".into(), "t".into()).await.is_err());
        assert!(coach.session(id).await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_followups_for_one_session_score_once() {
        let mut completion = ScriptedCompletion::new("Score: 9");
        completion.delay = Duration::from_millis(20);
        let (coach, completion) = coach(completion);
        let coach = Arc::new(coach);
        let id = Uuid::new_v4();
        coach.start(id, "r".into(), "t".into()).await.unwrap();
        coach.submit(id, "a").await.unwrap();

        let (left, right) = tokio::join!(coach.submit(id, "b"), coach.submit(id, "c"));
        let outcomes = [left.unwrap(), right.unwrap()];

        let scored = outcomes
            .iter()
            .filter(|o| matches!(o, SubmitOutcome::Scored(_)))
            .count();
        let complete = outcomes
            .iter()
            .filter(|o| matches!(o, SubmitOutcome::AlreadyComplete { .. }))
            .count();
        assert_eq!((scored, complete), (1, 1));
        let score_calls = completion
            .requests()
            .iter()
            .filter(|r| r.task == PromptTask::Score)
            .count();
        assert_eq!(score_calls, 1);
    }
}
