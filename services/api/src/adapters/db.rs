//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use interview_coach_core::domain::{AuthSession, InterviewRecord, User, UserCredentials};
use interview_coach_core::ports::{DatabaseService, PortError, PortResult};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    user_id: Uuid,
    username: String,
    streak_count: i32,
    longest_streak: i32,
    last_interview_time: Option<DateTime<Utc>>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            user_id: self.user_id,
            username: self.username,
            streak_count: self.streak_count.max(0) as u32,
            longest_streak: self.longest_streak.max(0) as u32,
            last_interview_time: self.last_interview_time,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    user_id: Uuid,
    username: String,
    hashed_password: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user_id: self.user_id,
            username: self.username,
            hashed_password: self.hashed_password,
        }
    }
}

#[derive(FromRow)]
struct InterviewRecordRow {
    id: Uuid,
    user_id: Uuid,
    job_title: String,
    score: i16,
    created_at: DateTime<Utc>,
}
impl InterviewRecordRow {
    fn to_domain(self) -> InterviewRecord {
        InterviewRecord {
            id: self.id,
            user_id: self.user_id,
            job_title: self.job_title,
            score: self.score.clamp(0, u8::MAX as i16) as u8,
            created_at: self.created_at,
        }
    }
}

const USER_COLUMNS: &str = "user_id, username, streak_count, longest_streak, last_interview_time";

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn not_found(what: String) -> impl FnOnce(sqlx::Error) -> PortError {
    move |e| match e {
        sqlx::Error::RowNotFound => PortError::NotFound(what),
        _ => PortError::Unexpected(e.to_string()),
    }
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_user(&self, username: &str, hashed_password: &str) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "INSERT INTO users (user_id, username, hashed_password) VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                PortError::Conflict("Username already exists".to_string())
            }
            _ => PortError::Unexpected(e.to_string()),
        })?;

        info!("Created user {}.", record.user_id);
        Ok(record.to_domain())
    }

    async fn get_user(&self, user_id: Uuid) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found(format!("User {} not found", user_id)))?;
        Ok(record.to_domain())
    }

    async fn get_user_credentials(&self, username: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT user_id, username, hashed_password FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found(format!("User '{}' not found", username)))?;
        Ok(record.to_domain())
    }

    async fn list_users(&self) -> PortResult<Vec<User>> {
        let records = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn create_auth_session(&self, session: &AuthSession) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(&session.id)
            .bind(session.user_id)
            .bind(session.expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let user_id: Option<Uuid> = sqlx::query_scalar(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > NOW()",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        user_id.ok_or(PortError::Unauthorized)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn record_interview(
        &self,
        user_id: Uuid,
        job_title: &str,
        score: u8,
        completed_at: DateTime<Utc>,
    ) -> PortResult<User> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        // Row lock so two finishing interviews for one user advance the streak in order.
        let current = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1 FOR UPDATE"
        ))
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(not_found(format!("User {} not found", user_id)))?
        .to_domain();

        let next = current.streak().advance(completed_at);

        let updated = sqlx::query_as::<_, UserRecord>(&format!(
            "UPDATE users SET streak_count = $1, longest_streak = $2, last_interview_time = $3 \
             WHERE user_id = $4 RETURNING {USER_COLUMNS}"
        ))
        .bind(next.streak_count as i32)
        .bind(next.longest_streak as i32)
        .bind(next.last_interview_time)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(unexpected)?;

        sqlx::query(
            "INSERT INTO interview_history (id, user_id, job_title, score, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(job_title)
        .bind(score as i16)
        .bind(completed_at)
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;

        tx.commit().await.map_err(unexpected)?;
        Ok(updated.to_domain())
    }

    async fn get_interview_history(&self, user_id: Uuid) -> PortResult<Vec<InterviewRecord>> {
        let records = sqlx::query_as::<_, InterviewRecordRow>(
            "SELECT id, user_id, job_title, score, created_at FROM interview_history \
             WHERE user_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }
}
