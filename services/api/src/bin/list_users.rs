//! services/api/src/bin/list_users.rs
//!
//! Prints every registered username, one per line.

use api_lib::{adapters::db::DbAdapter, config::Config, error::ApiError};
use interview_coach_core::ports::DatabaseService;
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    let config = Config::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with_writer(std::io::stderr)
        .init();

    let db_pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database_url)
        .await?;
    let db = DbAdapter::new(db_pool);

    let users = db.list_users().await?;
    println!("Registered Users:");
    for user in users {
        println!("{}", user.username);
    }

    Ok(())
}
