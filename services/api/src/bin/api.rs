//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        completion_llm::OpenAiCompletionAdapter, db::DbAdapter, tts::OpenAiTtsAdapter,
    },
    config::Config,
    error::ApiError,
    web::{self, rest::ApiDoc, state::AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use axum::Router;
use interview_coach_core::interview::InterviewCoach;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool));
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize Service Adapters ---
    let openai_config = OpenAIConfig::new().with_api_key(
        config
            .openai_api_key
            .as_ref()
            .ok_or_else(|| ApiError::Internal("OPENAI_API_KEY is required".to_string()))?,
    );
    let openai_client = Client::with_config(openai_config);

    let completion_adapter = Arc::new(OpenAiCompletionAdapter::new(
        openai_client.clone(),
        config.completion_model.clone(),
        config.completion_timeout,
    ));

    let tts_model = OpenAiTtsAdapter::model_from_name(&config.tts_model).ok_or_else(|| {
        ApiError::Internal(format!("Invalid TTS model in config: '{}'", config.tts_model))
    })?;
    let tts_voice = OpenAiTtsAdapter::voice_from_name(&config.tts_voice).ok_or_else(|| {
        ApiError::Internal(format!("Invalid TTS voice in config: '{}'", config.tts_voice))
    })?;
    let tts_adapter = Arc::new(OpenAiTtsAdapter::new(
        openai_client,
        tts_model,
        tts_voice,
        config.completion_timeout,
    ));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        db: db_adapter,
        config: config.clone(),
        coach: Arc::new(InterviewCoach::new(completion_adapter)),
        tts_adapter,
    });

    // --- 5. Create the Web Router ---
    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(web::router(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
