//! services/api/src/adapters/completion_llm.rs
//!
//! This module contains the adapter for the hosted text-completion model.
//! It implements the `CompletionService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use interview_coach_core::{
    ports::{CompletionService, PortError, PortResult},
    prompts::CompletionRequest,
};
use std::time::Duration;
use tracing::warn;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `CompletionService` using an OpenAI-compatible chat model.
#[derive(Clone)]
pub struct OpenAiCompletionAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl OpenAiCompletionAdapter {
    /// Creates a new `OpenAiCompletionAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String, timeout: Duration) -> Self {
        Self {
            client,
            model,
            timeout,
        }
    }
}

//=========================================================================================
// `CompletionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl CompletionService for OpenAiCompletionAdapter {
    /// Sends the rendered prompt as a single system message and returns the trimmed reply.
    async fn complete(&self, request: &CompletionRequest) -> PortResult<String> {
        let system_message = ChatCompletionRequestSystemMessageArgs::default()
            .content(request.prompt.as_str())
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let messages: Vec<ChatCompletionRequestMessage> = vec![system_message.into()];

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(request.temperature)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API under a deadline and manually map the error (orphan rule).
        let response = tokio::time::timeout(self.timeout, self.client.chat().create(chat_request))
            .await
            .map_err(|_| {
                warn!(
                    "{:?} completion timed out after {:?}",
                    request.task, self.timeout
                );
                PortError::Unavailable(format!("timed out after {:?}", self.timeout))
            })?
            .map_err(|e: OpenAIError| PortError::Unavailable(e.to_string()))?;

        // Extract the text content from the first choice in the response.
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty());

        content.ok_or_else(|| {
            PortError::Unavailable(format!(
                "{:?} completion returned no text content.",
                request.task
            ))
        })
    }
}
