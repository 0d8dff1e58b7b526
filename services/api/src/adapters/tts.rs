//! services/api/src/adapters/tts.rs
//!
//! This module contains the adapter for OpenAI's Text-to-Speech (TTS) service.
//! It implements the `TextToSpeechService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{CreateSpeechRequestArgs, SpeechModel, SpeechResponseFormat, Voice},
    Client,
};
use async_trait::async_trait;
use interview_coach_core::ports::{PortError, PortResult, TextToSpeechService};
use std::time::Duration;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `TextToSpeechService` port using the OpenAI TTS API.
#[derive(Clone)]
pub struct OpenAiTtsAdapter {
    client: Client<OpenAIConfig>,
    model: SpeechModel,
    voice: Voice,
    timeout: Duration,
}

impl OpenAiTtsAdapter {
    /// Creates a new `OpenAiTtsAdapter`.
    pub fn new(
        client: Client<OpenAIConfig>,
        model: SpeechModel,
        voice: Voice,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            model,
            voice,
            timeout,
        }
    }

    /// Maps a configured model name onto the API enum.
    pub fn model_from_name(name: &str) -> Option<SpeechModel> {
        match name {
            "tts-1" => Some(SpeechModel::Tts1),
            "tts-1-hd" => Some(SpeechModel::Tts1Hd),
            _ => None,
        }
    }

    /// Maps a configured voice name onto the API enum.
    pub fn voice_from_name(name: &str) -> Option<Voice> {
        match name.to_lowercase().as_str() {
            "alloy" => Some(Voice::Alloy),
            "echo" => Some(Voice::Echo),
            "fable" => Some(Voice::Fable),
            "onyx" => Some(Voice::Onyx),
            "nova" => Some(Voice::Nova),
            "shimmer" => Some(Voice::Shimmer),
            _ => None,
        }
    }
}

//=========================================================================================
// `TextToSpeechService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TextToSpeechService for OpenAiTtsAdapter {
    /// Generates MP3 audio (`Vec<u8>`) from the given text.
    async fn generate_audio(&self, text: &str) -> PortResult<Vec<u8>> {
        let request = CreateSpeechRequestArgs::default()
            .model(self.model.clone())
            .input(text)
            .voice(self.voice.clone())
            .response_format(SpeechResponseFormat::Mp3)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = tokio::time::timeout(self.timeout, self.client.audio().speech(request))
            .await
            .map_err(|_| {
                PortError::Unavailable(format!("speech timed out after {:?}", self.timeout))
            })?
            .map_err(|e: OpenAIError| PortError::Unavailable(e.to_string()))?;

        // The response contains a `bytes` field. We call `.to_vec()` on that field.
        Ok(response.bytes.to_vec())
    }
}
