//! Speech recognition interface - actual recognition happens in a cloud service

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Text recognized from one upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    pub text: String,
    pub confidence: Option<f32>,
}

#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("no API key configured for {0}")]
    MissingApiKey(String),

    #[error("invalid audio: {0}")]
    InvalidAudio(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("unexpected response: {0}")]
    Response(String),
}

impl From<reqwest::Error> for TranscribeError {
    fn from(err: reqwest::Error) -> Self {
        TranscribeError::Request(err.to_string())
    }
}

#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Provider name shown in health output and logs
    fn name(&self) -> &str;

    /// Recognize speech in a WAV upload.
    ///
    /// # Returns
    /// `Ok(None)` when the service answered but recognized nothing
    async fn transcribe(&self, wav: &[u8]) -> Result<Option<Transcription>, TranscribeError>;
}
