use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::interface::{TranscribeError, Transcriber, Transcription};
use super::wav;
use crate::config::SpeechConfig;

const PROVIDER: &str = "google_speech";

/// Google Cloud Speech-to-Text (v1 REST) client
pub struct GoogleSpeechClient {
    client: Client,
    endpoint: String,
    api_key: String,
    language: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig<'a> {
    encoding: &'static str,
    sample_rate_hertz: u32,
    audio_channel_count: u16,
    language_code: &'a str,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Debug, Serialize)]
struct RecognizeRequest<'a> {
    config: RecognitionConfig<'a>,
    audio: RecognitionAudio,
}

#[derive(Debug, Default, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<RecognitionAlternative>,
}

#[derive(Debug, Deserialize)]
struct RecognitionAlternative {
    #[serde(default)]
    transcript: String,
    confidence: Option<f32>,
}

impl GoogleSpeechClient {
    pub fn new(config: &SpeechConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.resolved_api_key(),
            language: config.language.clone(),
        })
    }
}

#[async_trait]
impl Transcriber for GoogleSpeechClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn transcribe(&self, wav_bytes: &[u8]) -> Result<Option<Transcription>, TranscribeError> {
        if self.api_key.trim().is_empty() {
            return Err(TranscribeError::MissingApiKey(PROVIDER.to_string()));
        }

        let audio = wav::inspect(wav_bytes)?;
        debug!(
            "Sending {} ms of audio ({} Hz, {} ch) to {}",
            audio.duration_ms(),
            audio.sample_rate,
            audio.channels,
            self.endpoint
        );

        let request = RecognizeRequest {
            config: RecognitionConfig {
                encoding: "LINEAR16",
                sample_rate_hertz: audio.sample_rate,
                audio_channel_count: audio.channels,
                language_code: &self.language,
            },
            audio: RecognitionAudio {
                content: base64::engine::general_purpose::STANDARD.encode(&audio.pcm),
            },
        };

        let url = format!("{}/v1/speech:recognize", self.endpoint);
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!("Speech service returned {}: {}", status, body);
            return Err(TranscribeError::Request(format!(
                "status {}: {}",
                status, body
            )));
        }

        parse_response(&body)
    }
}

/// Join the top alternative of every result. Google splits longer audio
/// into consecutive results.
fn parse_response(body: &str) -> Result<Option<Transcription>, TranscribeError> {
    let response: RecognizeResponse = if body.trim().is_empty() {
        RecognizeResponse::default()
    } else {
        serde_json::from_str(body).map_err(|e| TranscribeError::Response(e.to_string()))?
    };

    let mut confidence = None;
    let mut text = String::new();
    for best in response
        .results
        .iter()
        .filter_map(|result| result.alternatives.first())
    {
        if confidence.is_none() {
            confidence = best.confidence;
        }
        text.push_str(best.transcript.trim());
    }

    if text.is_empty() {
        debug!("Speech service recognized nothing");
        return Ok(None);
    }

    Ok(Some(Transcription { text, confidence }))
}
