use std::sync::Arc;

use crate::asr::{GoogleSpeechClient, Transcriber};
use crate::config::Config;
use crate::phonetic::{PhoneticConverter, PinyinZhuyinConverter};

/// Shared, read-only services handed to every request
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub transcriber: Arc<dyn Transcriber>,
    pub converter: Arc<dyn PhoneticConverter>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let transcriber = Arc::new(GoogleSpeechClient::new(&config.speech_config)?);
        Ok(Self::with_services(
            config,
            transcriber,
            Arc::new(PinyinZhuyinConverter),
        ))
    }

    pub fn with_services(
        config: Config,
        transcriber: Arc<dyn Transcriber>,
        converter: Arc<dyn PhoneticConverter>,
    ) -> Self {
        Self {
            config,
            transcriber,
            converter,
        }
    }
}
