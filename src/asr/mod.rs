pub mod google_speech;
pub mod interface;
pub mod wav;

pub use google_speech::GoogleSpeechClient;
pub use interface::{TranscribeError, Transcriber};
