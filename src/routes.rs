use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::asr::TranscribeError;
use crate::phonetic::advise_with;
use crate::state::AppState;
use crate::suggestions::suggest;

/// Reply when the speech service heard nothing it could recognize
pub const UNRECOGNIZED_REPLY: &str = "抱歉，我不確定你說了什麼。";

const AUDIO_FIELD: &str = "audio_data";

type ApiError = (StatusCode, Json<Value>);

pub fn create_routes(state: &AppState) -> Router<AppState> {
    let server_config = &state.config.server_config;

    Router::new()
        // Health check
        .route("/api/health", get(health_check))

        // Speech and pronunciation
        .route("/transcribe", post(transcribe))
        .route("/submit_feedback", post(submit_feedback))
        .route("/get_similar_suggestions", post(get_similar_suggestions))
        .route("/analyze_correction", post(analyze_correction))
        .layer(DefaultBodyLimit::max(server_config.max_upload_bytes))

        // Front-end assets
        .fallback_service(ServeDir::new(&server_config.static_dir))
}

/// Full application with middleware and state attached
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes(&state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "speech_provider": state.transcriber.name(),
    }))
}

#[tracing::instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
async fn transcribe(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut audio = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?
    {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }
        if field.file_name().unwrap_or_default().is_empty() {
            return Err(api_error(StatusCode::BAD_REQUEST, "No selected file"));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
        audio = Some(bytes);
        break;
    }

    let audio = audio.ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "No audio data"))?;
    info!("Received {} bytes of audio", audio.len());

    match state.transcriber.transcribe(&audio).await {
        Ok(Some(transcription)) => {
            info!(
                confidence = ?transcription.confidence,
                "Transcribed: {}", transcription.text
            );
            Ok(Json(json!({ "text": transcription.text })))
        }
        Ok(None) => {
            warn!("Speech service could not recognize the audio");
            Ok(Json(json!({ "text": UNRECOGNIZED_REPLY })))
        }
        Err(TranscribeError::InvalidAudio(message)) => {
            warn!("Rejected upload: {}", message);
            Err(api_error(StatusCode::BAD_REQUEST, message))
        }
        Err(e) => {
            error!("Speech service error: {}", e);
            Err(api_error(
                StatusCode::BAD_GATEWAY,
                format!("Speech service error: {}", e),
            ))
        }
    }
}

#[derive(Debug, Deserialize)]
struct FeedbackRequest {
    #[serde(default)]
    feedback: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

async fn submit_feedback(Json(payload): Json<FeedbackRequest>) -> Json<Value> {
    info!(
        received_at = %chrono::Utc::now().to_rfc3339(),
        "收到使用者回饋: [{}] 針對文字: {}",
        payload.feedback.as_deref().unwrap_or(""),
        payload.text.as_deref().unwrap_or("")
    );
    Json(json!({
        "status": "success",
        "message": "感謝您的回饋！"
    }))
}

#[derive(Debug, Deserialize)]
struct SuggestionRequest {
    #[serde(default)]
    text: String,
}

async fn get_similar_suggestions(Json(payload): Json<SuggestionRequest>) -> Json<Value> {
    Json(json!({ "suggestions": suggest(&payload.text) }))
}

#[derive(Debug, Deserialize)]
struct CorrectionRequest {
    #[serde(default)]
    wrong_text: String,
    #[serde(default)]
    correct_text: String,
}

async fn analyze_correction(
    State(state): State<AppState>,
    Json(payload): Json<CorrectionRequest>,
) -> Json<Value> {
    let advice = advise_with(
        state.converter.as_ref(),
        &payload.wrong_text,
        &payload.correct_text,
    );
    Json(json!({
        "advice": advice.to_text(),
        "lines": advice.lines(),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use tower::ServiceExt;

    use super::*;
    use crate::asr::wav::encode_wav;
    use crate::asr::interface::Transcription;
    use crate::asr::Transcriber;
    use crate::config::Config;
    use crate::phonetic::advisor::SIMILAR_PRONUNCIATION;
    use crate::phonetic::PinyinZhuyinConverter;

    enum Reply {
        Text(&'static str),
        Nothing,
        Unavailable,
    }

    struct StubTranscriber(Reply);

    #[async_trait]
    impl Transcriber for StubTranscriber {
        fn name(&self) -> &str {
            "stub"
        }

        async fn transcribe(&self, wav: &[u8]) -> Result<Option<Transcription>, TranscribeError> {
            crate::asr::wav::inspect(wav)?;
            match self.0 {
                Reply::Text(text) => Ok(Some(Transcription {
                    text: text.to_string(),
                    confidence: Some(0.9),
                })),
                Reply::Nothing => Ok(None),
                Reply::Unavailable => Err(TranscribeError::Request("status 503".to_string())),
            }
        }
    }

    fn app(reply: Reply) -> Router {
        let state = AppState::with_services(
            Config::default(),
            Arc::new(StubTranscriber(reply)),
            Arc::new(PinyinZhuyinConverter),
        );
        build_app(state)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(field: &str, file_name: Option<&str>, data: &[u8]) -> Request<Body> {
        let boundary = "zhuyin-test-boundary";
        let disposition = match file_name {
            Some(name) => format!("form-data; name=\"{}\"; filename=\"{}\"", field, name),
            None => format!("form-data; name=\"{}\"", field),
        };
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: {}\r\nContent-Type: audio/wav\r\n\r\n",
                boundary, disposition
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

        Request::builder()
            .method("POST")
            .uri("/transcribe")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(Reply::Nothing), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["speech_provider"], "stub");
    }

    #[tokio::test]
    async fn test_transcribe_returns_text() {
        let wav = encode_wav(&[0; 1600], 16000, 16);
        let request = multipart_request(AUDIO_FIELD, Some("recording.wav"), &wav);
        let (status, body) = send(app(Reply::Text("四是四")), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "四是四");
    }

    #[tokio::test]
    async fn test_transcribe_nothing_recognized() {
        let wav = encode_wav(&[0; 1600], 16000, 16);
        let request = multipart_request(AUDIO_FIELD, Some("recording.wav"), &wav);
        let (status, body) = send(app(Reply::Nothing), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], UNRECOGNIZED_REPLY);
    }

    #[tokio::test]
    async fn test_transcribe_service_error() {
        let wav = encode_wav(&[0; 1600], 16000, 16);
        let request = multipart_request(AUDIO_FIELD, Some("recording.wav"), &wav);
        let (status, body) = send(app(Reply::Unavailable), request).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Speech service error:"));
    }

    #[tokio::test]
    async fn test_transcribe_missing_field() {
        let request = multipart_request("something_else", Some("recording.wav"), b"abc");
        let (status, body) = send(app(Reply::Nothing), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No audio data");
    }

    #[tokio::test]
    async fn test_transcribe_empty_file_name() {
        let request = multipart_request(AUDIO_FIELD, Some(""), b"abc");
        let (status, body) = send(app(Reply::Nothing), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No selected file");
    }

    #[tokio::test]
    async fn test_transcribe_invalid_audio() {
        let request = multipart_request(AUDIO_FIELD, Some("recording.wav"), b"not a wav");
        let (status, body) = send(app(Reply::Text("unused")), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("WAV decode error"));
    }

    #[tokio::test]
    async fn test_submit_feedback() {
        let request = json_request(
            "/submit_feedback",
            json!({ "feedback": "correct", "text": "四是四" }),
        );
        let (status, body) = send(app(Reply::Nothing), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], "感謝您的回饋！");
    }

    #[tokio::test]
    async fn test_similar_suggestions() {
        let request = json_request("/get_similar_suggestions", json!({ "text": "老師好" }));
        let (_, body) = send(app(Reply::Nothing), request).await;
        assert_eq!(body["suggestions"], json!(["八百標兵奔北坡", "四是四，十是十"]));

        let request = json_request("/get_similar_suggestions", json!({}));
        let (_, body) = send(app(Reply::Nothing), request).await;
        assert_eq!(body["suggestions"], json!(["嗎？", "請再說一次"]));
    }

    #[tokio::test]
    async fn test_analyze_correction_same_text() {
        let request = json_request(
            "/analyze_correction",
            json!({ "wrong_text": "你好", "correct_text": "你好" }),
        );
        let (status, body) = send(app(Reply::Nothing), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["advice"], SIMILAR_PRONUNCIATION);
    }

    #[tokio::test]
    async fn test_analyze_correction_retroflex() {
        let request = json_request(
            "/analyze_correction",
            json!({ "wrong_text": "四是四", "correct_text": "十是十" }),
        );
        let (_, body) = send(app(Reply::Nothing), request).await;
        let advice = body["advice"].as_str().unwrap();
        assert!(advice.starts_with("第 1 個字："));
        assert!(advice.contains("捲舌音 (ㄕ)"));
        assert_eq!(
            advice.lines().count(),
            body["lines"].as_array().unwrap().len()
        );
    }

    #[tokio::test]
    async fn test_analyze_correction_defaults_to_empty() {
        let request = json_request("/analyze_correction", json!({}));
        let (_, body) = send(app(Reply::Nothing), request).await;
        assert_eq!(body["advice"], SIMILAR_PRONUNCIATION);
    }
}
