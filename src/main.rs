mod asr;
mod config;
mod phonetic;
mod routes;
mod state;
mod suggestions;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use state::AppState;

const DEFAULT_LOG_FILTER: &str = "zhuyin_coach_backend=debug,tower_http=debug";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = load_config();

    let static_dir = &config.server_config.static_dir;
    if !std::path::Path::new(static_dir).is_dir() {
        warn!("Static directory {} does not exist, only the API will be served", static_dir);
    }

    let app_state = AppState::new(config.clone())?;
    if config.speech_config.resolved_api_key().is_empty() {
        warn!(
            "No speech API key configured (set speech_config.api_key or {}), /transcribe will fail",
            config.speech_config.api_key_env
        );
    }

    let app = routes::build_app(app_state);

    let addr = format!("{}:{}", config.server_config.host, config.server_config.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Try each candidate location in turn; fall back to defaults when none loads.
fn load_config() -> Config {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()));

    let config_paths: Vec<String> = vec![
        std::env::var("CONFIG_PATH").ok(),
        Some("conf.yaml".to_string()),
        Some("conf.json".to_string()),
        exe_dir
            .as_ref()
            .and_then(|dir| dir.join("conf.yaml").to_str().map(|s| s.to_string())),
    ]
    .into_iter()
    .flatten()
    .collect();

    for path in &config_paths {
        match Config::load(path) {
            Ok(config) => {
                info!("Loaded configuration from: {}", path);
                return config;
            }
            Err(e) if std::path::Path::new(path).exists() => {
                warn!("Failed to load config from {}: {}", path, e);
            }
            Err(e) => {
                tracing::debug!("Failed to load config from {}: {}", path, e);
            }
        }
    }

    warn!("No configuration found (tried {:?}), using defaults", config_paths);
    Config::default()
}
