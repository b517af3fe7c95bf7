use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use voice_api_server::api::routes::{create_router, AppState};
use voice_api_server::catalog::PresetCatalog;
use voice_api_server::config::Config;
use voice_api_server::engine::{GeminiClient, GeminiConfig, PassthroughConverter, VoiceConverter};
use voice_api_server::storage::ArtifactStore;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid address");

    tracing::info!("Voice API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Starting server on http://{}", addr);
    tracing::info!("Upload dir: {}", config.upload_dir.display());
    tracing::info!("Output dir: {}", config.output_dir.display());

    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; TTS routes will report the engine unavailable");
    }

    let store = ArtifactStore::new(
        config.upload_dir.clone(),
        config.output_dir.clone(),
        config.base_url.clone(),
    )
    .await
    .expect("Failed to create storage directories");

    // Catalogs are built before the server starts and never change after.
    let presets = match &config.target_voices_dir {
        Some(dir) => {
            let presets = PresetCatalog::load(dir).expect("Failed to scan target voices");
            tracing::info!(
                "Loaded {} target voice presets from {}",
                presets.names().len(),
                dir.display()
            );
            presets
        }
        None => PresetCatalog::default(),
    };

    let tts = Arc::new(
        GeminiClient::new(
            GeminiConfig::default()
                .with_api_key(config.gemini_api_key.clone())
                .with_timeout(config.request_timeout_secs),
        )
        .expect("Failed to build TTS client"),
    );

    let conversion_enabled = config.target_voices_dir.is_some();
    let state = Arc::new(AppState::new(config, store, presets, tts));

    // The conversion engine loads off the accept path; requests that arrive
    // first get ModelNotLoaded instead of blocking.
    if conversion_enabled {
        let init_state = state.clone();
        tokio::spawn(async move {
            let converter: Arc<dyn VoiceConverter> = Arc::new(PassthroughConverter);
            if init_state.converter.set(converter).is_ok() {
                tracing::info!("Voice conversion engine loaded");
            }
        });
    }

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app).await.expect("Server error");
}
