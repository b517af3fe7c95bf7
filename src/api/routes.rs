use std::sync::{Arc, OnceLock};

use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use super::{auth, handlers};
use crate::catalog::PresetCatalog;
use crate::config::Config;
use crate::engine::{TtsEngine, VoiceConverter};
use crate::storage::ArtifactStore;

pub struct AppState {
    pub config: Config,
    pub store: ArtifactStore,
    pub presets: PresetCatalog,
    pub tts: Arc<dyn TtsEngine>,
    /// Set exactly once when the conversion engine finishes loading.
    /// Conversion requests before that fail fast instead of blocking.
    pub converter: OnceLock<Arc<dyn VoiceConverter>>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: ArtifactStore,
        presets: PresetCatalog,
        tts: Arc<dyn TtsEngine>,
    ) -> Self {
        Self {
            config,
            store,
            presets,
            tts,
            converter: OnceLock::new(),
        }
    }

    pub fn conversion_enabled(&self) -> bool {
        self.config.target_voices_dir.is_some()
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let protected = Router::new()
        .route("/upload", post(handlers::upload))
        .route("/tts", post(handlers::tts))
        .route("/multi-speaker", post(handlers::multi_speaker))
        .route("/convert", post(handlers::convert))
        .route("/voices", get(handlers::list_voices))
        .route("/target-voices", get(handlers::list_target_voices))
        .route("/health", get(handlers::health))
        .route("/file/*file_key", get(handlers::file_url))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    Router::new()
        .merge(protected)
        .route("/audio/:filename", get(handlers::serve_audio))
        .nest_service(
            "/files/uploads",
            ServeDir::new(state.store.upload_dir()),
        )
        .nest_service(
            "/files/outputs",
            ServeDir::new(state.store.output_dir()),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
