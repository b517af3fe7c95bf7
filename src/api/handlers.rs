use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path as UrlPath, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use super::{
    AudioResponse, ConvertRequest, FileUrlResponse, HealthResponse, MultiSpeakerRequest,
    TargetVoicesResponse, TtsRequest, UploadResponse, VoicesResponse,
};
use crate::api::routes::AppState;
use crate::audio;
use crate::catalog;
use crate::error::AppError;
use crate::storage::{AudioKey, KeyKind};

/// Accept any byte stream, store it under the uploads prefix, return the key.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.file_name().is_none() && field.name() != Some("file") {
            continue;
        }

        let extension = field
            .file_name()
            .and_then(|name| Path::new(name).extension())
            .map(|ext| ext.to_string_lossy().to_string())
            .unwrap_or_else(|| "wav".to_string());

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let key = state.store.store(&bytes, &extension, KeyKind::Uploaded).await?;

        tracing::info!(key = %key, size = bytes.len(), "Uploaded source audio");

        return Ok(Json(UploadResponse {
            s3_key: key.to_string(),
        }));
    }

    Err(AppError::BadRequest("missing file field".to_string()))
}

pub async fn tts(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TtsRequest>,
) -> Result<Json<AudioResponse>, AppError> {
    if request.text.is_empty() {
        return Err(AppError::BadRequest("Text cannot be empty".to_string()));
    }

    // Validate before anything reaches the provider
    if !catalog::is_valid_voice(&request.voice) {
        return Err(AppError::VoiceNotSupported(request.voice));
    }

    tracing::info!(voice = %request.voice, text_len = request.text.len(), "TTS request");

    let pcm = state.tts.synthesize(&request.text, &request.voice).await?;

    save_generated(&state, &pcm).await
}

pub async fn multi_speaker(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MultiSpeakerRequest>,
) -> Result<Json<AudioResponse>, AppError> {
    if request.text.is_empty() {
        return Err(AppError::BadRequest("Text cannot be empty".to_string()));
    }

    if request.speakers.is_empty() {
        return Err(AppError::BadRequest("No speakers given".to_string()));
    }

    for (speaker, voice) in &request.speakers {
        if !catalog::is_valid_voice(voice) {
            return Err(AppError::VoiceNotSupported(format!(
                "{} (speaker '{}')",
                voice, speaker
            )));
        }
    }

    tracing::info!(speakers = request.speakers.len(), "Multi-speaker TTS request");

    let pcm = state
        .tts
        .synthesize_multi(&request.text, &request.speakers)
        .await?;

    save_generated(&state, &pcm).await
}

/// Package provider PCM as WAV, store it, and shape the response.
async fn save_generated(
    state: &AppState,
    pcm: &[u8],
) -> Result<Json<AudioResponse>, AppError> {
    let wav = audio::pcm_to_wav_default(pcm);
    let key = state.store.store(&wav, "wav", KeyKind::Generated).await?;

    Ok(Json(AudioResponse {
        audio_url: state.store.audio_url(&key.filename),
        s3_key: key.to_string(),
    }))
}

pub async fn convert(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConvertRequest>,
) -> Result<Json<AudioResponse>, AppError> {
    let reference = state
        .presets
        .resolve(&request.target_voice)
        .ok_or_else(|| AppError::TargetNotSupported(request.target_voice.clone()))?
        .to_path_buf();

    let source_key = AudioKey::parse(&request.source_audio_key)?;
    let source_path = state.store.resolve(&source_key).await?;

    let converter = state
        .converter
        .get()
        .cloned()
        .ok_or(AppError::ModelNotLoaded)?;

    tracing::info!(
        source = %source_key,
        target = %request.target_voice,
        "Voice conversion request"
    );

    // The engine works on a scratch copy so the stored upload stays pristine.
    let scratch = std::env::temp_dir().join(format!("convert-{}.wav", Uuid::new_v4()));
    tokio::fs::copy(&source_path, &scratch).await?;

    let result = converter.convert(&scratch, &reference).await;

    // Fire-and-forget cleanup; a failure here must not affect the response.
    let cleanup = scratch.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::fs::remove_file(&cleanup).await {
            tracing::warn!(path = %cleanup.display(), "Failed to remove scratch file: {}", e);
        }
    });

    let converted = result?;
    let wav = audio::samples_to_wav(&converted.samples, converted.sample_rate)?;
    let key = state.store.store(&wav, "wav", KeyKind::Generated).await?;

    Ok(Json(AudioResponse {
        audio_url: state.store.audio_url(&key.filename),
        s3_key: key.to_string(),
    }))
}

pub async fn list_voices() -> Json<VoicesResponse> {
    Json(VoicesResponse {
        voices: catalog::all_voices().clone(),
    })
}

pub async fn list_target_voices(State(state): State<Arc<AppState>>) -> Json<TargetVoicesResponse> {
    Json(TargetVoicesResponse {
        target_voices: state.presets.names(),
    })
}

/// Reports configuration/load state only; never calls the provider.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let api_ready = state.tts.is_configured();

    let (model, healthy) = if state.conversion_enabled() {
        let loaded = state.converter.get().is_some();
        (
            Some(if loaded { "loaded" } else { "not loaded" }),
            api_ready && loaded,
        )
    } else {
        (None, api_ready)
    };

    Json(HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" },
        api: Some(if api_ready { "ready" } else { "not configured" }),
        model,
    })
}

/// Stream a generated file back, CORS-open, with a one-hour cache header.
pub async fn serve_audio(
    State(state): State<Arc<AppState>>,
    UrlPath(filename): UrlPath<String>,
) -> Result<Response, AppError> {
    if filename.contains('/') || filename.contains("..") {
        return Err(AppError::BadRequest("invalid filename".to_string()));
    }

    let path = state.store.output_dir().join(&filename);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(filename));
        }
        Err(e) => return Err(e.into()),
    };

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "audio/wav"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "*"),
        ],
        bytes,
    )
        .into_response())
}

/// Resolve an opaque key to a servable URL.
pub async fn file_url(
    State(state): State<Arc<AppState>>,
    UrlPath(file_key): UrlPath<String>,
) -> Result<Json<FileUrlResponse>, AppError> {
    let key = AudioKey::parse(&file_key)?;
    state.store.resolve(&key).await?;

    Ok(Json(FileUrlResponse {
        url: state.store.url_for(&key),
        expires_in: 3600,
    }))
}
