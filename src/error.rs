use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::engine::convert::ConvertError;
use crate::engine::EngineError;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("API key is missing")]
    ApiKeyMissing,

    #[error("Invalid API key")]
    ApiKeyInvalid,

    #[error("Voice not supported: {0}")]
    VoiceNotSupported(String),

    #[error("Target voice not supported: {0}")]
    TargetNotSupported(String),

    #[error("Invalid file key format: {0}")]
    InvalidKeyFormat(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("TTS engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Voice conversion model not loaded")]
    ModelNotLoaded,

    #[error("Audio encoding failed: {0}")]
    AudioEncode(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::ApiKeyMissing => (StatusCode::UNAUTHORIZED, "API_KEY_MISSING"),
            AppError::ApiKeyInvalid => (StatusCode::UNAUTHORIZED, "API_KEY_INVALID"),
            AppError::VoiceNotSupported(_) => (StatusCode::BAD_REQUEST, "VOICE_NOT_SUPPORTED"),
            AppError::TargetNotSupported(_) => (StatusCode::BAD_REQUEST, "TARGET_NOT_SUPPORTED"),
            AppError::InvalidKeyFormat(_) => (StatusCode::BAD_REQUEST, "INVALID_KEY_FORMAT"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::EngineUnavailable(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "ENGINE_UNAVAILABLE")
            }
            AppError::ModelNotLoaded => (StatusCode::INTERNAL_SERVER_ERROR, "MODEL_NOT_LOADED"),
            AppError::AudioEncode(_) => (StatusCode::INTERNAL_SERVER_ERROR, "AUDIO_ENCODE"),
            AppError::IoError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        };

        let message = self.to_string();
        tracing::error!("Request failed: {} - {}", code, message);

        (
            status,
            Json(ErrorResponse {
                error: message,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        AppError::EngineUnavailable(e.to_string())
    }
}

impl From<ConvertError> for AppError {
    fn from(e: ConvertError) -> Self {
        match e {
            ConvertError::SourceNotFound(path) => AppError::NotFound(path),
            other => AppError::EngineUnavailable(other.to_string()),
        }
    }
}

impl From<hound::Error> for AppError {
    fn from(e: hound::Error) -> Self {
        AppError::AudioEncode(e.to_string())
    }
}
