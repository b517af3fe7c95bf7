pub mod auth;
pub mod handlers;
pub mod routes;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct TtsRequest {
    pub text: String,
    pub voice: String,
}

#[derive(Debug, Deserialize)]
pub struct MultiSpeakerRequest {
    pub text: String,
    /// Speaker tag (as it appears in the transcript) -> voice name.
    pub speakers: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    pub source_audio_key: String,
    pub target_voice: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub s3_key: String,
}

#[derive(Debug, Serialize)]
pub struct AudioResponse {
    pub audio_url: String,
    pub s3_key: String,
}

#[derive(Debug, Serialize)]
pub struct VoicesResponse {
    pub voices: HashMap<&'static str, &'static str>,
}

#[derive(Debug, Serialize)]
pub struct TargetVoicesResponse {
    pub target_voices: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct FileUrlResponse {
    pub url: String,
    /// Informational only; nothing actually expires.
    pub expires_in: u64,
}
