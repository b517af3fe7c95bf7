//! External engine adapters: the hosted TTS provider and the local
//! voice-conversion model. Neither retries; one upstream failure is one
//! user-visible error.

pub mod convert;
pub mod gemini;

use std::collections::HashMap;

use async_trait::async_trait;

pub use convert::{ConvertError, ConvertedAudio, PassthroughConverter, VoiceConverter};
pub use gemini::{GeminiClient, GeminiConfig};

#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("provider API key not configured")]
    NotConfigured,

    #[error("provider request failed: {0}")]
    Network(String),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected provider response: {0}")]
    InvalidResponse(String),
}

/// Text-to-speech engine returning raw PCM bytes (no container).
#[async_trait]
pub trait TtsEngine: Send + Sync {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, EngineError>;

    /// Multi-speaker synthesis: `speakers` maps speaker tags appearing in
    /// the transcript to catalog voice names.
    async fn synthesize_multi(
        &self,
        text: &str,
        speakers: &HashMap<String, String>,
    ) -> Result<Vec<u8>, EngineError>;

    /// Whether the engine has the credentials it needs. Does not perform a
    /// live round-trip.
    fn is_configured(&self) -> bool;
}
