//! Gemini TTS client.
//!
//! POST {base}/{model}:generateContent?key={api_key}
//! Request: camelCase generation config selecting AUDIO output and either a
//! single prebuilt voice or a per-speaker voice table.
//! Response: base64 PCM in candidates[0].content.parts[0].inlineData.data.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{EngineError, TtsEngine};

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            model: "gemini-2.5-flash-preview-tts".to_string(),
            api_key: None,
            timeout_secs: 120,
        }
    }
}

impl GeminiConfig {
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EngineError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn generate_url(&self, api_key: &str) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.config.base_url, self.config.model, api_key
        )
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<Vec<u8>, EngineError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(EngineError::NotConfigured)?;

        let response = self
            .client
            .post(self.generate_url(api_key))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EngineError::Network("provider call timed out".to_string())
                } else {
                    EngineError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))?;

        let inline = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.inline_data)
            .ok_or_else(|| {
                EngineError::InvalidResponse("no inline audio in response".to_string())
            })?;

        if let Some(mime) = &inline.mime_type {
            tracing::debug!(mime_type = %mime, "Provider audio payload");
        }

        let pcm = base64::engine::general_purpose::STANDARD
            .decode(inline.data)
            .map_err(|e| EngineError::InvalidResponse(format!("bad base64 audio: {}", e)))?;

        tracing::info!(pcm_bytes = pcm.len(), "TTS generation completed");

        Ok(pcm)
    }
}

#[async_trait]
impl TtsEngine for GeminiClient {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, EngineError> {
        tracing::debug!(voice = %voice, text_len = text.len(), "Sending TTS request");

        let request = GenerateRequest::single_voice(text, voice);
        self.generate(&request).await
    }

    async fn synthesize_multi(
        &self,
        text: &str,
        speakers: &HashMap<String, String>,
    ) -> Result<Vec<u8>, EngineError> {
        tracing::debug!(
            speakers = speakers.len(),
            text_len = text.len(),
            "Sending multi-speaker TTS request"
        );

        let request = GenerateRequest::multi_speaker(text, speakers);
        self.generate(&request).await
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }
}

// ---- wire types ----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

impl GenerateRequest {
    fn single_voice(text: &str, voice: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: text.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["AUDIO".to_string()],
                speech_config: SpeechConfig {
                    voice_config: Some(VoiceConfig::prebuilt(voice)),
                    multi_speaker_voice_config: None,
                },
            },
        }
    }

    fn multi_speaker(text: &str, speakers: &HashMap<String, String>) -> Self {
        let speaker_voice_configs = speakers
            .iter()
            .map(|(speaker, voice)| SpeakerVoiceConfig {
                speaker: speaker.clone(),
                voice_config: VoiceConfig::prebuilt(voice),
            })
            .collect();

        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: text.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["AUDIO".to_string()],
                speech_config: SpeechConfig {
                    voice_config: None,
                    multi_speaker_voice_config: Some(MultiSpeakerVoiceConfig {
                        speaker_voice_configs,
                    }),
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<String>,
    speech_config: SpeechConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    voice_config: Option<VoiceConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    multi_speaker_voice_config: Option<MultiSpeakerVoiceConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

impl VoiceConfig {
    fn prebuilt(voice: &str) -> Self {
        Self {
            prebuilt_voice_config: PrebuiltVoiceConfig {
                voice_name: voice.to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MultiSpeakerVoiceConfig {
    speaker_voice_configs: Vec<SpeakerVoiceConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeakerVoiceConfig {
    speaker: String,
    voice_config: VoiceConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CandidatePart {
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;

    #[test]
    fn test_config_default() {
        let config = GeminiConfig::default();
        assert!(config.base_url.contains("generativelanguage.googleapis.com"));
        assert_eq!(config.model, "gemini-2.5-flash-preview-tts");
        assert_eq!(config.timeout_secs, 120);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_single_voice_payload_shape() {
        let request = GenerateRequest::single_voice("hello", "Zephyr");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(
            value["generationConfig"]["responseModalities"][0],
            "AUDIO"
        );
        assert_eq!(
            value["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]
                ["voiceName"],
            "Zephyr"
        );
        assert!(value["generationConfig"]["speechConfig"]
            .get("multiSpeakerVoiceConfig")
            .is_none());
    }

    #[test]
    fn test_multi_speaker_payload_shape() {
        let mut speakers = HashMap::new();
        speakers.insert("Narrator".to_string(), "Charon".to_string());

        let request = GenerateRequest::multi_speaker("Narrator: hi", &speakers);
        let value = serde_json::to_value(&request).unwrap();

        let configs =
            &value["generationConfig"]["speechConfig"]["multiSpeakerVoiceConfig"]["speakerVoiceConfigs"];
        assert_eq!(configs[0]["speaker"], "Narrator");
        assert_eq!(
            configs[0]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
            "Charon"
        );
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [{
                        "inlineData": {"mimeType": "audio/L16;rate=24000", "data": "AAEC"}
                    }]
                }
            }]
        }"#;

        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        let inline = response.candidates[0]
            .content
            .as_ref()
            .unwrap()
            .parts[0]
            .inline_data
            .as_ref()
            .unwrap();
        assert_eq!(inline.mime_type.as_deref(), Some("audio/L16;rate=24000"));
        assert_eq!(
            base64::engine::general_purpose::STANDARD
                .decode(&inline.data)
                .unwrap(),
            vec![0u8, 1, 2]
        );
    }

    #[tokio::test]
    async fn test_unconfigured_client_fails_fast() {
        let client = GeminiClient::new(GeminiConfig::default()).unwrap();
        let err = client.synthesize("hello", "Zephyr").await.unwrap_err();
        assert!(matches!(err, EngineError::NotConfigured));
    }
}
