//! Voice conversion engine seam.
//!
//! The conversion model itself lives outside this repo; everything behind
//! `VoiceConverter` is replaceable. `PassthroughConverter` is the shipped
//! stand-in: it decodes the source audio and returns it untouched, which
//! keeps the whole upload/convert/download pipeline exercisable.

use std::path::Path;

use async_trait::async_trait;

#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("source audio not found: {0}")]
    SourceNotFound(String),

    #[error("failed to decode source audio: {0}")]
    Decode(String),

    #[error("conversion failed: {0}")]
    Failed(String),
}

/// Converted audio as samples plus the rate they were produced at.
#[derive(Debug)]
pub struct ConvertedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Converts source audio toward the speaker in `reference`.
#[async_trait]
pub trait VoiceConverter: Send + Sync {
    async fn convert(
        &self,
        source: &Path,
        reference: &Path,
    ) -> Result<ConvertedAudio, ConvertError>;
}

/// Stand-in converter: returns the source audio unchanged.
pub struct PassthroughConverter;

impl PassthroughConverter {
    fn decode_wav(path: &Path) -> Result<ConvertedAudio, ConvertError> {
        if !path.exists() {
            return Err(ConvertError::SourceNotFound(
                path.to_string_lossy().to_string(),
            ));
        }

        let mut reader =
            hound::WavReader::open(path).map_err(|e| ConvertError::Decode(e.to_string()))?;
        let spec = reader.spec();

        let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
            (hound::SampleFormat::Int, 16) => reader
                .samples::<i16>()
                .map(|s| s.map(|v| v as f32 / 32768.0))
                .collect::<Result<_, _>>()
                .map_err(|e| ConvertError::Decode(e.to_string()))?,
            (hound::SampleFormat::Float, 32) => reader
                .samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(|e| ConvertError::Decode(e.to_string()))?,
            (format, bits) => {
                return Err(ConvertError::Decode(format!(
                    "unsupported sample format: {:?}/{} bits",
                    format, bits
                )));
            }
        };

        Ok(ConvertedAudio {
            samples,
            sample_rate: spec.sample_rate,
        })
    }
}

#[async_trait]
impl VoiceConverter for PassthroughConverter {
    async fn convert(
        &self,
        source: &Path,
        reference: &Path,
    ) -> Result<ConvertedAudio, ConvertError> {
        tracing::debug!(
            source = %source.display(),
            reference = %reference.display(),
            "PassthroughConverter: returning source audio"
        );

        let source = source.to_path_buf();
        tokio::task::spawn_blocking(move || Self::decode_wav(&source))
            .await
            .map_err(|e| ConvertError::Failed(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio;

    #[tokio::test]
    async fn test_passthrough_returns_source_samples() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.wav");
        let reference = dir.path().join("ref.wav");

        let samples: Vec<f32> = vec![0.0, 0.25, -0.25, 0.5];
        std::fs::write(&source, audio::samples_to_wav(&samples, 24000).unwrap()).unwrap();
        std::fs::write(&reference, audio::samples_to_wav(&[0.0], 24000).unwrap()).unwrap();

        let converted = PassthroughConverter
            .convert(&source, &reference)
            .await
            .unwrap();
        assert_eq!(converted.sample_rate, 24000);
        assert_eq!(converted.samples.len(), samples.len());
        // i16 quantization loses a little precision
        for (got, want) in converted.samples.iter().zip(&samples) {
            assert!((got - want).abs() < 1e-3);
        }
    }

    #[tokio::test]
    async fn test_missing_source_is_source_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = PassthroughConverter
            .convert(&dir.path().join("gone.wav"), &dir.path().join("ref.wav"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::SourceNotFound(_)));
    }

    #[tokio::test]
    async fn test_garbage_source_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("bad.wav");
        std::fs::write(&source, b"not a wav").unwrap();

        let err = PassthroughConverter
            .convert(&source, &dir.path().join("ref.wav"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::Decode(_)));
    }
}
