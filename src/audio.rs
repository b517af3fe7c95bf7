//! WAV packaging for engine output.
//!
//! The Gemini provider returns raw linear PCM (24kHz, mono, 16-bit) with no
//! container; `pcm_to_wav` wraps those bytes verbatim. The conversion engine
//! hands back f32 samples, which `samples_to_wav` encodes via hound.

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::error::AppError;

/// Format the provider emits when no parameters are reported.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;
pub const DEFAULT_CHANNELS: u16 = 1;
pub const DEFAULT_BYTES_PER_SAMPLE: u16 = 2;

/// Wrap raw PCM bytes in a RIFF/WAVE container.
///
/// The data chunk is the input buffer byte-for-byte; no resampling or
/// re-encoding happens here. Total for any input, including empty buffers.
pub fn pcm_to_wav(pcm: &[u8], sample_rate: u32, channels: u16, bytes_per_sample: u16) -> Vec<u8> {
    let bits_per_sample = bytes_per_sample * 8;
    let byte_rate = sample_rate * channels as u32 * bytes_per_sample as u32;
    let block_align = channels * bytes_per_sample;

    let data_size = pcm.len() as u32;
    let file_size = 36 + data_size;

    let mut wav = Vec::with_capacity(44 + pcm.len());

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&file_size.to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    wav.extend_from_slice(&channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    wav.extend_from_slice(pcm);

    wav
}

/// `pcm_to_wav` with the provider's default format.
pub fn pcm_to_wav_default(pcm: &[u8]) -> Vec<u8> {
    pcm_to_wav(
        pcm,
        DEFAULT_SAMPLE_RATE,
        DEFAULT_CHANNELS,
        DEFAULT_BYTES_PER_SAMPLE,
    )
}

/// Encode f32 samples in [-1.0, 1.0] as 16-bit mono WAV.
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, AppError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut buffer = Vec::new();
    {
        let cursor = Cursor::new(&mut buffer);
        let mut writer = WavWriter::new(cursor, spec)?;

        for sample in samples {
            let scaled = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer.write_sample(scaled)?;
        }

        writer.finalize()?;
    }

    Ok(buffer)
}
