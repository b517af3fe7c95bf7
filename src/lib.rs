//! Voice API server.
//!
//! HTTP front-end over two external engines: the Gemini TTS API (text in,
//! raw PCM out) and a local voice-conversion model (source audio plus a
//! target reference, converted audio out). This crate owns the glue:
//! auth, upload/storage, request validation, WAV packaging, and URLs.

pub mod api;
pub mod audio;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod storage;

pub use config::Config;
