//! Artifact store: uploaded source audio and generated outputs on local disk.
//!
//! Keys keep the S3-style `{prefix}/{uuid}{ext}` shape the frontend already
//! speaks, but the prefix is a tagged enum here so resolution is exhaustive
//! instead of string-matched.

use std::fmt;
use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

use crate::error::AppError;

pub const UPLOADS_PREFIX: &str = "seed-vc-audio-uploads";
pub const OUTPUTS_PREFIX: &str = "seedvc-outputs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Uploaded,
    Generated,
}

impl KeyKind {
    pub fn prefix(self) -> &'static str {
        match self {
            KeyKind::Uploaded => UPLOADS_PREFIX,
            KeyKind::Generated => OUTPUTS_PREFIX,
        }
    }
}

/// Opaque identifier for a stored file: `{prefix}/{uuid}{ext}`.
///
/// Keys are never reused or mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioKey {
    pub kind: KeyKind,
    pub filename: String,
}

impl AudioKey {
    /// Mint a key with a fresh UUID filename.
    pub fn generate(kind: KeyKind, extension: &str) -> Self {
        let ext = extension.trim_start_matches('.');
        Self {
            kind,
            filename: format!("{}.{}", Uuid::new_v4(), ext),
        }
    }

    /// Parse a client-supplied key. An unrecognized prefix is a format
    /// error, not a not-found.
    pub fn parse(key: &str) -> Result<Self, AppError> {
        let (kind, filename) = if let Some(rest) = key.strip_prefix(UPLOADS_PREFIX) {
            (KeyKind::Uploaded, rest)
        } else if let Some(rest) = key.strip_prefix(OUTPUTS_PREFIX) {
            (KeyKind::Generated, rest)
        } else {
            return Err(AppError::InvalidKeyFormat(key.to_string()));
        };

        let filename = filename
            .strip_prefix('/')
            .ok_or_else(|| AppError::InvalidKeyFormat(key.to_string()))?;

        // A filename is a single path segment; anything else never came
        // from this store.
        if filename.is_empty() || filename.contains('/') || filename.contains("..") {
            return Err(AppError::InvalidKeyFormat(key.to_string()));
        }

        Ok(Self {
            kind,
            filename: filename.to_string(),
        })
    }
}

impl fmt::Display for AudioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind.prefix(), self.filename)
    }
}

/// Disk-backed store for source uploads and generated outputs.
pub struct ArtifactStore {
    upload_dir: PathBuf,
    output_dir: PathBuf,
    base_url: String,
}

impl ArtifactStore {
    pub async fn new(
        upload_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        base_url: impl Into<String>,
    ) -> Result<Self, AppError> {
        let upload_dir = upload_dir.into();
        let output_dir = output_dir.into();

        fs::create_dir_all(&upload_dir).await?;
        fs::create_dir_all(&output_dir).await?;

        Ok(Self {
            upload_dir,
            output_dir,
            base_url: base_url.into(),
        })
    }

    fn dir_for(&self, kind: KeyKind) -> &Path {
        match kind {
            KeyKind::Uploaded => &self.upload_dir,
            KeyKind::Generated => &self.output_dir,
        }
    }

    pub fn path_for(&self, key: &AudioKey) -> PathBuf {
        self.dir_for(key.kind).join(&key.filename)
    }

    /// Write bytes under a freshly generated filename and return its key.
    pub async fn store(
        &self,
        bytes: &[u8],
        extension: &str,
        kind: KeyKind,
    ) -> Result<AudioKey, AppError> {
        let key = AudioKey::generate(kind, extension);
        let path = self.path_for(&key);

        fs::write(&path, bytes).await?;

        tracing::debug!(key = %key, size = bytes.len(), "Stored artifact");

        Ok(key)
    }

    /// Resolve a key to its backing file, or 404 if the file is gone.
    pub async fn resolve(&self, key: &AudioKey) -> Result<PathBuf, AppError> {
        let path = self.path_for(key);

        if fs::metadata(&path).await.is_err() {
            return Err(AppError::NotFound(key.to_string()));
        }

        Ok(path)
    }

    /// Servable URL for a stored key. Purely informational; nothing is
    /// signed and nothing expires.
    pub fn url_for(&self, key: &AudioKey) -> String {
        let segment = match key.kind {
            KeyKind::Uploaded => "uploads",
            KeyKind::Generated => "outputs",
        };
        format!("{}/files/{}/{}", self.base_url, segment, key.filename)
    }

    /// URL for the CORS-open output serving route.
    pub fn audio_url(&self, filename: &str) -> String {
        format!("{}/audio/{}", self.base_url, filename)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn test_store() -> (tempfile::TempDir, ArtifactStore) {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(
            dir.path().join("uploads"),
            dir.path().join("outputs"),
            "http://localhost:8000",
        )
        .await
        .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_store_and_resolve() {
        let (_dir, store) = test_store().await;

        let key = store.store(b"wav bytes", "wav", KeyKind::Generated).await.unwrap();
        assert!(key.to_string().starts_with(OUTPUTS_PREFIX));
        assert!(key.filename.ends_with(".wav"));

        let path = store.resolve(&key).await.unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"wav bytes");
    }

    #[tokio::test]
    async fn test_resolve_missing_file_is_not_found() {
        let (_dir, store) = test_store().await;

        let key = AudioKey::generate(KeyKind::Uploaded, "wav");
        let err = store.resolve(&key).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_fresh_keys_never_collide() {
        let (_dir, store) = test_store().await;

        let a = store.store(b"a", "wav", KeyKind::Uploaded).await.unwrap();
        let b = store.store(b"b", "wav", KeyKind::Uploaded).await.unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_round_trip() {
        let key = AudioKey::generate(KeyKind::Generated, ".wav");
        let parsed = AudioKey::parse(&key.to_string()).unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn test_parse_rejects_unknown_prefix() {
        let err = AudioKey::parse("some-bucket/abc.wav").unwrap_err();
        assert!(matches!(err, AppError::InvalidKeyFormat(_)));
    }

    #[test]
    fn test_parse_rejects_traversal() {
        assert!(AudioKey::parse(&format!("{}/../etc/passwd", UPLOADS_PREFIX)).is_err());
        assert!(AudioKey::parse(&format!("{}/a/b.wav", UPLOADS_PREFIX)).is_err());
        assert!(AudioKey::parse(UPLOADS_PREFIX).is_err());
        assert!(AudioKey::parse(&format!("{}/", UPLOADS_PREFIX)).is_err());
    }

    #[tokio::test]
    async fn test_urls() {
        let (_dir, store) = test_store().await;

        let key = AudioKey {
            kind: KeyKind::Generated,
            filename: "abc.wav".to_string(),
        };
        assert_eq!(
            store.url_for(&key),
            "http://localhost:8000/files/outputs/abc.wav"
        );
        assert_eq!(
            store.audio_url("abc.wav"),
            "http://localhost:8000/audio/abc.wav"
        );
    }
}
