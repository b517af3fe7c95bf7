use std::path::PathBuf;

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Shared secret compared against the Authorization header.
    pub api_key: String,
    /// Gemini API key; TTS routes report the engine unavailable without it.
    pub gemini_api_key: Option<String>,
    /// Base used when building absolute links to stored files.
    pub base_url: String,
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Directory of reference WAVs for voice conversion. Conversion routes
    /// are effectively disabled when unset.
    pub target_voices_dir: Option<PathBuf>,
    /// Upper bound on a single provider call.
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .expect("PORT must be a number");
        let api_key = std::env::var("API_KEY")
            .unwrap_or_else(|_| "default-api-key-for-development".to_string());
        let gemini_api_key = std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());
        let base_url =
            std::env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
        let upload_dir = std::env::var("UPLOAD_DIR")
            .unwrap_or_else(|_| "./uploads".to_string())
            .into();
        let output_dir = std::env::var("OUTPUT_DIR")
            .unwrap_or_else(|_| "./outputs".to_string())
            .into();
        let target_voices_dir = std::env::var("TARGET_VOICES_DIR").ok().map(PathBuf::from);
        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".to_string())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a number");

        Self {
            host,
            port,
            api_key,
            gemini_api_key,
            base_url,
            upload_dir,
            output_dir,
            target_voices_dir,
            request_timeout_secs,
        }
    }
}
