use anyhow::{Context, Result};

pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Application configuration loaded from environment variables.
///
/// The model API key is optional at startup: without it the service still
/// serves health checks and session reads, but every analysis request is
/// refused with a configuration error.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: Option<String>,
    pub gemini_model: String,
    pub llm_max_attempts: u32,
    pub llm_timeout_secs: u64,
    pub max_upload_bytes: usize,
    pub max_sessions: usize,
    pub session_ttl_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            google_api_key: optional_env(API_KEY_VAR),
            gemini_model: optional_env("GEMINI_MODEL")
                .unwrap_or_else(|| crate::llm_client::DEFAULT_MODEL.to_string()),
            llm_max_attempts: parse_env("LLM_MAX_ATTEMPTS", 1)?.max(1),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            max_sessions: parse_env("MAX_SESSIONS", crate::session::DEFAULT_MAX_SESSIONS)?,
            session_ttl_secs: parse_env(
                "SESSION_TTL_SECS",
                crate::session::DEFAULT_SESSION_TTL.as_secs(),
            )?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Message shown to the user when the analysis flow is blocked by a missing key.
    pub fn missing_key_message() -> String {
        format!("Please set the {API_KEY_VAR} in your .env file")
    }
}

/// Returns the variable's value, treating unset and blank the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
