use thiserror::Error;

const DEFAULT_PORT: u16 = 3002;
const DEFAULT_API_URL: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
/// Anthropic keys always carry this prefix.
const API_KEY_PREFIX: &str = "sk-ant";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required environment variable '{0}' is not set")]
    Missing(&'static str),

    #[error("ANTHROPIC_API_KEY is malformed (expected an 'sk-ant' key)")]
    InvalidApiKey,

    #[error("PORT must be a valid port number, got '{0}'")]
    InvalidPort(String),
}

/// Application configuration loaded from environment variables.
/// Startup fails if the API key is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub anthropic_api_url: String,
    pub anthropic_model: String,
    pub port: u16,
    pub rust_log: String,
    /// Set in development mode; error responses then carry a `details` field.
    pub expose_error_details: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // .env.local wins over .env; both are optional
        dotenvy::from_filename(".env.local").ok();
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_key = lookup("ANTHROPIC_API_KEY").ok_or(ConfigError::Missing("ANTHROPIC_API_KEY"))?;
        let anthropic_api_key = sanitize_api_key(&raw_key).ok_or(ConfigError::InvalidApiKey)?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let environment = lookup("APP_ENV")
            .or_else(|| lookup("NODE_ENV"))
            .unwrap_or_else(|| "production".to_string());

        Ok(Config {
            anthropic_api_key,
            anthropic_api_url: lookup("ANTHROPIC_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            anthropic_model: lookup("ANTHROPIC_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            port,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            expose_error_details: environment.eq_ignore_ascii_case("development"),
        })
    }
}

/// Trims the key, drops every character outside `[A-Za-z0-9_-]` and checks the prefix.
pub fn sanitize_api_key(raw: &str) -> Option<String> {
    let key: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    if key.starts_with(API_KEY_PREFIX) {
        Some(key)
    } else {
        None
    }
}
