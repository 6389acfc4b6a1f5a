use std::fmt;
use std::net::SocketAddr;

// ── Defaults ─────────────────────────────────────────────────────────────────

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5001";
const DEFAULT_MODELS: &[&str] = &["gemini-1.5-pro-latest", "gemini-1.5-flash-latest"];
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_UNSPLASH_API_BASE: &str = "https://api.unsplash.com";

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("invalid bind address '{value}': {reason}")]
    InvalidBindAddr { value: String, reason: String },
    #[error("ITINERARY_MODELS does not name any model")]
    NoModels,
}

// ── Config ───────────────────────────────────────────────────────────────────

/// Process-wide settings, read once at startup and handed to the components
/// that need them.
#[derive(Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub unsplash_access_key: String,
    pub bind_addr: SocketAddr,
    /// Generation backends, tried in this order.
    pub models: Vec<String>,
    pub gemini_api_base: String,
    pub unsplash_api_base: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("gemini_api_key", &"<redacted>")
            .field("unsplash_access_key", &"<redacted>")
            .field("bind_addr", &self.bind_addr)
            .field("models", &self.models)
            .field("gemini_api_base", &self.gemini_api_base)
            .field("unsplash_api_base", &self.unsplash_api_base)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source. Blank values are
    /// treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let gemini_api_key = get("GEMINI_API_KEY").ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;
        let unsplash_access_key =
            get("UNSPLASH_ACCESS_KEY").ok_or(ConfigError::Missing("UNSPLASH_ACCESS_KEY"))?;

        let bind_raw = get("ITINERARY_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidBindAddr {
                value: bind_raw.clone(),
                reason: e.to_string(),
            })?;

        let models = match get("ITINERARY_MODELS") {
            Some(list) => parse_model_list(&list),
            None => DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
        };
        if models.is_empty() {
            return Err(ConfigError::NoModels);
        }

        Ok(Self {
            gemini_api_key,
            unsplash_access_key,
            bind_addr,
            models,
            gemini_api_base: base_url(get("GEMINI_API_BASE"), DEFAULT_GEMINI_API_BASE),
            unsplash_api_base: base_url(get("UNSPLASH_API_BASE"), DEFAULT_UNSPLASH_API_BASE),
        })
    }
}

fn parse_model_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
        .collect()
}

fn base_url(value: Option<String>, default: &str) -> String {
    value
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}
