//! Server Configuration
//!
//! Read once at startup from the process environment (after `.env` is loaded).

use std::{
    fmt::Display,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use regex::Regex;
use shopnest::{PlatformInfo, PromptLimits};
use thiserror::Error;

const DEFAULT_PROVIDER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_PROVIDER_MODEL: &str = "openai/gpt-3.5-turbo";
const DEFAULT_ORIGIN_PATTERN: &str = r"^https?://(localhost|127\.0\.0\.1)(:\d+)?$";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("failed to read platform info from {}", path.display())]
    PlatformInfoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse platform info from {}", path.display())]
    PlatformInfoParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Completion provider settings
#[derive(Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    /// Deadline for one provider call
    pub timeout: Duration,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Settings for the middleware chain in front of every route
#[derive(Debug, Clone)]
pub struct IngressConfig {
    pub rate_limit_window: Duration,
    pub rate_limit_max: u32,
    pub max_body_bytes: usize,
    /// Exact-match origin allow-list
    pub allowed_origins: Vec<String>,
    /// Additional origins accepted by pattern (local development hosts)
    pub origin_pattern: Option<Regex>,
    /// Key the rate limiter on `X-Forwarded-For` instead of the socket address
    pub trust_proxy: bool,
}

impl Default for IngressConfig {
    fn default() -> Self {
        Self {
            rate_limit_window: Duration::from_secs(15 * 60),
            rate_limit_max: 100,
            max_body_bytes: 100 * 1024,
            allowed_origins: vec!["http://localhost:5173".to_string()],
            origin_pattern: Regex::new(DEFAULT_ORIGIN_PATTERN).ok(),
            trust_proxy: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,
    pub provider: ProviderConfig,
    pub platform_info_path: PathBuf,
    pub prompt_limits: PromptLimits,
    pub ingress: IngressConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host: IpAddr = parse_or(&lookup, "HOST", IpAddr::from([0, 0, 0, 0]))?;
        let port: u16 = parse_or(&lookup, "PORT", 3002)?;

        let provider = ProviderConfig {
            api_key: required(&lookup, "OPENROUTER_API_KEY")?,
            endpoint: lookup("OPENROUTER_URL").unwrap_or_else(|| DEFAULT_PROVIDER_URL.to_string()),
            model: lookup("OPENROUTER_MODEL")
                .unwrap_or_else(|| DEFAULT_PROVIDER_MODEL.to_string()),
            timeout: Duration::from_secs(positive(
                "PROVIDER_TIMEOUT_SECS",
                parse_or(&lookup, "PROVIDER_TIMEOUT_SECS", 30)?,
            )?),
        };

        let defaults = PromptLimits::default();
        let prompt_limits = PromptLimits {
            max_message_chars: parse_or(
                &lookup,
                "PROMPT_MAX_MESSAGE_CHARS",
                defaults.max_message_chars,
            )?,
            max_features_chars: parse_or(
                &lookup,
                "PROMPT_MAX_FEATURES_CHARS",
                defaults.max_features_chars,
            )?,
        };

        Ok(Self {
            bind_addr: SocketAddr::new(host, port),
            database_url: required(&lookup, "DATABASE_URL")?,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            provider,
            platform_info_path: lookup("PLATFORM_INFO_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/platform_info.json")),
            prompt_limits,
            ingress: ingress_from_lookup(&lookup)?,
        })
    }
}

fn ingress_from_lookup<F>(lookup: &F) -> Result<IngressConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = IngressConfig::default();

    let window_secs = positive(
        "RATE_LIMIT_WINDOW_SECS",
        parse_or(lookup, "RATE_LIMIT_WINDOW_SECS", 15 * 60)?,
    )?;
    let rate_limit_max = positive(
        "RATE_LIMIT_MAX_REQUESTS",
        parse_or(lookup, "RATE_LIMIT_MAX_REQUESTS", defaults.rate_limit_max)?,
    )?;

    let allowed_origins = match lookup("CORS_ALLOWED_ORIGINS") {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        None => defaults.allowed_origins,
    };

    let origin_pattern = match lookup("CORS_ORIGIN_PATTERN") {
        Some(raw) if raw.trim().is_empty() => None,
        Some(raw) => Some(Regex::new(&raw).map_err(|e| ConfigError::Invalid {
            key: "CORS_ORIGIN_PATTERN",
            reason: e.to_string(),
        })?),
        None => defaults.origin_pattern,
    };

    Ok(IngressConfig {
        rate_limit_window: Duration::from_secs(window_secs),
        rate_limit_max,
        max_body_bytes: parse_or(lookup, "MAX_BODY_BYTES", defaults.max_body_bytes)?,
        allowed_origins,
        origin_pattern,
        trust_proxy: parse_or(lookup, "TRUST_PROXY", defaults.trust_proxy)?,
    })
}

/// Load the static platform facts file
pub fn load_platform_info(path: &Path) -> Result<PlatformInfo, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::PlatformInfoRead {
        path: path.to_path_buf(),
        source,
    })?;

    PlatformInfo::from_json(&raw).map_err(|source| ConfigError::PlatformInfoParse {
        path: path.to_path_buf(),
        source,
    })
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn positive<T>(key: &'static str, value: T) -> Result<T, ConfigError>
where
    T: Default + PartialEq,
{
    if value == T::default() {
        return Err(ConfigError::Invalid {
            key,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: format!("{raw:?}: {e}"),
        }),
        None => Ok(default),
    }
}
