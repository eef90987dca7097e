//! Configuration management for VeloStudy

use std::env;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::ai::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
use crate::analysis::DEFAULT_CHUNK_SIZE;
use crate::pdf::DEFAULT_EXTRACT_TIMEOUT_SECS;
use crate::session::{DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_TTL_MINUTES};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("API Key is missing. Set GEMINI_API_KEY in the environment or a .env file")]
    MissingApiKey,

    #[error("Invalid value for {name}: '{value}'")]
    Invalid { name: &'static str, value: String },

    #[error("{name} must be between {min} and {max}, got '{value}'")]
    OutOfRange {
        name: &'static str,
        value: String,
        min: String,
        max: String,
    },
}

/// Accepted ranges for numeric settings
const TIMEOUT_SECS: RangeInclusive<u64> = 1..=3_600;
const SESSION_TTL_MINUTES: RangeInclusive<i64> = 1..=525_600;
const CLEANUP_INTERVAL_SECS: RangeInclusive<u64> = 1..=86_400;
const MAX_UPLOAD_MB: RangeInclusive<usize> = 1..=4_096;
const CHUNK_SIZE_CHARS: RangeInclusive<usize> = 1_000..=1_000_000;
const SUMMARY_TOLERANCE: RangeInclusive<f64> = 0.0..=1.0;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
    pub session: SessionConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

// Never print the key
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub ttl_minutes: i64,
    pub cleanup_interval_secs: u64,
    pub max_sessions: usize,
}

impl SessionConfig {
    /// Idle time before a session expires, clamped to the accepted range
    pub fn ttl(&self) -> chrono::Duration {
        let minutes = self
            .ttl_minutes
            .clamp(*SESSION_TTL_MINUTES.start(), *SESSION_TTL_MINUTES.end());
        chrono::Duration::minutes(minutes)
    }
}

#[derive(Debug, Clone)]
pub struct LimitsConfig {
    pub max_upload_mb: usize,
    pub chunk_size_chars: usize,
    pub pdf_timeout_secs: u64,
    /// Accepted deviation from the target summary length, as a fraction
    pub summary_tolerance: f64,
}

impl LimitsConfig {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            gemini: GeminiConfig {
                api_key: String::new(),
                model: DEFAULT_GEMINI_MODEL.to_string(),
                base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
                timeout_secs: 120,
            },
            session: SessionConfig {
                ttl_minutes: DEFAULT_SESSION_TTL_MINUTES,
                cleanup_interval_secs: 300,
                max_sessions: DEFAULT_MAX_SESSIONS,
            },
            limits: LimitsConfig {
                max_upload_mb: 200,
                chunk_size_chars: DEFAULT_CHUNK_SIZE,
                pdf_timeout_secs: DEFAULT_EXTRACT_TIMEOUT_SECS,
                summary_tolerance: 0.5,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from any variable source; unset variables keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = get("GEMINI_API_KEY").ok_or(ConfigError::MissingApiKey)?;

        Ok(Config {
            server: ServerConfig {
                host: get("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_or(&get, "SERVER_PORT", defaults.server.port)?,
            },
            gemini: GeminiConfig {
                api_key: api_key.trim().to_string(),
                model: get("GEMINI_MODEL").unwrap_or(defaults.gemini.model),
                base_url: get("GEMINI_BASE_URL").unwrap_or(defaults.gemini.base_url),
                timeout_secs: parse_in(&get, "GEMINI_TIMEOUT_SECS", defaults.gemini.timeout_secs, TIMEOUT_SECS)?,
            },
            session: SessionConfig {
                ttl_minutes: parse_in(&get, "SESSION_TTL_MINUTES", defaults.session.ttl_minutes, SESSION_TTL_MINUTES)?,
                cleanup_interval_secs: parse_in(
                    &get,
                    "SESSION_CLEANUP_INTERVAL_SECS",
                    defaults.session.cleanup_interval_secs,
                    CLEANUP_INTERVAL_SECS,
                )?,
                max_sessions: parse_or(&get, "MAX_SESSIONS", defaults.session.max_sessions)?,
            },
            limits: LimitsConfig {
                max_upload_mb: parse_in(&get, "MAX_UPLOAD_MB", defaults.limits.max_upload_mb, MAX_UPLOAD_MB)?,
                chunk_size_chars: parse_in(&get, "CHUNK_SIZE_CHARS", defaults.limits.chunk_size_chars, CHUNK_SIZE_CHARS)?,
                pdf_timeout_secs: parse_in(&get, "PDF_TIMEOUT_SECS", defaults.limits.pdf_timeout_secs, TIMEOUT_SECS)?,
                summary_tolerance: parse_in(
                    &get,
                    "SUMMARY_TOLERANCE",
                    defaults.limits.summary_tolerance,
                    SUMMARY_TOLERANCE,
                )?,
            },
        })
    }
}

fn parse_or<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

/// Like [`parse_or`], but the value must also lie in `range` (NaN never does)
fn parse_in<T: FromStr + PartialOrd + fmt::Display>(
    get: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
    range: RangeInclusive<T>,
) -> Result<T, ConfigError> {
    let value = parse_or(get, name, default)?;
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value: value.to_string(),
            min: range.start().to_string(),
            max: range.end().to_string(),
        })
    }
}
