//! Intake configuration.
//!
//! Provides [`IntakeConfig`], loaded from environment variables at cold start
//! and shared by every invocation handled by the process.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parse a format name; anything other than `json` (case-insensitive) is text.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Intake function configuration.
///
/// # Examples
///
/// ```
/// use xmlintake_core::config::IntakeConfig;
///
/// let config = IntakeConfig::default();
/// assert!(config.default_bucket.is_none());
/// assert_eq!(config.default_region, "us-east-1");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct IntakeConfig {
    /// Bucket used when a request does not name one.
    #[builder(default, setter(strip_option, into))]
    pub default_bucket: Option<String>,

    /// Region used when the AWS provider chain does not find one.
    #[builder(default = String::from("us-east-1"), setter(into))]
    pub default_region: String,

    /// Custom S3 endpoint (e.g. a local S3-compatible server).
    #[builder(default, setter(strip_option, into))]
    pub endpoint_url: Option<String>,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"), setter(into))]
    pub log_level: String,

    /// Log output format.
    #[builder(default)]
    pub log_format: LogFormat,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            default_bucket: None,
            default_region: String::from("us-east-1"),
            endpoint_url: None,
            log_level: String::from("info"),
            log_format: LogFormat::Text,
        }
    }
}

impl IntakeConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `INTAKE_BUCKET` | *(unset)* |
    /// | `DEFAULT_REGION` | `us-east-1` |
    /// | `S3_ENDPOINT_URL` | *(unset)* |
    /// | `LOG_LEVEL` | `info` |
    /// | `LOG_FORMAT` | `text` |
    ///
    /// Empty values are treated as unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from any variable source, e.g. a map in tests.
    ///
    /// Same variables and defaults as [`IntakeConfig::from_env`].
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(v) = var("INTAKE_BUCKET") {
            config.default_bucket = Some(v);
        }
        if let Some(v) = var("DEFAULT_REGION") {
            config.default_region = v;
        }
        if let Some(v) = var("S3_ENDPOINT_URL") {
            config.endpoint_url = Some(v);
        }
        if let Some(v) = var("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Some(v) = var("LOG_FORMAT") {
            config.log_format = LogFormat::parse(&v);
        }

        config
    }
}
