//! Negotiation configuration
//!
//! A [`NegotiationConfig`] is built once at wiring time, validated, and then
//! shared read-only by every request. The default language is always the
//! first priority; it is derived on access so reassigning the priorities can
//! never leave a stale default behind.

use http::HeaderName;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult};

/// Header read when no other name is configured.
pub const DEFAULT_ACCEPT_HEADER: &str = "Accept-Language";

/// Request attribute written when no other name is configured.
pub const DEFAULT_ATTRIBUTE_NAME: &str = "X-language-negotiated";

/// Severity of a negotiation log record.
///
/// Besides its own names this accepts the PSR-3 spellings config authors
/// tend to carry over (`warning`, `notice`, `critical`, `alert`, `emergency`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    #[serde(alias = "notice")]
    Info,
    #[serde(alias = "warning")]
    Warn,
    #[serde(alias = "critical", alias = "alert", alias = "emergency")]
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" | "notice" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" | "critical" | "alert" | "emergency" => Ok(Self::Error),
            other => Err(ConfigError::UnknownLogLevel(other.to_string())),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

fn default_accept_header() -> String {
    DEFAULT_ACCEPT_HEADER.to_string()
}

fn default_attribute_name() -> String {
    DEFAULT_ATTRIBUTE_NAME.to_string()
}

/// Settings for one negotiation middleware instance.
///
/// ```
/// use langneg_core::{LogLevel, NegotiationConfig};
///
/// let config = NegotiationConfig::new(["de", "fu", "en"])?
///     .with_attribute_name("lang")?
///     .with_success_level(LogLevel::Debug);
/// assert_eq!(config.default_language(), "de");
/// # Ok::<(), langneg_core::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationConfig {
    /// Server-side languages, most preferred first
    priorities: Vec<String>,
    /// Header carrying the client's language preferences
    #[serde(default = "default_accept_header")]
    accept_header: String,
    /// Request attribute receiving the negotiated language
    #[serde(default = "default_attribute_name")]
    attribute_name: String,
    /// Level used for every non-exceptional outcome
    #[serde(default)]
    success_level: LogLevel,
}

impl NegotiationConfig {
    /// Create a configuration with default header and attribute names.
    pub fn new<I, S>(priorities: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let priorities = validate_priorities(priorities.into_iter().map(Into::into).collect())?;
        Ok(Self {
            priorities,
            accept_header: default_accept_header(),
            attribute_name: default_attribute_name(),
            success_level: LogLevel::default(),
        })
    }

    /// Parse a TOML document and validate the result.
    pub fn from_toml_str(input: &str) -> ConfigResult<Self> {
        let config: Self =
            toml::from_str(input).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the priorities. The default language follows the new first entry.
    pub fn with_priorities<I, S>(mut self, priorities: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.priorities = validate_priorities(priorities.into_iter().map(Into::into).collect())?;
        Ok(self)
    }

    /// Read preferences from a different header.
    pub fn with_accept_header(mut self, name: impl Into<String>) -> ConfigResult<Self> {
        let name = name.into();
        validate_header_name(&name)?;
        self.accept_header = name;
        Ok(self)
    }

    /// Store the result under a different attribute name.
    pub fn with_attribute_name(mut self, name: impl Into<String>) -> ConfigResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigError::BlankAttributeName);
        }
        self.attribute_name = name;
        Ok(self)
    }

    pub fn with_success_level(mut self, level: LogLevel) -> Self {
        self.success_level = level;
        self
    }

    /// Check every invariant. Needed for configurations that did not go
    /// through the setters, e.g. ones deserialized by the caller.
    pub fn validate(&self) -> ConfigResult<()> {
        check_priorities(&self.priorities)?;
        validate_header_name(&self.accept_header)?;
        if self.attribute_name.trim().is_empty() {
            return Err(ConfigError::BlankAttributeName);
        }
        Ok(())
    }

    pub fn priorities(&self) -> &[String] {
        &self.priorities
    }

    /// The fallback language: always the first priority.
    pub fn default_language(&self) -> &str {
        // `validate` runs before a config is handed to a negotiator, so the
        // empty case is only reachable on unvalidated deserialized input.
        self.priorities.first().map(String::as_str).unwrap_or_default()
    }

    pub fn accept_header(&self) -> &str {
        &self.accept_header
    }

    pub fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    pub fn success_level(&self) -> LogLevel {
        self.success_level
    }
}

fn validate_priorities(priorities: Vec<String>) -> ConfigResult<Vec<String>> {
    check_priorities(&priorities)?;
    Ok(priorities)
}

fn check_priorities(priorities: &[String]) -> ConfigResult<()> {
    if priorities.is_empty() {
        return Err(ConfigError::EmptyPriorities);
    }
    if let Some(index) = priorities.iter().position(|p| p.trim().is_empty()) {
        return Err(ConfigError::BlankPriority(index));
    }
    Ok(())
}

fn validate_header_name(name: &str) -> ConfigResult<()> {
    HeaderName::from_bytes(name.as_bytes())
        .map(|_| ())
        .map_err(|_| ConfigError::InvalidHeaderName(name.to_string()))
}
