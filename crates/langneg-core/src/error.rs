//! Error types for language negotiation
//!
//! Configuration errors surface to the wiring code at construction time.
//! Matcher errors never leave [`crate::LanguageNegotiator::process`]; they are
//! logged and replaced by the default language.

use thiserror::Error;

/// Errors raised while building or validating a [`crate::NegotiationConfig`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("At least one priority language must be configured")]
    EmptyPriorities,
    #[error("Priority language at position {0} is blank")]
    BlankPriority(usize),
    #[error("Invalid header name: {0:?}")]
    InvalidHeaderName(String),
    #[error("Request attribute name must not be blank")]
    BlankAttributeName,
    #[error("Unknown log level: {0}")]
    UnknownLogLevel(String),
    #[error("Invalid configuration format: {0}")]
    InvalidFormat(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised by a [`crate::LanguageMatcher`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("The header string should not be empty")]
    EmptyHeader,
    #[error("A set of server priorities should be given")]
    NoPriorities,
    #[error("Invalid language tag: {0:?}")]
    InvalidTag(String),
    #[error("Invalid quality value: {0:?}")]
    InvalidQuality(String),
    #[error("Matcher failure: {0}")]
    Internal(String),
}

impl MatchError {
    /// Short, stable name of the error variant for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyHeader => "empty_header",
            Self::NoPriorities => "no_priorities",
            Self::InvalidTag(_) => "invalid_tag",
            Self::InvalidQuality(_) => "invalid_quality",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type for matcher operations
pub type MatchResult<T> = Result<T, MatchError>;

/// Anything that went wrong while negotiating a single request.
#[derive(Error, Debug)]
pub(crate) enum NegotiationFault {
    #[error(transparent)]
    Matcher(#[from] MatchError),
    #[error("Matcher panicked: {0}")]
    Panicked(String),
}

impl NegotiationFault {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Matcher(e) => e.kind(),
            Self::Panicked(_) => "panic",
        }
    }
}
