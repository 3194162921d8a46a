//! Accept-Language negotiation core
//!
//! Negotiates, for each request, the best language from a server-declared
//! priority list and records it as a request attribute for downstream
//! handlers.
//!
//! ```
//! use http::Request;
//! use langneg_core::{AcceptLanguageMatcher, LanguageNegotiator, NegotiationConfig, NegotiationRequest};
//!
//! let negotiator = LanguageNegotiator::new(
//!     AcceptLanguageMatcher::new(),
//!     NegotiationConfig::new(["de", "fu", "en"])?,
//! )?;
//!
//! let request = Request::builder()
//!     .header("Accept-Language", "en; q=0.1, fu; q=0.9")
//!     .body(())?;
//! let request = negotiator.process(request);
//! assert_eq!(request.attribute("X-language-negotiated"), Some("fu"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod matcher;
pub mod negotiator;
pub mod request;
pub mod sink;

pub use config::{LogLevel, NegotiationConfig, DEFAULT_ACCEPT_HEADER, DEFAULT_ATTRIBUTE_NAME};
pub use error::{ConfigError, ConfigResult, MatchError, MatchResult};
pub use matcher::{AcceptLanguageMatcher, BestMatch, LanguageMatcher};
pub use negotiator::LanguageNegotiator;
pub use request::{NegotiationRequest, RequestAttributes};
pub use sink::{LogRecord, LogSink, MemorySink, NullSink, TracingSink};
