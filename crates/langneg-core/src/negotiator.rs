//! Language negotiation middleware
//!
//! [`LanguageNegotiator`] reads the configured header from a request, asks a
//! [`LanguageMatcher`] for the best priority language, and stores the result
//! as a request attribute. Whatever happens inside the matcher, the request
//! leaves with a language: the default (first priority) stands in for empty
//! headers, for headers without an acceptable match, and for matcher
//! failures.
//!
//! Two pipeline styles share the same [`LanguageNegotiator::process`] step:
//!
//! ```text
//! handle(request, handler)                      handler(request')
//! handle_with_response(request, response, next) next(request', response)
//! ```

use serde_json::json;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::config::{LogLevel, NegotiationConfig};
use crate::error::{ConfigResult, MatchResult, NegotiationFault};
use crate::matcher::LanguageMatcher;
use crate::request::NegotiationRequest;
use crate::sink::{LogSink, TracingSink};

/// Negotiates one language per request against a fixed configuration.
///
/// Cheap to clone; clones share the matcher, sink and configuration.
#[derive(Clone)]
pub struct LanguageNegotiator {
    config: Arc<NegotiationConfig>,
    matcher: Arc<dyn LanguageMatcher>,
    /// Type name of the matcher, reported when it fails
    matcher_name: &'static str,
    sink: Arc<dyn LogSink>,
}

impl fmt::Debug for LanguageNegotiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageNegotiator")
            .field("config", &self.config)
            .field("matcher", &self.matcher_name)
            .finish_non_exhaustive()
    }
}

impl LanguageNegotiator {
    /// Create a negotiator that logs through `tracing`.
    ///
    /// Fails if the configuration does not hold at least one priority or
    /// carries an invalid header or attribute name.
    pub fn new<M>(matcher: M, config: NegotiationConfig) -> ConfigResult<Self>
    where
        M: LanguageMatcher + 'static,
    {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            matcher: Arc::new(matcher),
            matcher_name: std::any::type_name::<M>(),
            sink: Arc::new(TracingSink),
        })
    }

    /// Replace the log sink.
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &NegotiationConfig {
        &self.config
    }

    pub fn default_language(&self) -> &str {
        self.config.default_language()
    }

    /// Pick the best priority language for a raw header value.
    ///
    /// Only fails when the matcher fails; an empty header or a header with no
    /// acceptable language yields the default language.
    pub fn negotiate(&self, header: Option<&str>) -> MatchResult<String> {
        let level = self.config.success_level();
        let default_language = self.default_language();

        let Some(header) = header.filter(|h| !h.trim().is_empty()) else {
            self.sink.log(
                level,
                "Accept-Language header is empty, use default language instead",
                &json!({ "default_language": default_language }),
            );
            return Ok(default_language.to_string());
        };

        match self.matcher.best(header, self.config.priorities())? {
            Some(best) => {
                self.sink.log(
                    level,
                    "Language negotiation result",
                    &json!({ "best_language": best.tag() }),
                );
                Ok(best.into_tag())
            }
            None => {
                self.sink.log(
                    level,
                    "Language negotiation gained no result, use default language instead",
                    &json!({
                        "default_language": default_language,
                        "negotiation_result": "none",
                    }),
                );
                Ok(default_language.to_string())
            }
        }
    }

    /// Negotiate for `request` and return it with the result attribute set.
    ///
    /// Never fails: matcher errors and panics are logged at `warn` and the
    /// default language is used.
    pub fn process<R: NegotiationRequest>(&self, request: R) -> R {
        self.sink.log(
            LogLevel::Debug,
            "Language negotiation settings",
            &json!({
                "priorities": self.config.priorities(),
                "accept_header": self.config.accept_header(),
                "attribute_name": self.config.attribute_name(),
            }),
        );

        let header = request.header_line(self.config.accept_header());
        let language = match self.try_negotiate(header.as_deref()) {
            Ok(language) => language,
            Err(fault) => {
                let default_language = self.default_language().to_string();
                self.sink.log(
                    LogLevel::Warn,
                    "Language negotiation failed, use default language instead",
                    &json!({
                        "error_kind": fault.kind(),
                        "error_message": fault.to_string(),
                        "origin": self.matcher_name,
                        "default_language": default_language,
                    }),
                );
                default_language
            }
        };

        request.with_attribute(self.config.attribute_name(), language)
    }

    /// Delegating-handler entry point: process, then hand the request to
    /// `handler` and return its response unchanged.
    pub fn handle<R, H, T>(&self, request: R, handler: H) -> T
    where
        R: NegotiationRequest,
        H: FnOnce(R) -> T,
    {
        handler(self.process(request))
    }

    /// Sequential-callback entry point: process, then call
    /// `next(request, response)` and return its result unchanged.
    pub fn handle_with_response<R, P, N, T>(&self, request: R, response: P, next: N) -> T
    where
        R: NegotiationRequest,
        N: FnOnce(R, P) -> T,
    {
        next(self.process(request), response)
    }

    fn try_negotiate(&self, header: Option<&str>) -> Result<String, NegotiationFault> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.negotiate(header))) {
            Ok(result) => result.map_err(NegotiationFault::from),
            Err(payload) => Err(NegotiationFault::Panicked(panic_message(payload.as_ref()))),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
