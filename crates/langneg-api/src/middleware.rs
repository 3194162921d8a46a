//! Language negotiation middleware for axum
//!
//! Runs [`LanguageNegotiator::process`] on every request, which stores the
//! negotiated language under the configured attribute name, and also inserts
//! a typed [`NegotiatedLanguage`] extension that handlers can extract.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use langneg_core::{LanguageNegotiator, NegotiationRequest};
use std::fmt;
use tracing::debug;

use crate::error::MissingNegotiatedLanguage;

/// The language negotiated for the current request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NegotiatedLanguage(pub String);

impl NegotiatedLanguage {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NegotiatedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for NegotiatedLanguage
where
    S: Send + Sync,
{
    type Rejection = MissingNegotiatedLanguage;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<NegotiatedLanguage>()
            .cloned()
            .ok_or(MissingNegotiatedLanguage)
    }
}

/// Negotiate for `request` and attach both the named attribute and the
/// typed [`NegotiatedLanguage`] extension.
pub fn negotiate_request<B>(
    negotiator: &LanguageNegotiator,
    request: http::Request<B>,
) -> http::Request<B> {
    let mut request = negotiator.process(request);
    let language = request
        .attribute(negotiator.config().attribute_name())
        .unwrap_or_else(|| negotiator.default_language())
        .to_string();

    debug!(language = %language, "Negotiated request language");

    request.extensions_mut().insert(NegotiatedLanguage(language));
    request
}

/// Middleware for [`axum::middleware::from_fn_with_state`].
///
/// ```ignore
/// Router::new()
///     .route("/", get(handler))
///     .layer(middleware::from_fn_with_state(negotiator, negotiate_language))
/// ```
pub async fn negotiate_language(
    State(negotiator): State<LanguageNegotiator>,
    request: Request,
    next: Next,
) -> Response {
    let request = negotiate_request(&negotiator, request);
    next.run(request).await
}
