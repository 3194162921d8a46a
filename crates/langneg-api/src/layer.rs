//! Tower layer for language negotiation
//!
//! Same behavior as [`crate::negotiate_language`], packaged as a
//! [`tower::Layer`] so it can wrap any `Service<http::Request<B>>`, not just
//! axum routers.

use langneg_core::LanguageNegotiator;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use crate::middleware::negotiate_request;

/// Layer that negotiates a language before calling the inner service.
///
/// # Example
///
/// ```ignore
/// Router::new()
///     .route("/", get(handler))
///     .layer(LanguageNegotiationLayer::new(negotiator))
/// ```
#[derive(Debug, Clone)]
pub struct LanguageNegotiationLayer {
    negotiator: LanguageNegotiator,
}

impl LanguageNegotiationLayer {
    pub fn new(negotiator: LanguageNegotiator) -> Self {
        Self { negotiator }
    }
}

impl<S> Layer<S> for LanguageNegotiationLayer {
    type Service = LanguageNegotiationService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LanguageNegotiationService {
            inner,
            negotiator: self.negotiator.clone(),
        }
    }
}

/// Service wrapper for [`LanguageNegotiationLayer`].
#[derive(Debug, Clone)]
pub struct LanguageNegotiationService<S> {
    inner: S,
    negotiator: LanguageNegotiator,
}

impl<S, B> Service<http::Request<B>> for LanguageNegotiationService<S>
where
    S: Service<http::Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: http::Request<B>) -> Self::Future {
        let request = negotiate_request(&self.negotiator, request);
        self.inner.call(request)
    }
}
