//! End-to-end negotiation through axum routers and both pipeline styles.

use axum::{
    body::Body,
    http::StatusCode,
    middleware,
    response::Response,
    routing::get,
    Router,
};
use langneg_api::{negotiate_language, router, LanguageNegotiationLayer, NegotiatedLanguage};
use langneg_core::{
    AcceptLanguageMatcher, BestMatch, LanguageMatcher, LanguageNegotiator, LogLevel, MatchError,
    MatchResult, MemorySink, NegotiationConfig, NegotiationRequest,
};
use std::sync::Arc;
use tower::ServiceExt;

const MIXED_HEADER: &str = "en; q=0.1, fr; q=0.4, fu; q=0.9, de; q=0.2";

/// Delegates to the stock matcher but refuses one specific header.
struct FragileMatcher;

impl LanguageMatcher for FragileMatcher {
    fn best(&self, header: &str, priorities: &[String]) -> MatchResult<Option<BestMatch>> {
        if header == "???malformed" {
            return Err(MatchError::InvalidTag(header.to_string()));
        }
        AcceptLanguageMatcher::new().best(header, priorities)
    }
}

fn negotiator() -> (LanguageNegotiator, MemorySink) {
    let sink = MemorySink::new();
    let negotiator = LanguageNegotiator::new(
        FragileMatcher,
        NegotiationConfig::new(["de", "fu", "en"]).unwrap(),
    )
    .unwrap()
    .with_sink(Arc::new(sink.clone()));
    (negotiator, sink)
}

fn request(header: Option<&str>) -> http::Request<Body> {
    let mut builder = http::Request::builder().uri("/echo");
    if let Some(header) = header {
        builder = builder.header("Accept-Language", header);
    }
    builder.body(Body::empty()).unwrap()
}

async fn echo(language: NegotiatedLanguage) -> String {
    language.to_string()
}

async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn layer_app(negotiator: LanguageNegotiator) -> Router {
    Router::new()
        .route("/echo", get(echo))
        .layer(LanguageNegotiationLayer::new(negotiator))
}

fn from_fn_app(negotiator: LanguageNegotiator) -> Router {
    Router::new()
        .route("/echo", get(echo))
        .layer(middleware::from_fn_with_state(negotiator, negotiate_language))
}

async fn negotiated(app: Router, header: Option<&str>) -> String {
    let response = app.oneshot(request(header)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_string(response).await
}

#[tokio::test]
async fn test_scenarios_through_layer() {
    let (negotiator, _sink) = negotiator();

    // A: highest quality among known languages
    assert_eq!(negotiated(layer_app(negotiator.clone()), Some(MIXED_HEADER)).await, "fu");
    // B: no header
    assert_eq!(negotiated(layer_app(negotiator.clone()), None).await, "de");
    // C: no overlap
    assert_eq!(negotiated(layer_app(negotiator.clone()), Some("xx; q=1.0")).await, "de");
    // D: matcher failure
    assert_eq!(negotiated(layer_app(negotiator), Some("???malformed")).await, "de");
}

#[tokio::test]
async fn test_matcher_failure_is_logged_as_warning() {
    let (negotiator, sink) = negotiator();

    let body = negotiated(from_fn_app(negotiator), Some("???malformed")).await;
    assert_eq!(body, "de");

    let warnings = sink.at_level(LogLevel::Warn);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].context["error_kind"], "invalid_tag");
    assert_eq!(warnings[0].context["default_language"], "de");
}

#[tokio::test]
async fn test_no_match_is_not_a_warning() {
    let (negotiator, sink) = negotiator();

    negotiated(from_fn_app(negotiator), Some("xx; q=1.0")).await;

    assert!(sink.at_level(LogLevel::Warn).is_empty());
    assert_eq!(sink.at_level(LogLevel::Info).len(), 1);
}

#[tokio::test]
async fn test_all_entry_points_agree() {
    let (negotiator, _sink) = negotiator();

    for header in [Some(MIXED_HEADER), None, Some(""), Some("xx; q=1.0"), Some("???malformed"), Some("en-US")] {
        let via_layer = negotiated(layer_app(negotiator.clone()), header).await;
        let via_from_fn = negotiated(from_fn_app(negotiator.clone()), header).await;

        let via_handle = negotiator.handle(request(header), |req| {
            req.attribute("X-language-negotiated").map(str::to_string)
        });
        let via_callback = negotiator.handle_with_response(request(header), (), |req, ()| {
            req.attribute("X-language-negotiated").map(str::to_string)
        });

        assert_eq!(via_layer, via_from_fn, "header {header:?}");
        assert_eq!(via_handle.as_deref(), Some(via_layer.as_str()), "header {header:?}");
        assert_eq!(via_handle, via_callback, "header {header:?}");
    }
}

#[tokio::test]
async fn test_request_is_otherwise_unchanged() {
    let (negotiator, _sink) = negotiator();

    let original = http::Request::builder()
        .method("POST")
        .uri("/submit?x=1")
        .header("Accept-Language", "en")
        .header("X-Trace", "abc")
        .body(Body::from("payload"))
        .unwrap();

    let processed = negotiator.process(original);

    assert_eq!(processed.method(), "POST");
    assert_eq!(processed.uri(), "/submit?x=1");
    assert_eq!(processed.headers().len(), 2);
    assert_eq!(processed.headers()["X-Trace"], "abc");
    assert_eq!(processed.attribute("X-language-negotiated"), Some("en"));

    let body = axum::body::to_bytes(processed.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"payload");
}

#[tokio::test]
async fn test_api_router() {
    let (negotiator, _sink) = negotiator();

    let response = router(negotiator)
        .oneshot(
            http::Request::builder()
                .uri("/v1/language")
                .header("Accept-Language", MIXED_HEADER)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["language"], "fu");
    assert_eq!(body["accept_language"], MIXED_HEADER);
}
