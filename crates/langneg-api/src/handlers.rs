//! API request handlers
//!
//! A small router exposing the negotiation result, used by the server binary
//! and by anyone who wants to check how a given `Accept-Language` header is
//! resolved.

use axum::{
    extract::State,
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use langneg_core::LanguageNegotiator;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{layer::LanguageNegotiationLayer, middleware::NegotiatedLanguage};

/// Negotiation outcome for the calling client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageResponse {
    /// Negotiated language
    pub language: String,

    /// Raw preference header as received
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept_language: Option<String>,

    /// Attribute name the result is stored under
    pub attribute: String,

    pub default_language: String,

    pub priorities: Vec<String>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// Version information
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Semantic version
    pub version: String,

    /// API version
    pub api_version: String,

    /// Build timestamp
    pub build_timestamp: String,
}

/// Build the API router with negotiation installed on `/v1/language`.
pub fn router(negotiator: LanguageNegotiator) -> Router {
    Router::new()
        .route("/v1/language", get(current_language))
        .layer(LanguageNegotiationLayer::new(negotiator.clone()))
        .route("/health", get(health))
        .route("/version", get(version))
        .with_state(negotiator)
}

/// Report the negotiated language for this request
#[instrument(skip(negotiator, headers))]
pub async fn current_language(
    State(negotiator): State<LanguageNegotiator>,
    language: NegotiatedLanguage,
    headers: HeaderMap,
) -> Json<LanguageResponse> {
    let config = negotiator.config();
    let accept_language = headers
        .get(config.accept_header())
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    debug!(language = %language, "Reporting negotiated language");

    Json(LanguageResponse {
        language: language.0,
        accept_language,
        attribute: config.attribute_name().to_string(),
        default_language: negotiator.default_language().to_string(),
        priorities: config.priorities().to_vec(),
    })
}

/// Health check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
    })
}

/// Get API version information
pub async fn version() -> Json<VersionInfo> {
    Json(VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        api_version: "v1".to_string(),
        build_timestamp: option_env!("BUILD_TIMESTAMP")
            .unwrap_or("unknown")
            .to_string(),
    })
}
