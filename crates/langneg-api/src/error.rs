//! API error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JSON body returned for every API error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Rejection for [`crate::NegotiatedLanguage`] when no negotiation
/// middleware ran for the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingNegotiatedLanguage;

impl IntoResponse for MissingNegotiatedLanguage {
    fn into_response(self) -> Response {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let body = ErrorResponse {
            status: status.as_u16(),
            error: "Language negotiation middleware is not installed for this route".to_string(),
            code: Some("MISSING_NEGOTIATED_LANGUAGE".to_string()),
            timestamp: Utc::now(),
        };
        (status, Json(body)).into_response()
    }
}
