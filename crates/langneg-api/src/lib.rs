//! HTTP integration for Accept-Language negotiation
//!
//! - [`negotiate_language`]: axum middleware for `middleware::from_fn_with_state`
//! - [`LanguageNegotiationLayer`]: the same as a tower layer
//! - [`NegotiatedLanguage`]: extractor for handlers
//! - [`router`]: a small API exposing the negotiation result

pub mod error;
pub mod handlers;
pub mod layer;
pub mod middleware;
pub mod telemetry;

pub use error::{ErrorResponse, MissingNegotiatedLanguage};
pub use handlers::{router, HealthResponse, LanguageResponse, VersionInfo};
pub use layer::{LanguageNegotiationLayer, LanguageNegotiationService};
pub use middleware::{negotiate_language, negotiate_request, NegotiatedLanguage};
pub use telemetry::{init_tracing, LogFormat};
