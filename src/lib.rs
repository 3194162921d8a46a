//! Integration test harness for the language negotiation workspace.
//!
//! The tests under `tests/` drive `langneg-core` and `langneg-api` together
//! through real axum routers.
