//! API module for HTTP and SSE endpoints
//!
//! REST endpoints carry the client-facing operations and point reads;
//! SSE endpoints carry the long-lived subscriptions.

pub mod http;
pub mod rest;
pub mod sse;
pub mod state;

pub use http::create_router;
pub use state::AppState;
