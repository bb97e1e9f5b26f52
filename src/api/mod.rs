//! HTTP layer: the prediction form and its JSON API.
//!
//! Provides a composable `Router` (form at `/`, JSON under `/api/`) and a
//! server lifecycle that binds, serves, and shuts down gracefully.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod render;
pub mod router;
pub mod server;
pub mod types;

pub use router::prediction_router;
pub use server::{bind, serve, start_server_on, PredictionServer, ServerError, ServerSession};
pub use types::ApiContext;
