//! HTTP endpoint handlers.
//!
//! - `form`: HTML page at `/`
//! - `predict`: JSON prediction API
//! - `health`, `model_info`: service introspection

pub mod form;
pub mod health;
pub mod model_info;
pub mod predict;
