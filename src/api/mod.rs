//! HTTP API module for the Claim Validation & Decision Engine.
//!
//! This module provides the REST endpoints for running the claim pipeline
//! phases (extract, validate, full).

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::ExtractRequest;
pub use response::{ApiError, ProcessResponse};
pub use state::AppState;
