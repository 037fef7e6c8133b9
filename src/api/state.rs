//! Application state for the Claim Validation & Decision Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::engine::ClaimPipeline;

/// Shared application state.
///
/// Contains the claim pipeline shared across all request handlers. The
/// pipeline itself is stateless per request, so cloning the state is cheap
/// and safe.
#[derive(Clone)]
pub struct AppState {
    /// The claim lifecycle pipeline.
    pipeline: Arc<ClaimPipeline>,
}

impl AppState {
    /// Creates a new application state over the given pipeline.
    pub fn new(pipeline: ClaimPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Returns a reference to the pipeline.
    pub fn pipeline(&self) -> &ClaimPipeline {
        &self.pipeline
    }
}
