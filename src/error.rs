//! Error types for the Claim Validation & Decision Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for the structural and collaborator failures that can abort a request.
//!
//! Business conditions are deliberately absent here: "no applicable policy"
//! and "employee not found" are first-class decision outcomes carried by
//! [`crate::models::DecisionResult`], never errors.

use thiserror::Error;

/// The main error type for the Claim Validation & Decision Engine.
///
/// All fallible operations in the engine return this error type, making it
/// easy to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use expense_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The claim payload carried no employee identifier.
    ///
    /// This is the one extraction gap that cannot be coerced: without an
    /// employee there is nothing to evaluate the claim against.
    #[error("Claim payload is missing an employee identifier")]
    MissingEmployeeId,

    /// The claim payload was structurally invalid (not a JSON object, or
    /// nested fields of a shape the normalizer cannot interpret at all).
    #[error("Invalid claim payload: {message}")]
    InvalidPayload {
        /// A description of the structural violation.
        message: String,
    },

    /// The pipeline phase selector was not one of `extract`, `validate`
    /// or `full`.
    #[error("Unknown pipeline phase: {value}")]
    UnknownPhase {
        /// The value that failed to parse.
        value: String,
    },

    /// The document-understanding collaborator failed for this request.
    #[error("Document extraction failed: {message}")]
    ExtractionFailed {
        /// A description of the extraction failure.
        message: String,
    },

    /// A reference-data store could not serve a lookup.
    #[error("Store unavailable: {message}")]
    StoreUnavailable {
        /// A description of the store failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
