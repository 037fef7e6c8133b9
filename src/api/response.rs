//! Response types for the Claim Validation & Decision Engine API.
//!
//! This module defines the success and error response structures and the
//! mapping from [`EngineError`] to HTTP statuses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::engine::ValidationOutcome;
use crate::error::EngineError;
use crate::models::{DecisionResult, DecisionTag};

/// Response body for the validate and full phases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    /// The claim identifier issued for this submission.
    pub claim_id: String,
    /// The coarse outcome bucket.
    pub tag: DecisionTag,
    /// The action label for the outcome.
    pub decision: String,
    /// Human-readable rationale, mirrored from the validation message.
    pub comments: String,
    /// The full decision the engine produced.
    pub validation: DecisionResult,
}

impl From<ValidationOutcome> for ProcessResponse {
    fn from(outcome: ValidationOutcome) -> Self {
        let result = outcome.result;
        Self {
            claim_id: outcome.claim_id,
            tag: result.tag,
            decision: result.decision.clone(),
            comments: result.message.clone(),
            validation: result,
        }
    }
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::MissingEmployeeId => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "MISSING_EMPLOYEE_ID",
                    "Claim payload is missing an employee identifier",
                    "Provide employee_id in the payload or an employee hint for extraction",
                ),
            },
            EngineError::InvalidPayload { message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("INVALID_PAYLOAD", message),
            },
            EngineError::UnknownPhase { value } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "UNKNOWN_PHASE",
                    format!("Unknown pipeline phase: {}", value),
                    "Supported phases are 'extract', 'validate' and 'full'",
                ),
            },
            EngineError::ExtractionFailed { message } => ApiErrorResponse {
                status: StatusCode::BAD_GATEWAY,
                error: ApiError::with_details(
                    "EXTRACTION_FAILED",
                    "Document extraction failed",
                    message,
                ),
            },
            EngineError::StoreUnavailable { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "STORE_UNAVAILABLE",
                    "Reference data store unavailable",
                    message,
                ),
            },
        }
    }
}
