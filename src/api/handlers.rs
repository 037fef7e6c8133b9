//! HTTP request handlers for the Claim Validation & Decision Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::{Phase, RequestContext};

use super::request::ExtractRequest;
use super::response::{ApiError, ApiErrorResponse, ProcessResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/claims/:phase", post(process_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Handler for GET /health.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}

/// Handler for POST /claims/{phase}.
///
/// The phase selector chooses one of the pipeline operations; the body is
/// an [`ExtractRequest`] for extract/full and the claim payload itself for
/// validate.
async fn process_handler(
    State(state): State<AppState>,
    Path(phase): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    // Correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, phase = %phase, "Processing claim request");

    let phase: Phase = match phase.parse() {
        Ok(phase) => phase,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Unknown phase");
            return ApiErrorResponse::from(err).into_response();
        }
    };

    // Handle JSON parsing errors
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    ApiError::malformed_json(body_text)
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    let ctx = RequestContext::new(Utc::now().date_naive());

    match phase {
        Phase::Extract => {
            let request = match parse_extract_request(body) {
                Ok(request) => request,
                Err(response) => return response,
            };
            match state
                .pipeline()
                .extract(&request.document_id, request.employee_hint.as_deref(), &ctx)
            {
                Ok(claim) => {
                    info!(
                        correlation_id = %correlation_id,
                        employee_id = %claim.employee_id,
                        "Extraction completed"
                    );
                    (StatusCode::OK, Json(claim)).into_response()
                }
                Err(err) => {
                    warn!(correlation_id = %correlation_id, error = %err, "Extraction failed");
                    ApiErrorResponse::from(err).into_response()
                }
            }
        }
        Phase::Validate => match state.pipeline().validate(&body, &ctx) {
            Ok(outcome) => {
                info!(
                    correlation_id = %correlation_id,
                    claim_id = %outcome.claim_id,
                    tag = ?outcome.result.tag,
                    "Validation completed"
                );
                (StatusCode::OK, Json(ProcessResponse::from(outcome))).into_response()
            }
            Err(err) => {
                warn!(correlation_id = %correlation_id, error = %err, "Validation failed");
                ApiErrorResponse::from(err).into_response()
            }
        },
        Phase::Full => {
            let request = match parse_extract_request(body) {
                Ok(request) => request,
                Err(response) => return response,
            };
            match state
                .pipeline()
                .full(&request.document_id, request.employee_hint.as_deref(), &ctx)
            {
                Ok(outcome) => {
                    info!(
                        correlation_id = %correlation_id,
                        claim_id = %outcome.claim_id,
                        tag = ?outcome.result.tag,
                        "Full pipeline completed"
                    );
                    (StatusCode::OK, Json(ProcessResponse::from(outcome))).into_response()
                }
                Err(err) => {
                    warn!(correlation_id = %correlation_id, error = %err, "Full pipeline failed");
                    ApiErrorResponse::from(err).into_response()
                }
            }
        }
    }
}

fn parse_extract_request(body: Value) -> Result<ExtractRequest, Response> {
    serde_json::from_value(body).map_err(|err| {
        ApiErrorResponse {
            status: StatusCode::BAD_REQUEST,
            error: ApiError::new("INVALID_PAYLOAD", err.to_string()),
        }
        .into_response()
    })
}
