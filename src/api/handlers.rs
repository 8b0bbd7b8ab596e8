//! HTTP request handlers for the earned wage access API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::normalize_country_code;
use crate::error::EngineError;
use crate::models::CalculationInput;

use super::request::CalculationRequest;
use super::response::{ApiError, ApiErrorResponse, CalculationResponse, RatesResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/rates/:country", get(rates_handler))
        .with_state(state)
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, error: EngineError) -> Response {
    if error.is_client_error() {
        info!(correlation_id = %correlation_id, error = %error, "Request rejected");
    } else {
        warn!(correlation_id = %correlation_id, error = %error, "Request failed");
    }
    let api_error: ApiErrorResponse = error.into();
    json_response(api_error.status, api_error.error)
}

fn rejection_error(correlation_id: Uuid, rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            // serde's message, e.g. "missing field `salary`"
            let body_text = err.body_text();
            info!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            info!(
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
    }
}

/// Handler for POST /calculate endpoint.
///
/// Validates the request, loads the country's rate table through the cache
/// and returns the calculation wrapped in a [`CalculationResponse`].
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = rejection_error(correlation_id, rejection);
            return json_response(StatusCode::BAD_REQUEST, error);
        }
    };

    let input: CalculationInput = request.into();
    // Reject bad input before touching configuration.
    if let Err(err) = input.validate() {
        return error_response(correlation_id, err);
    }

    let rates = match state.cache().get(&input.country_code).await {
        Ok(rates) => rates,
        Err(err) => return error_response(correlation_id, err),
    };

    let start_time = Instant::now();
    match state.engine().calculate(&input, &rates) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                country = %result.country_code,
                profile = result.profile.as_str(),
                net_pay = %result.net_pay,
                accessible_now = %result.accessible_now,
                fallbacks = result.audit_trace.fallback_count(),
                duration_us = start_time.elapsed().as_micros(),
                "Calculation completed successfully"
            );
            json_response(StatusCode::OK, CalculationResponse::new(correlation_id, result))
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /rates/:country endpoint.
///
/// Returns the parsed rate table for inspection.
async fn rates_handler(State(state): State<AppState>, Path(country): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, country = %country, "Processing rates request");

    let country = match normalize_country_code(&country) {
        Ok(country) => country,
        Err(err) => return error_response(correlation_id, err),
    };

    match state.cache().get(&country).await {
        Ok(table) => json_response(StatusCode::OK, RatesResponse::new(country, &table)),
        Err(err) => error_response(correlation_id, err),
    }
}
