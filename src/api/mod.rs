//! HTTP API module for the earned wage access engine.
//!
//! This module provides the REST API endpoints for running calculations
//! and inspecting the loaded rate tables.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::CalculationRequest;
pub use response::{ApiError, ApiErrorResponse, CalculationResponse, RatesResponse};
pub use state::AppState;
