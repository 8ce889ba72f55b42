//! API error types with HTTP response mapping.
//!
//! This is the only place that knows which status code each failure maps to.

use std::collections::BTreeMap;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use common::IdentityErrors;
use domain::InventoryError;
use serde::Serialize;
use thiserror::Error;

/// Message returned for every internal failure. Details are only logged.
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// API-level error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An inventory operation was rejected or failed.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Identity fields failed validation.
    #[error("{0}")]
    Validation(IdentityErrors),

    /// The request could not be understood (bad body, missing parameter).
    #[error("{0}")]
    BadRequest(String),
}

impl From<IdentityErrors> for ApiError {
    fn from(errors: IdentityErrors) -> Self {
        ApiError::Validation(errors)
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "fieldErrors", skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<BTreeMap<String, String>>,
}

impl ErrorResponse {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            timestamp: Utc::now(),
            field_errors: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self {
            ApiError::Inventory(err) => inventory_error_to_response(err),
            ApiError::Validation(errors) => {
                tracing::warn!(%errors, "validation error occurred");
                ErrorResponse {
                    field_errors: Some(errors.into_fields()),
                    ..ErrorResponse::new(StatusCode::BAD_REQUEST, "Validation failed")
                }
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!(error = %msg, "bad request");
                ErrorResponse::new(StatusCode::BAD_REQUEST, msg)
            }
        };

        let status =
            StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}

fn inventory_error_to_response(err: InventoryError) -> ErrorResponse {
    let status = match &err {
        InventoryError::NotFound(_) => StatusCode::NOT_FOUND,
        InventoryError::AlreadyExists(_) | InventoryError::Conflict(_) => StatusCode::CONFLICT,
        InventoryError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        InventoryError::Store(store_err) => {
            tracing::error!(error = %store_err, "unhandled store error");
            return ErrorResponse::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE);
        }
    };

    tracing::info!(status = status.as_u16(), error = %err, "request rejected");
    ErrorResponse::new(status, err.to_string())
}
