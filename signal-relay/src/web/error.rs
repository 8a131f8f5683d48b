//! Error taxonomy for the HTTP surface.
//!
//! Each variant maps to a status code and the shared
//! `{"status": "error", "message": ...}` envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::signal::ValidationError;
use crate::telegram::ForwardError;

/// Errors a signal request can end in.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body was empty.
    #[error("No data received")]
    NoData,

    /// Request body was not valid JSON.
    #[error("Invalid JSON format")]
    InvalidJson,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to send signal to Telegram: {0}")]
    Forward(#[from] ForwardError),

    /// Anything unanticipated. Detail stays in the logs.
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoData | ApiError::InvalidJson | ApiError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Forward(_) | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_endpoints: Option<Vec<&'static str>>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
            available_endpoints: None,
        }
    }

    pub fn with_endpoints(mut self, endpoints: &[&'static str]) -> Self {
        self.available_endpoints = Some(endpoints.to_vec());
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
