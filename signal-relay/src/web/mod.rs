//! Web server module for receiving trading signal webhooks.
//!
//! This module provides the HTTP surface of the relay:
//! - `POST /signal` validates, formats and forwards a signal
//! - `GET /health`, `GET|POST /test` and `GET /` for introspection
//! - JSON fallbacks for unknown routes, wrong methods and panics

pub mod error;
pub mod handlers;

use std::any::Any;

use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::error;

pub use error::{ApiError, ErrorResponse};
pub use handlers::{
    api_documentation, health, method_not_allowed, not_found, receive_signal, test_echo,
    test_info, AppState, HealthResponse, SignalResponse, AVAILABLE_ENDPOINTS, SERVICE_NAME,
    SERVICE_VERSION,
};

/// Build the router with every route, fallback and middleware layer.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api_documentation).fallback(method_not_allowed))
        .route("/signal", post(receive_signal).fallback(method_not_allowed))
        .route("/health", get(health).fallback(method_not_allowed))
        .route(
            "/test",
            get(test_info).post(test_echo).fallback(method_not_allowed),
        )
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Convert a handler panic into the generic 500 envelope.
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };

    error!(panic = %detail, "handler_panicked");

    ApiError::Internal.into_response()
}
