//! HTTP endpoint handlers.
//!
//! The signal handler composes the three steps explicitly:
//! 1. Validate the decoded body
//! 2. Format the message
//! 3. Forward it to Telegram
//!
//! Each step returns a `Result`; the first error becomes the response.

use std::sync::Arc;
use std::time::Instant;

use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::signal::{format_signal, validate_signal, OPTIONAL_FIELDS, REQUIRED_FIELDS};
use crate::telegram::MessageSender;
use crate::web::error::{ApiError, ErrorResponse};
use crate::Config;

/// Service name reported by the introspection endpoints.
pub const SERVICE_NAME: &str = "Karoospikes Webhook Server";

/// Service version reported by the introspection endpoints.
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Routes listed in 404 responses.
pub const AVAILABLE_ENDPOINTS: [&str; 4] = ["/signal", "/health", "/test", "/"];

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sender: Arc<dyn MessageSender>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, sender: Arc<dyn MessageSender>) -> Self {
        Self {
            config: Arc::new(config),
            sender,
            started_at: Instant::now(),
        }
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

// =============================================================================
// Signal Webhook
// =============================================================================

/// Successful signal response.
#[derive(Debug, Serialize)]
pub struct SignalResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub signal_type: String,
    pub symbol: String,
    pub confidence: u8,
}

/// Signal webhook endpoint.
///
/// The body is read as raw bytes so that an empty body, malformed JSON and
/// invalid fields each get their own diagnostic regardless of Content-Type.
pub async fn receive_signal(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SignalResponse>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        warn!("signal_empty_body");
        return Err(ApiError::NoData);
    }

    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body_length = body.len(), "signal_invalid_json");
        ApiError::InvalidJson
    })?;

    let raw_type = payload.get("signal_type").and_then(Value::as_str).unwrap_or("UNKNOWN");
    let raw_symbol = payload.get("symbol").and_then(Value::as_str).unwrap_or("UNKNOWN");
    info!(signal_type = raw_type, symbol = raw_symbol, "signal_received");

    let signal = validate_signal(&payload).map_err(|e| {
        warn!(error = %e, "signal_validation_failed");
        ApiError::from(e)
    })?;

    let message = format_signal(&signal, &state.config.format, Utc::now());
    let chat_id = signal.destination(&state.config.default_chat_id);

    if let Err(e) = state
        .sender
        .send_message(&signal.bot_token, chat_id, &message)
        .await
    {
        error!(
            signal_type = %signal.signal_type,
            symbol = %signal.symbol,
            chat_id = chat_id,
            error = %e,
            "signal_forward_failed"
        );
        return Err(ApiError::from(e));
    }

    info!(
        signal_type = %signal.signal_type,
        symbol = %signal.symbol,
        chat_id = chat_id,
        confidence = signal.confidence,
        "signal_forwarded"
    );

    Ok(Json(SignalResponse {
        status: "success",
        message: "Signal sent to Telegram successfully",
        signal_type: signal.signal_type,
        symbol: signal.symbol,
        confidence: signal.confidence,
    }))
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub uptime_seconds: u64,
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: SERVICE_VERSION,
        timestamp: now_rfc3339(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

// =============================================================================
// Test Endpoints
// =============================================================================

/// Capability listing for manual checks.
pub async fn test_info() -> Json<Value> {
    Json(json!({
        "status": "success",
        "message": format!("{SERVICE_NAME} is operational!"),
        "endpoints": {
            "POST /signal": "Main webhook for trading signals",
            "GET /health": "Health check endpoint",
            "GET /test": "This test endpoint",
            "POST /test": "Echo the request body back",
            "GET /": "API documentation"
        },
        "timestamp": now_rfc3339(),
    }))
}

/// Echo endpoint. Unparseable bodies echo as `{}`.
pub async fn test_echo(body: Bytes) -> Json<Value> {
    let received = serde_json::from_slice::<Value>(&body)
        .ok()
        .filter(|v| !v.is_null())
        .unwrap_or_else(|| json!({}));

    info!(
        body_length = body.len(),
        is_object = received.is_object(),
        "test_signal_received"
    );

    Json(json!({
        "status": "success",
        "message": "Test signal received successfully",
        "received_data": received,
        "timestamp": now_rfc3339(),
    }))
}

// =============================================================================
// Documentation
// =============================================================================

/// API documentation and service information.
pub async fn api_documentation(State(state): State<AppState>) -> Json<Value> {
    let required: Vec<String> = REQUIRED_FIELDS
        .iter()
        .map(|field| match *field {
            "signal_type" => "signal_type (BUY/SELL)".to_string(),
            other => other.to_string(),
        })
        .collect();

    Json(json!({
        "service": SERVICE_NAME,
        "version": SERVICE_VERSION,
        "status": "operational",
        "description": "Trading signal delivery from MT5 to Telegram",
        "endpoints": {
            "POST /signal": {
                "description": "Main webhook endpoint for trading signals",
                "content_type": "application/json",
                "required_fields": required,
                "optional_fields": OPTIONAL_FIELDS,
            },
            "GET /health": "Health check endpoint",
            "GET /test": "Test endpoint for debugging",
            "POST /test": "Echo endpoint for debugging",
            "GET /": "This documentation"
        },
        "features": [
            "Plain-text signal formatting",
            "Per-field validation errors",
            "Single-attempt delivery with bounded timeout",
            "Structured JSON logging"
        ],
        "support": {
            "telegram": state.config.format.support_handle,
        },
        "timestamp": now_rfc3339(),
    }))
}

// =============================================================================
// Fallbacks
// =============================================================================

/// Unmatched route.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Endpoint not found").with_endpoints(&AVAILABLE_ENDPOINTS)),
    )
}

/// Known route, wrong method.
pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new("Method not allowed")),
    )
}
