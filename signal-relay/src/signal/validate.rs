//! Signal payload validation.
//!
//! Turns a decoded JSON body into a [`SignalRequest`], coercing numeric
//! strings the way trading terminals tend to send them.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use super::types::SignalRequest;

/// Fields every signal must carry, in reporting order.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "signal_type",
    "symbol",
    "entry_price",
    "tp_price",
    "sl_price",
    "bot_token",
];

/// Fields a signal may carry.
pub const OPTIONAL_FIELDS: [&str; 5] = [
    "confidence",
    "signal_category",
    "timestamp",
    "channel_id",
    "chat_id",
];

const MIN_BOT_TOKEN_LEN: usize = 10;
const DEFAULT_CATEGORY: &str = "SIGNAL";

/// Reasons a signal payload is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Body was `null` or an empty object.
    #[error("No data received")]
    NoData,

    #[error("Request body must be a JSON object")]
    NotAnObject,

    /// One or more required fields are absent or `null`.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid bot token format")]
    InvalidBotToken,

    #[error("Field '{field}' must be a string")]
    NotText { field: &'static str },

    #[error("Symbol must not be empty")]
    EmptySymbol,

    #[error("Invalid numeric data: {field} must be a number")]
    NotNumeric { field: &'static str },

    #[error("Invalid numeric data: {field} must be an integer")]
    NotInteger { field: &'static str },

    #[error("Invalid numeric data: Prices must be positive ({field})")]
    NonPositivePrice { field: &'static str },

    #[error("Invalid numeric data: Confidence must be between 0-100 (got {0})")]
    ConfidenceOutOfRange(i64),
}

/// Validate a decoded request body and build a [`SignalRequest`].
///
/// Checks run in a fixed order: shape, presence of every required field,
/// bot token format, symbol, then numeric values. The first failing stage
/// determines the error; the presence check reports all missing fields at
/// once.
pub fn validate_signal(body: &Value) -> Result<SignalRequest, ValidationError> {
    let data = match body {
        Value::Null => return Err(ValidationError::NoData),
        Value::Object(map) if map.is_empty() => return Err(ValidationError::NoData),
        Value::Object(map) => map,
        _ => return Err(ValidationError::NotAnObject),
    };

    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| field_value(data, field).is_none())
        .collect();

    if !missing.is_empty() {
        warn!(missing_fields = ?missing, "signal_missing_fields");
        return Err(ValidationError::MissingFields(missing));
    }

    let bot_token = required_text(data, "bot_token")?.trim().to_string();
    if bot_token.chars().count() < MIN_BOT_TOKEN_LEN || !bot_token.contains(':') {
        warn!(token_length = bot_token.len(), "signal_invalid_bot_token");
        return Err(ValidationError::InvalidBotToken);
    }

    let signal_type = required_text(data, "signal_type")?;
    let symbol = required_text(data, "symbol")?;
    if symbol.trim().is_empty() {
        return Err(ValidationError::EmptySymbol);
    }

    let entry_price = required_price(data, "entry_price")?;
    let tp_price = required_price(data, "tp_price")?;
    let sl_price = required_price(data, "sl_price")?;
    let confidence = optional_confidence(data)?;

    let signal_category = field_value(data, "signal_category")
        .and_then(scalar_text)
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    let timestamp = field_value(data, "timestamp").and_then(Value::as_f64);

    let chat_id = ["channel_id", "chat_id"]
        .iter()
        .filter_map(|field| field_value(data, field).and_then(scalar_text))
        .find(|id| !id.trim().is_empty());

    Ok(SignalRequest {
        signal_type,
        symbol,
        entry_price,
        tp_price,
        sl_price,
        bot_token,
        confidence,
        signal_category,
        timestamp,
        chat_id,
    })
}

/// Look up a field, treating JSON `null` as absent.
fn field_value<'a>(data: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    data.get(field).filter(|v| !v.is_null())
}

/// Render a JSON scalar as text; strings are taken verbatim.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn required_text(
    data: &Map<String, Value>,
    field: &'static str,
) -> Result<String, ValidationError> {
    field_value(data, field)
        .and_then(scalar_text)
        .ok_or(ValidationError::NotText { field })
}

/// Coerce a number or numeric string into a finite float.
fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    number.is_finite().then_some(number)
}

/// Coerce an integer, a float (truncated) or an integer string.
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn required_price(
    data: &Map<String, Value>,
    field: &'static str,
) -> Result<f64, ValidationError> {
    let price = field_value(data, field)
        .and_then(as_number)
        .ok_or(ValidationError::NotNumeric { field })?;

    if price <= 0.0 {
        warn!(field = field, price = price, "signal_non_positive_price");
        return Err(ValidationError::NonPositivePrice { field });
    }

    Ok(price)
}

fn optional_confidence(data: &Map<String, Value>) -> Result<u8, ValidationError> {
    let Some(raw) = field_value(data, "confidence") else {
        return Ok(0);
    };

    let confidence = as_integer(raw).ok_or(ValidationError::NotInteger {
        field: "confidence",
    })?;

    u8::try_from(confidence)
        .ok()
        .filter(|c| *c <= 100)
        .ok_or(ValidationError::ConfidenceOutOfRange(confidence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "signal_type": "BUY",
            "symbol": "EURUSD",
            "entry_price": 1.2345,
            "tp_price": 1.24,
            "sl_price": 1.23,
            "bot_token": "123456:ABCDEF",
            "confidence": 80
        })
    }

    fn with(field: &str, value: Value) -> Value {
        let mut body = valid_body();
        body[field] = value;
        body
    }

    fn without(fields: &[&str]) -> Value {
        let mut body = valid_body();
        let map = body.as_object_mut().unwrap();
        for field in fields {
            map.remove(*field);
        }
        body
    }

    #[test]
    fn test_valid_signal() {
        let signal = validate_signal(&valid_body()).unwrap();

        assert_eq!(signal.signal_type, "BUY");
        assert_eq!(signal.symbol, "EURUSD");
        assert_eq!(signal.entry_price, 1.2345);
        assert_eq!(signal.tp_price, 1.24);
        assert_eq!(signal.sl_price, 1.23);
        assert_eq!(signal.bot_token, "123456:ABCDEF");
        assert_eq!(signal.confidence, 80);
        assert_eq!(signal.signal_category, "SIGNAL");
        assert_eq!(signal.timestamp, None);
        assert_eq!(signal.chat_id, None);
    }

    #[test]
    fn test_empty_and_null_body() {
        assert_eq!(validate_signal(&Value::Null), Err(ValidationError::NoData));
        assert_eq!(validate_signal(&json!({})), Err(ValidationError::NoData));
        for body in [json!([1, 2, 3]), json!([]), json!(0), json!(false), json!("")] {
            assert_eq!(
                validate_signal(&body),
                Err(ValidationError::NotAnObject),
                "body {body} should be rejected as a non-object"
            );
        }
    }

    #[test]
    fn test_missing_fields_lists_every_field() {
        let err = validate_signal(&without(&["sl_price", "bot_token", "symbol"])).unwrap_err();

        assert_eq!(
            err,
            ValidationError::MissingFields(vec!["symbol", "sl_price", "bot_token"])
        );
        assert_eq!(
            err.to_string(),
            "Missing required fields: symbol, sl_price, bot_token"
        );
    }

    #[test]
    fn test_null_counts_as_missing() {
        let err = validate_signal(&with("tp_price", Value::Null)).unwrap_err();
        assert_eq!(err, ValidationError::MissingFields(vec!["tp_price"]));
    }

    #[test]
    fn test_bot_token_format() {
        for token in ["short:1", "1234567890", "          ", "  12:3  "] {
            assert_eq!(
                validate_signal(&with("bot_token", json!(token))),
                Err(ValidationError::InvalidBotToken),
                "token {token:?} should be rejected"
            );
        }

        let signal = validate_signal(&with("bot_token", json!("  123456:ABCDEF  "))).unwrap();
        assert_eq!(signal.bot_token, "123456:ABCDEF");
    }

    #[test]
    fn test_non_positive_prices() {
        for field in ["entry_price", "tp_price", "sl_price"] {
            assert_eq!(
                validate_signal(&with(field, json!(0))),
                Err(ValidationError::NonPositivePrice { field })
            );
            assert_eq!(
                validate_signal(&with(field, json!(-1.5))),
                Err(ValidationError::NonPositivePrice { field })
            );
        }
    }

    #[test]
    fn test_non_numeric_prices() {
        for bad in [json!("abc"), json!(true), json!([1.0]), json!("NaN"), json!("inf")] {
            assert_eq!(
                validate_signal(&with("entry_price", bad.clone())),
                Err(ValidationError::NotNumeric { field: "entry_price" }),
                "value {bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let mut body = with("entry_price", json!(" 1.5 "));
        body["confidence"] = json!("75");

        let signal = validate_signal(&body).unwrap();
        assert_eq!(signal.entry_price, 1.5);
        assert_eq!(signal.confidence, 75);
    }

    #[test]
    fn test_confidence_rules() {
        assert_eq!(validate_signal(&without(&["confidence"])).unwrap().confidence, 0);
        assert_eq!(validate_signal(&with("confidence", Value::Null)).unwrap().confidence, 0);
        assert_eq!(validate_signal(&with("confidence", json!(99.9))).unwrap().confidence, 99);
        assert_eq!(validate_signal(&with("confidence", json!(100))).unwrap().confidence, 100);

        assert_eq!(
            validate_signal(&with("confidence", json!(101))),
            Err(ValidationError::ConfidenceOutOfRange(101))
        );
        assert_eq!(
            validate_signal(&with("confidence", json!(-1))),
            Err(ValidationError::ConfidenceOutOfRange(-1))
        );
        assert_eq!(
            validate_signal(&with("confidence", json!("high"))),
            Err(ValidationError::NotInteger { field: "confidence" })
        );
    }

    #[test]
    fn test_empty_symbol() {
        assert_eq!(
            validate_signal(&with("symbol", json!("  "))),
            Err(ValidationError::EmptySymbol)
        );
    }

    #[test]
    fn test_lenient_signal_type() {
        let signal = validate_signal(&with("signal_type", json!("HOLD"))).unwrap();
        assert_eq!(signal.signal_type, "HOLD");
    }

    #[test]
    fn test_optional_fields() {
        let mut body = valid_body();
        body["signal_category"] = json!("SPIKE");
        body["timestamp"] = json!(1_700_000_000);
        body["chat_id"] = json!(-100123);
        body["channel_id"] = json!("@premium");

        let signal = validate_signal(&body).unwrap();
        assert_eq!(signal.signal_category, "SPIKE");
        assert_eq!(signal.timestamp, Some(1_700_000_000.0));
        assert_eq!(signal.chat_id.as_deref(), Some("@premium"));

        body["channel_id"] = Value::Null;
        let signal = validate_signal(&body).unwrap();
        assert_eq!(signal.chat_id.as_deref(), Some("-100123"));
    }

    #[test]
    fn test_non_numeric_timestamp_is_ignored() {
        let signal = validate_signal(&with("timestamp", json!("yesterday"))).unwrap();
        assert_eq!(signal.timestamp, None);
    }
}
