//! Plain-text message layout for Telegram.
//!
//! The message is sent without a parse mode, so nothing here is escaped.

use chrono::{DateTime, Utc};

use super::types::{FormatOptions, SignalRequest};

/// Separator line framing the message.
pub const SEPARATOR: &str = "-----------------------------------";

/// Format a validated signal into the fixed message layout.
///
/// The date/time line uses the signal's own timestamp when it carries a
/// representable one, otherwise `now`. Output depends only on the inputs.
pub fn format_signal(signal: &SignalRequest, options: &FormatOptions, now: DateTime<Utc>) -> String {
    let at = signal_time(signal.timestamp, now);

    let lines = [
        options.title.clone(),
        SEPARATOR.to_string(),
        String::new(),
        signal.direction().headline().to_string(),
        String::new(),
        signal.signal_category.clone(),
        String::new(),
        format!("{} {}", signal.signal_type, signal.symbol),
        String::new(),
        format!("Entry: {:.5}", signal.entry_price),
        format!("Take Profit: {:.5}", signal.tp_price),
        format!("Stop Loss: {:.5}", signal.sl_price),
        String::new(),
        format!("Confidence: {}%", signal.confidence),
        format!("Time: {} {}", at.format("%Y.%m.%d"), at.format("%H:%M:%S")),
        String::new(),
        "Professional Trading Signals".to_string(),
        format!("Support: {}", options.support_handle),
        "Risk Warning: Trading involves risk".to_string(),
        format!("Powered by {}", options.brand),
        String::new(),
        SEPARATOR.to_string(),
    ];

    lines.join("\n")
}

/// Resolve the instant shown on the message, truncated to whole seconds.
fn signal_time(timestamp: Option<f64>, now: DateTime<Utc>) -> DateTime<Utc> {
    timestamp
        .filter(|ts| ts.is_finite())
        .and_then(|ts| DateTime::from_timestamp(ts.floor() as i64, 0))
        .unwrap_or(now)
}
