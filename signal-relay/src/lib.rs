//! Signal Relay - Trading signal webhook relay for Telegram.
//!
//! Receives signals from trading terminals over HTTP, validates them,
//! formats a plain-text message and forwards it through the Telegram Bot API.
//!
//! ## Architecture
//!
//! ```text
//! POST /signal → validate_signal → format_signal → MessageSender → Telegram
//! ```

pub mod config;
pub mod signal;
pub mod telegram;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use signal::{format_signal, validate_signal, FormatOptions, SignalRequest, ValidationError};
pub use telegram::{ForwardError, MessageSender, TelegramClient};
pub use web::{create_router, AppState};
