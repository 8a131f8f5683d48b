//! Trading signal handling.
//!
//! This module provides:
//! - Typed signal values produced from raw JSON payloads
//! - Validation with per-field diagnostics
//! - Plain-text message formatting
//!
//! ## Flow
//!
//! ```text
//! JSON body → validate_signal() → SignalRequest → format_signal() → message text
//! ```

pub mod format;
pub mod types;
pub mod validate;

pub use format::{format_signal, SEPARATOR};
pub use types::{Direction, FormatOptions, SignalRequest};
pub use validate::{validate_signal, ValidationError, OPTIONAL_FIELDS, REQUIRED_FIELDS};
