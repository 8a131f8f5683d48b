//! Signal value types.

// =============================================================================
// Signal
// =============================================================================

/// A validated trading signal.
///
/// Produced by [`validate_signal`](super::validate_signal) from a raw JSON
/// body; every field is already coerced, so formatting cannot fail.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRequest {
    /// Direction as sent by the caller, usually "BUY" or "SELL"
    pub signal_type: String,
    /// Instrument symbol, e.g. "EURUSD"
    pub symbol: String,
    pub entry_price: f64,
    pub tp_price: f64,
    pub sl_price: f64,
    /// Bot credential, trimmed
    pub bot_token: String,
    /// Confidence percentage in [0, 100]
    pub confidence: u8,
    /// Category label shown under the headline
    pub signal_category: String,
    /// Epoch seconds the signal was generated at, if the caller sent one
    pub timestamp: Option<f64>,
    /// Destination named by the caller (`channel_id` wins over `chat_id`)
    pub chat_id: Option<String>,
}

impl SignalRequest {
    /// Headline direction derived from `signal_type`.
    pub fn direction(&self) -> Direction {
        Direction::from_signal_type(&self.signal_type)
    }

    /// Destination to deliver to, falling back to `default_chat_id`.
    pub fn destination<'a>(&'a self, default_chat_id: &'a str) -> &'a str {
        self.chat_id.as_deref().unwrap_or(default_chat_id)
    }
}

/// Headline direction of a signal.
///
/// Only an exact "BUY" is a buy; every other value renders as a sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    pub fn from_signal_type(signal_type: &str) -> Self {
        if signal_type == "BUY" {
            Direction::Buy
        } else {
            Direction::Sell
        }
    }

    /// Headline line used in the formatted message.
    pub fn headline(self) -> &'static str {
        match self {
            Direction::Buy => "BUY SIGNAL",
            Direction::Sell => "SELL SIGNAL",
        }
    }
}

// =============================================================================
// Formatting options
// =============================================================================

/// Cosmetic strings that vary between message layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Banner on the first line
    pub title: String,
    /// Handle shown on the "Support:" footer line
    pub support_handle: String,
    /// Name shown on the "Powered by" footer line
    pub brand: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            title: "KAROOSPIKES PREMIUM SIGNALS".to_string(),
            support_handle: "@KaroospikesSupport".to_string(),
            brand: "Karoospikes".to_string(),
        }
    }
}
