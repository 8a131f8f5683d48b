//! Configuration module for environment variable parsing.
//!
//! Every setting has a default, so the relay starts with an empty environment.

use std::env;
use std::time::Duration;

use tracing::warn;

use crate::signal::FormatOptions;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Destination used when a signal names neither `channel_id` nor `chat_id`
    pub default_chat_id: String,

    /// Base URL of the Telegram Bot API, without a trailing slash
    pub telegram_api_url: String,

    /// Outbound request timeout in milliseconds
    pub request_timeout_ms: u64,

    /// Cosmetic strings for the formatted message
    pub format: FormatOptions,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = FormatOptions::default();

        Config {
            port: parse_port("PORT", 5000),

            default_chat_id: non_empty("DEFAULT_CHAT_ID")
                .unwrap_or_else(|| "@default_channel".to_string()),

            telegram_api_url: non_empty("TELEGRAM_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "https://api.telegram.org".to_string()),

            request_timeout_ms: parse_timeout("REQUEST_TIMEOUT_MS", 15_000),

            format: FormatOptions {
                title: non_empty("SIGNAL_TITLE").unwrap_or(defaults.title),
                support_handle: non_empty("SUPPORT_HANDLE").unwrap_or(defaults.support_handle),
                brand: non_empty("SIGNAL_BRAND").unwrap_or(defaults.brand),
            },
        }
    }

    /// Outbound request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 5000,
            default_chat_id: "@default_channel".to_string(),
            telegram_api_url: "https://api.telegram.org".to_string(),
            request_timeout_ms: 15_000,
            format: FormatOptions::default(),
        }
    }
}

/// Read a variable, treating blank values as unset.
fn non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a listen port, falling back to `default`.
fn parse_port(name: &str, default: u16) -> u16 {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse::<u16>() {
        Ok(port) if port > 0 => port,
        _ => {
            warn!(env_var = name, value = %raw, "Invalid port value, using default");
            default
        }
    }
}

/// Parse a positive millisecond timeout, falling back to `default`.
fn parse_timeout(name: &str, default: u64) -> u64 {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => ms,
        _ => {
            warn!(env_var = name, value = %raw, "Invalid timeout value, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timeout_valid() {
        env::set_var("TEST_TIMEOUT_VALID", "2500");
        assert_eq!(parse_timeout("TEST_TIMEOUT_VALID", 15_000), 2500);
        env::remove_var("TEST_TIMEOUT_VALID");
    }

    #[test]
    fn test_parse_timeout_rejects_zero_and_garbage() {
        env::set_var("TEST_TIMEOUT_ZERO", "0");
        assert_eq!(parse_timeout("TEST_TIMEOUT_ZERO", 15_000), 15_000);
        env::remove_var("TEST_TIMEOUT_ZERO");

        env::set_var("TEST_TIMEOUT_GARBAGE", "soon");
        assert_eq!(parse_timeout("TEST_TIMEOUT_GARBAGE", 15_000), 15_000);
        env::remove_var("TEST_TIMEOUT_GARBAGE");
    }

    #[test]
    fn test_parse_port() {
        env::set_var("TEST_PORT_VALID", "8080");
        assert_eq!(parse_port("TEST_PORT_VALID", 5000), 8080);
        env::remove_var("TEST_PORT_VALID");

        for bad in ["http", "70000", "0", "-1"] {
            env::set_var("TEST_PORT_INVALID", bad);
            assert_eq!(parse_port("TEST_PORT_INVALID", 5000), 5000, "port {bad:?}");
        }
        env::remove_var("TEST_PORT_INVALID");

        assert_eq!(parse_port("NONEXISTENT_PORT_VAR", 5000), 5000);
    }

    #[test]
    fn test_parse_timeout_default() {
        assert_eq!(parse_timeout("NONEXISTENT_TIMEOUT_VAR", 42), 42);
    }

    #[test]
    fn test_non_empty_treats_blank_as_unset() {
        env::set_var("TEST_BLANK_VALUE", "   ");
        assert_eq!(non_empty("TEST_BLANK_VALUE"), None);
        env::remove_var("TEST_BLANK_VALUE");

        env::set_var("TEST_PADDED_VALUE", " @signals ");
        assert_eq!(non_empty("TEST_PADDED_VALUE"), Some("@signals".to_string()));
        env::remove_var("TEST_PADDED_VALUE");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.default_chat_id, "@default_channel");
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
    }
}
