//! Feed wire format
//!
//! Subscription request:
//!
//! ```json
//! {"ticks": "R_10", "subscribe": 1}
//! ```
//!
//! Tick notification (other fields ignored):
//!
//! ```json
//! {"msg_type": "tick", "tick": {"quote": 6543.21, "symbol": "R_10", "epoch": 1700000000}}
//! ```

use crate::error::{Result, WatcherError};
use crate::types::Digit;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    msg_type: Option<String>,
    #[serde(default)]
    tick: Option<RawTick>,
    #[serde(default)]
    error: Option<FeedError>,
}

#[derive(Debug, Deserialize)]
struct RawTick {
    quote: Value,
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    epoch: Option<i64>,
}

/// Error payload returned by the feed
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// A parsed tick with its quote kept as an exact decimal
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub quote: Decimal,
    pub symbol: Option<String>,
    pub epoch: Option<i64>,
}

impl Tick {
    /// Last digit of the quote's shortest decimal rendering
    pub fn digit(&self) -> Result<Digit> {
        last_digit(self.quote)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Tick(Tick),
    Error(FeedError),
    /// Any other message shape (subscription acks, pings, ...)
    Other(Option<String>),
}

/// Build the subscription request for `symbol`
pub fn subscribe_request(symbol: &str) -> String {
    serde_json::json!({ "ticks": symbol, "subscribe": 1 }).to_string()
}

/// Parse one text frame
pub fn parse_message(text: &str) -> Result<Inbound> {
    let envelope: Envelope = serde_json::from_str(text)?;

    if let Some(error) = envelope.error {
        return Ok(Inbound::Error(error));
    }

    match envelope.tick {
        Some(raw) => Ok(Inbound::Tick(Tick {
            quote: parse_quote(&raw.quote)?,
            symbol: raw.symbol,
            epoch: raw.epoch,
        })),
        None => Ok(Inbound::Other(envelope.msg_type)),
    }
}

fn parse_quote(value: &Value) -> Result<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => return Err(WatcherError::InvalidQuote(other.to_string())),
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| WatcherError::InvalidQuote(text))
}

/// Trailing decimal digit of `quote`, ignoring trailing fractional zeros
pub fn last_digit(quote: Decimal) -> Result<Digit> {
    let rendered = quote.normalize().to_string();
    match rendered.chars().last().and_then(|c| c.to_digit(10)) {
        Some(d) => Ok(Digit::wrapping(d)),
        None => Err(WatcherError::InvalidQuote(rendered)),
    }
}
