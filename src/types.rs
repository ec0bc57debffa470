//! Core types shared across the watcher

use crate::error::{Result, WatcherError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest digit still classified as "under"
pub const UNDER_MAX: u8 = 4;

/// Last base-10 digit of a tick quote, always in 0..=9
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Digit(u8);

impl Digit {
    pub fn new(value: u8) -> Result<Self> {
        if value > 9 {
            return Err(WatcherError::DigitOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Last decimal digit of `value`
    pub fn wrapping(value: u32) -> Self {
        Self((value % 10) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Digit is above 4
    pub fn is_over(self) -> bool {
        self.0 > UNDER_MAX
    }

    pub fn is_under(self) -> bool {
        !self.is_over()
    }
}

impl TryFrom<u8> for Digit {
    type Error = WatcherError;

    fn try_from(value: u8) -> Result<Self> {
        Digit::new(value)
    }
}

impl<'de> Deserialize<'de> for Digit {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        Digit::new(value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a literal digit string such as "1234567890"
pub fn parse_digits(input: &str) -> Result<Vec<Digit>> {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(|c| {
            c.to_digit(10)
                .ok_or_else(|| WatcherError::InvalidCommand(format!("not a digit: {c:?}")))
                .and_then(|d| Digit::new(d as u8))
        })
        .collect()
}

/// Trading readiness, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Signal {
    Collecting,
    Wait,
    Weak,
    Good,
    Strong,
}

impl Signal {
    pub fn label(&self) -> &'static str {
        match self {
            Signal::Collecting => "Collecting Data...",
            Signal::Wait => "Wait for Better Setup",
            Signal::Weak => "Weak Signal",
            Signal::Good => "Good to Enter",
            Signal::Strong => "Strong Entry Signal",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Feed connection lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "Disconnected"),
            ConnectionState::Connecting => write!(f, "Connecting..."),
            ConnectionState::Connected => write!(f, "Connected"),
            ConnectionState::Error => write!(f, "Error"),
        }
    }
}

/// Check a market symbol identifier such as `R_10` or `1HZ100V`
pub fn validate_symbol(symbol: &str) -> Result<()> {
    let valid = !symbol.is_empty()
        && symbol.len() <= 32
        && symbol.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(WatcherError::InvalidSymbol(symbol.to_string()))
    }
}
