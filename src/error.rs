//! Error types

use thiserror::Error;

/// Errors raised by the watcher
#[derive(Error, Debug)]
pub enum WatcherError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Digit out of range: {0} (expected 0-9)")]
    DigitOutOfRange(u8),

    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Invalid quote: {0}")]
    InvalidQuote(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Connection closed: {0}")]
    ConnectionClosed(String),
}

pub type Result<T> = std::result::Result<T, WatcherError>;

impl WatcherError {
    /// Whether the feed supervisor should treat this as a transport failure
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            WatcherError::WebSocket(_)
                | WatcherError::Io(_)
                | WatcherError::Timeout(_)
                | WatcherError::ConnectionClosed(_)
        )
    }
}
