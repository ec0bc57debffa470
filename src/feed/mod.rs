//! Tick feed supervisor
//!
//! ```text
//!   ┌──────────────┐ connect+subscribe ┌───────────┐
//!   │  Connecting  │──────────────────▶│ Connected │──┐ tick -> Analyzer::ingest
//!   └──────────────┘                   └───────────┘◀─┘
//!          ▲                             │        │
//!          │ reconnect delay     close   │        │ any other failure
//!          │                             ▼        ▼
//!          │                   ┌──────────────┐ ┌───────┐
//!          └───────────────────│ Disconnected │ │ Error │── error delay ──▶ Connecting
//!                              └──────────────┘ └───────┘
//! ```
//!
//! The loop never returns. A symbol change closes the session (reported as
//! Disconnected) and resubscribes without waiting; the window is never
//! cleared by a reconnect.

pub mod message;
pub mod transport;


pub use message::{last_digit, parse_message, subscribe_request, FeedError, Inbound, Tick};
pub use transport::{FeedConnection, FeedConnector, FeedEvent, WsConnector};

use crate::analyzer::{Analyzer, Ingested};
use crate::config::FeedConfig;
use crate::error::{Result, WatcherError};
use crate::trade::{dispatch, TradeNotifier};
use crate::types::ConnectionState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// How a connected session ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Closed,
    SymbolChanged,
}

pub struct FeedClient {
    connector: Arc<dyn FeedConnector>,
    analyzer: Arc<Analyzer>,
    notifier: Arc<dyn TradeNotifier>,
    config: FeedConfig,
}

impl FeedClient {
    pub fn new(
        connector: Arc<dyn FeedConnector>,
        analyzer: Arc<Analyzer>,
        notifier: Arc<dyn TradeNotifier>,
        config: FeedConfig,
    ) -> Self {
        Self {
            connector,
            analyzer,
            notifier,
            config,
        }
    }

    /// Supervisor loop; runs until the task is dropped
    pub async fn run(self) {
        let mut symbol_rx = self.analyzer.symbol_updates();

        loop {
            let delay = match self.run_session(&mut symbol_rx).await {
                Ok(SessionEnd::SymbolChanged) => {
                    // Closed locally; reconnect without backoff
                    self.analyzer.set_connection_state(ConnectionState::Disconnected);
                    info!("Resubscribing for {}", self.analyzer.active_symbol());
                    continue;
                }
                Ok(SessionEnd::Closed) => {
                    self.analyzer.set_connection_state(ConnectionState::Disconnected);
                    warn!(
                        "❌ Feed connection closed. Reconnecting in {:?}...",
                        self.config.reconnect_delay()
                    );
                    self.config.reconnect_delay()
                }
                Err(e) => {
                    self.analyzer.set_connection_state(ConnectionState::Error);
                    if e.is_transport() {
                        warn!(
                            "❌ Feed error: {}. Reconnecting in {:?}...",
                            e,
                            self.config.error_delay()
                        );
                    } else {
                        error!(
                            "Feed session failed: {}. Reconnecting in {:?}...",
                            e,
                            self.config.error_delay()
                        );
                    }
                    self.config.error_delay()
                }
            };

            wait_or_symbol_change(delay, &mut symbol_rx).await;
        }
    }

    /// One connect, subscribe and consume cycle
    pub async fn run_session(&self, symbol_rx: &mut watch::Receiver<String>) -> Result<SessionEnd> {
        let symbol = symbol_rx.borrow_and_update().clone();
        self.analyzer.set_connection_state(ConnectionState::Connecting);

        let mut conn = timeout(self.config.connect_timeout(), self.connector.connect(&self.config.url))
            .await
            .map_err(|_| {
                WatcherError::Timeout(format!(
                    "connecting to feed after {:?}",
                    self.config.connect_timeout()
                ))
            })??;

        if let Err(e) = conn.send_text(subscribe_request(&symbol)).await {
            conn.close().await;
            return Err(e);
        }

        self.analyzer.set_connection_state(ConnectionState::Connected);
        info!("✅ Connected to tick feed for {}", symbol);

        let stale_after = self.config.stale_timeout();
        loop {
            tokio::select! {
                changed = symbol_rx.changed() => {
                    conn.close().await;
                    return Ok(match changed {
                        Ok(()) => SessionEnd::SymbolChanged,
                        Err(_) => SessionEnd::Closed,
                    });
                }
                event = timeout(stale_after, conn.next_event()) => {
                    match event {
                        Err(_) => {
                            conn.close().await;
                            return Err(WatcherError::Timeout(format!(
                                "no feed message for {stale_after:?}"
                            )));
                        }
                        Ok(Err(e)) => return Err(e),
                        Ok(Ok(FeedEvent::Closed)) => return Ok(SessionEnd::Closed),
                        Ok(Ok(FeedEvent::Text(text))) => self.handle_text(&text),
                    }
                }
            }
        }
    }

    /// Parse one frame and feed its digit through the analyzer
    pub fn handle_text(&self, text: &str) {
        let inbound = match parse_message(text) {
            Ok(inbound) => inbound,
            Err(e) => {
                warn!("Error parsing feed message: {}", e);
                return;
            }
        };

        match inbound {
            Inbound::Tick(tick) => {
                let digit = match tick.digit() {
                    Ok(d) => d,
                    Err(e) => {
                        warn!("Dropping tick: {}", e);
                        return;
                    }
                };

                debug!(
                    "📊 {}: {} -> Digit: {}",
                    tick.symbol.as_deref().unwrap_or("?"),
                    tick.quote,
                    digit
                );

                if let Ingested::Accepted { trade: Some(event) } =
                    self.analyzer.ingest(tick.symbol.as_deref(), digit)
                {
                    info!("Trade fired: {}", event.reason);
                    dispatch(self.notifier.clone(), event);
                }
            }
            Inbound::Error(err) => {
                warn!("Feed returned error {}: {}", err.code, err.message);
            }
            Inbound::Other(msg_type) => {
                debug!("Ignoring feed message of type {:?}", msg_type);
            }
        }
    }
}

async fn wait_or_symbol_change(delay: Duration, symbol_rx: &mut watch::Receiver<String>) {
    tokio::select! {
        _ = tokio::time::sleep(delay) => {}
        changed = symbol_rx.changed() => {
            if changed.is_ok() {
                debug!("Symbol changed during backoff, reconnecting now");
            }
        }
    }
}
