//! Shared analyzer state
//!
//! One [`Analyzer`] is shared (via `Arc`) between the feed task, which is the
//! only writer of digits and connection state, and the dashboard, which
//! reads snapshots and issues the two commands. All state lives behind a
//! single mutex so a snapshot never mixes two window states. Critical
//! sections are short and never await.

#[cfg(test)]
mod tests;

use crate::config::{Config, SignalConfig};
use crate::digits::{self, DigitWindow, PatternResult};
use crate::error::Result;
use crate::trade::{TradeEvent, TradeGate};
use crate::types::{validate_symbol, ConnectionState, Digit, Signal};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::time::Instant;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

/// Shown instead of a prediction until the window is full
pub const ANALYZING_PLACEHOLDER: &str = "Analyzing patterns...";

struct Inner {
    window: DigitWindow,
    /// Digits ingested since startup, across symbol changes
    total_digits: u64,
    symbol: String,
    auto_trade: bool,
    connection: ConnectionState,
    gate: TradeGate,
    last_tick_at: Option<DateTime<Utc>>,
}

/// Point-in-time view served to the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub symbol: String,
    pub last_digits: Vec<Digit>,
    pub over_count: usize,
    pub total_digits: u64,
    pub over_percentage: f64,
    pub signal: Signal,
    pub signal_label: &'static str,
    pub predicted: String,
    pub prediction: Option<PatternResult>,
    pub confidence: u8,
    pub digit_counts: [usize; 10],
    /// Most recent first
    pub trade_history: Vec<TradeEvent>,
    pub connection_status: ConnectionState,
    pub auto_trade: bool,
    pub last_tick_at: Option<DateTime<Utc>>,
}

/// Outcome of pushing one digit
#[derive(Debug, Clone)]
pub enum Ingested {
    Accepted { trade: Option<TradeEvent> },
    /// Tick belonged to a symbol that is no longer active
    Stale,
}

pub struct Analyzer {
    inner: Mutex<Inner>,
    over_threshold: usize,
    signal_config: SignalConfig,
    symbol_tx: watch::Sender<String>,
    state_tx: broadcast::Sender<ConnectionState>,
}

impl Analyzer {
    pub fn new(config: &Config) -> Self {
        let symbol = config.feed.default_symbol.clone();
        let (symbol_tx, _) = watch::channel(symbol.clone());
        let (state_tx, _) = broadcast::channel(32);

        Self {
            inner: Mutex::new(Inner {
                window: DigitWindow::new(config.analysis.window_capacity),
                total_digits: 0,
                symbol,
                auto_trade: config.trade.auto_trade,
                connection: ConnectionState::Disconnected,
                gate: TradeGate::new(&config.trade, config.analysis.over_threshold),
                last_tick_at: None,
            }),
            over_threshold: config.analysis.over_threshold,
            signal_config: config.signal.clone(),
            symbol_tx,
            state_tx,
        }
    }

    /// Receiver that changes whenever the active symbol is replaced
    pub fn symbol_updates(&self) -> watch::Receiver<String> {
        self.symbol_tx.subscribe()
    }

    /// Stream of connection state transitions
    pub fn subscribe_connection(&self) -> broadcast::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    pub fn active_symbol(&self) -> String {
        self.inner.lock().symbol.clone()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.inner.lock().connection
    }

    pub fn auto_trade(&self) -> bool {
        self.inner.lock().auto_trade
    }

    pub fn set_connection_state(&self, state: ConnectionState) {
        {
            let mut inner = self.inner.lock();
            if inner.connection == state {
                return;
            }
            inner.connection = state;
        }
        // No subscribers is fine
        let _ = self.state_tx.send(state);
    }

    /// Push a digit and evaluate the trade gate
    pub fn ingest(&self, tick_symbol: Option<&str>, digit: Digit) -> Ingested {
        self.ingest_at(tick_symbol, digit, Instant::now())
    }

    pub fn ingest_at(&self, tick_symbol: Option<&str>, digit: Digit, now: Instant) -> Ingested {
        let mut inner = self.inner.lock();

        if let Some(tick_symbol) = tick_symbol {
            if tick_symbol != inner.symbol {
                debug!("Dropping {} tick, active symbol is {}", tick_symbol, inner.symbol);
                return Ingested::Stale;
            }
        }

        inner.window.push(digit);
        inner.total_digits += 1;
        inner.last_tick_at = Some(Utc::now());

        let Inner {
            window,
            gate,
            symbol,
            auto_trade,
            ..
        } = &mut *inner;

        let trade = if *auto_trade {
            let pattern = digits::detect(&window.snapshot());
            gate.try_fire(window, pattern.as_ref(), true, symbol, now)
        } else {
            None
        };

        Ingested::Accepted { trade }
    }

    /// Consistent view of window, statistics, signal and trade log
    pub fn snapshot(&self) -> Snapshot {
        let inner = self.inner.lock();

        let last_digits = inner.window.snapshot();
        let stats = inner.window.stats();
        let pattern = digits::detect(&last_digits);
        let signal = digits::classify(
            &stats,
            pattern.as_ref(),
            self.over_threshold,
            &self.signal_config,
        );

        let pattern = pattern.filter(|_| stats.is_full());
        let predicted = pattern
            .as_ref()
            .map(|p| p.to_string())
            .unwrap_or_else(|| ANALYZING_PLACEHOLDER.to_string());
        let confidence = pattern.as_ref().map(|p| p.confidence).unwrap_or(0);

        Snapshot {
            symbol: inner.symbol.clone(),
            over_count: stats.over_count,
            total_digits: inner.total_digits,
            over_percentage: stats.over_percentage(),
            signal,
            signal_label: signal.label(),
            predicted,
            prediction: pattern,
            confidence,
            digit_counts: stats.counts,
            trade_history: inner.gate.history(),
            connection_status: inner.connection,
            auto_trade: inner.auto_trade,
            last_tick_at: inner.last_tick_at,
            last_digits,
        }
    }

    /// Switch the feed to `symbol`; always clears the window and trade log
    pub fn change_symbol(&self, symbol: &str) -> Result<()> {
        validate_symbol(symbol)?;

        {
            let mut inner = self.inner.lock();
            inner.symbol = symbol.to_string();
            inner.window.clear();
            inner.gate.clear_log();
            inner.last_tick_at = None;
        }

        self.symbol_tx.send_replace(symbol.to_string());
        info!("Market changed to: {}", symbol);
        Ok(())
    }

    pub fn set_auto_trade(&self, enabled: bool) {
        let changed = {
            let mut inner = self.inner.lock();
            std::mem::replace(&mut inner.auto_trade, enabled) != enabled
        };
        if changed {
            info!(
                "🔄 Auto-trade is now {}",
                if enabled { "enabled" } else { "disabled" }
            );
        }
    }
}
