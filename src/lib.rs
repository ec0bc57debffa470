//! Digit Watcher
//!
//! Streams ticks for one market, keeps the last digit of each quote in a
//! bounded window, detects short-range digit patterns and rates the window
//! as a trading signal for the "Over 4" contract.
//!
//! ## Architecture
//!
//! ```text
//! Feed (WebSocket) → FeedClient → Analyzer ─→ DigitWindow → PatternDetector → Signal
//!                        ↑            │
//!                  symbol changes     └─→ TradeGate → TradeNotifier
//!                        │
//!                    Dashboard (HTTP: /check, /change_market, /toggle_trade)
//! ```

pub mod analyzer;
pub mod config;
pub mod digits;
pub mod error;
pub mod feed;
pub mod monitor;
pub mod trade;
pub mod types;

#[cfg(test)]
mod config_tests;
