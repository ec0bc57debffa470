//! Cooldown gate between trade decisions and the trade notifier

use crate::config::TradeConfig;
use crate::digits::{DigitWindow, PatternResult, WindowStats};
use crate::types::Digit;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Contract direction placed on a fired trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeAction {
    #[serde(rename = "CALL")]
    Call,
}

/// A fired trade notification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeEvent {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub action: TradeAction,
    pub reason: String,
    /// Trailing digits at the moment the trade fired
    pub digits: Vec<Digit>,
}

/// Why the gate held back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldReason {
    AutoTradeOff,
    Collecting,
    CoolingDown { remaining: Duration },
    BelowThreshold,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Fire { reason: String },
    Hold(HoldReason),
}

impl GateDecision {
    pub fn should_fire(&self) -> bool {
        matches!(self, GateDecision::Fire { .. })
    }
}

/// Gate enforcing the entry conditions and a minimum interval between trades.
///
/// Owns the bounded trade log; the oldest event is evicted first.
#[derive(Debug)]
pub struct TradeGate {
    over_threshold: usize,
    cooldown: Duration,
    snapshot_len: usize,
    log_capacity: usize,
    log: VecDeque<TradeEvent>,
    last_fired: Option<Instant>,
}

impl TradeGate {
    pub fn new(config: &TradeConfig, over_threshold: usize) -> Self {
        let log_capacity = config.log_capacity.max(1);
        Self {
            over_threshold,
            cooldown: config.cooldown(),
            snapshot_len: config.snapshot_len,
            log_capacity,
            log: VecDeque::with_capacity(log_capacity),
            last_fired: None,
        }
    }

    /// Decide whether a trade should fire for this window state
    pub fn evaluate(
        &self,
        stats: &WindowStats,
        pattern: Option<&PatternResult>,
        auto_trade: bool,
        now: Instant,
    ) -> GateDecision {
        if !auto_trade {
            return GateDecision::Hold(HoldReason::AutoTradeOff);
        }
        if !stats.is_full() {
            return GateDecision::Hold(HoldReason::Collecting);
        }
        if let Some(remaining) = self.cooldown_remaining(now) {
            return GateDecision::Hold(HoldReason::CoolingDown { remaining });
        }

        let over = stats.over_count;
        if over >= self.over_threshold {
            return GateDecision::Fire {
                reason: format!("Over 4 threshold reached ({over}/{})", stats.len),
            };
        }

        match pattern {
            Some(p) if p.is_structural() && over + 1 >= self.over_threshold => {
                GateDecision::Fire {
                    reason: format!(
                        "Pattern-assisted entry: {} ({over}/{})",
                        p.kind.describe(),
                        stats.len
                    ),
                }
            }
            _ => GateDecision::Hold(HoldReason::BelowThreshold),
        }
    }

    /// Evaluate and, on fire, record the trade and start the cooldown
    pub fn try_fire(
        &mut self,
        window: &DigitWindow,
        pattern: Option<&PatternResult>,
        auto_trade: bool,
        symbol: &str,
        now: Instant,
    ) -> Option<TradeEvent> {
        match self.evaluate(&window.stats(), pattern, auto_trade, now) {
            GateDecision::Fire { reason } => {
                Some(self.record(symbol, reason, window.recent(self.snapshot_len), now))
            }
            GateDecision::Hold(_) => None,
        }
    }

    fn record(&mut self, symbol: &str, reason: String, digits: Vec<Digit>, now: Instant) -> TradeEvent {
        let event = TradeEvent {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            symbol: symbol.to_string(),
            action: TradeAction::Call,
            reason,
            digits,
        };

        if self.log.len() >= self.log_capacity {
            self.log.pop_front();
        }
        self.log.push_back(event.clone());
        self.last_fired = Some(now);
        event
    }

    /// Time left before the gate may fire again
    pub fn cooldown_remaining(&self, now: Instant) -> Option<Duration> {
        let last = self.last_fired?;
        let elapsed = now.saturating_duration_since(last);
        (elapsed < self.cooldown).then(|| self.cooldown - elapsed)
    }

    /// Trade log, most recent first
    pub fn history(&self) -> Vec<TradeEvent> {
        self.log.iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Drop the trade log. The cooldown keeps running.
    pub fn clear_log(&mut self) {
        self.log.clear();
    }
}
