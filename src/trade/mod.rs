//! Auto-trade gate and trade notifications

pub mod gate;
pub mod notifier;


pub use gate::{GateDecision, HoldReason, TradeAction, TradeEvent, TradeGate};
pub use notifier::{dispatch, PaperTradeNotifier, TradeNotifier};
