//! Trade-action collaborator

use super::gate::TradeEvent;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Receives fired trades. The return value is never awaited by the feed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TradeNotifier: Send + Sync {
    async fn on_trade(&self, event: TradeEvent);
}

/// Paper notifier: logs the trade, places nothing
#[derive(Debug, Default, Clone)]
pub struct PaperTradeNotifier;

#[async_trait]
impl TradeNotifier for PaperTradeNotifier {
    async fn on_trade(&self, event: TradeEvent) {
        let digits: Vec<String> = event.digits.iter().map(|d| d.to_string()).collect();
        info!(
            "🔁 Mock trade executed on {}: {:?} on Over 4 | {} | last digits [{}]",
            event.symbol,
            event.action,
            event.reason,
            digits.join(", ")
        );
    }
}

/// Hand a trade to the notifier without waiting on it
pub fn dispatch(notifier: Arc<dyn TradeNotifier>, event: TradeEvent) -> JoinHandle<()> {
    tokio::spawn(async move {
        notifier.on_trade(event).await;
    })
}
