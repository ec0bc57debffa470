//! Monitoring: dashboard API and connection state logging

pub mod dashboard;

pub use dashboard::{create_router, start_dashboard};

use crate::analyzer::Analyzer;
use crate::types::ConnectionState;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Log every connection state transition until the analyzer is dropped
pub fn spawn_connection_logger(analyzer: &Arc<Analyzer>) -> JoinHandle<()> {
    let mut rx = analyzer.subscribe_connection();
    let analyzer = Arc::downgrade(analyzer);

    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(state) => {
                    let symbol = analyzer
                        .upgrade()
                        .map(|a| a.active_symbol())
                        .unwrap_or_default();
                    match state {
                        ConnectionState::Error => warn!("Feed status [{}]: {}", symbol, state),
                        _ => info!("Feed status [{}]: {}", symbol, state),
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Connection logger skipped {} transitions", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::time::Duration;

    #[tokio::test]
    async fn test_logger_stops_when_analyzer_dropped() {
        let analyzer = Arc::new(Analyzer::new(&Config::default()));
        let handle = spawn_connection_logger(&analyzer);

        analyzer.set_connection_state(ConnectionState::Connecting);
        analyzer.set_connection_state(ConnectionState::Error);
        drop(analyzer);

        let result = tokio::time::timeout(Duration::from_secs(1), handle).await;
        tokio_test::assert_ok!(tokio_test::assert_ok!(result));
    }
}
