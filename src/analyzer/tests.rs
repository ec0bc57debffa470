//! Unit tests for the shared analyzer

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::config::Config;
    use crate::error::WatcherError;
    use crate::types::{parse_digits, ConnectionState, Signal};
    use std::time::{Duration, Instant};

    fn analyzer(auto_trade: bool) -> Analyzer {
        let mut config = Config::default();
        config.trade.auto_trade = auto_trade;
        Analyzer::new(&config)
    }

    fn feed(analyzer: &Analyzer, input: &str, start: Instant) -> Vec<TradeEvent> {
        parse_digits(input)
            .unwrap()
            .into_iter()
            .enumerate()
            .filter_map(|(i, d)| {
                let now = start + Duration::from_millis(i as u64 * 10);
                match analyzer.ingest_at(Some("R_10"), d, now) {
                    Ingested::Accepted { trade } => trade,
                    Ingested::Stale => None,
                }
            })
            .collect()
    }

    fn values(snapshot: &Snapshot) -> Vec<u8> {
        snapshot.last_digits.iter().map(|d| d.value()).collect()
    }

    #[test]
    fn test_initial_snapshot() {
        let snapshot = analyzer(false).snapshot();
        assert_eq!(snapshot.symbol, "R_10");
        assert!(snapshot.last_digits.is_empty());
        assert_eq!(snapshot.signal, Signal::Collecting);
        assert_eq!(snapshot.predicted, ANALYZING_PLACEHOLDER);
        assert!(snapshot.prediction.is_none());
        assert_eq!(snapshot.connection_status, ConnectionState::Disconnected);
        assert_eq!(snapshot.over_percentage, 0.0);
    }

    #[test]
    fn test_snapshot_reflects_window() {
        let analyzer = analyzer(false);
        feed(&analyzer, "5678950123", Instant::now());

        let snapshot = analyzer.snapshot();
        assert_eq!(values(&snapshot), vec![5, 6, 7, 8, 9, 5, 0, 1, 2, 3]);
        assert_eq!(snapshot.over_count, 6);
        assert_eq!(snapshot.over_percentage, 60.0);
        assert_eq!(snapshot.digit_counts[5], 2);
        assert_eq!(snapshot.digit_counts.iter().sum::<usize>(), 10);
        assert_eq!(snapshot.total_digits, 10);
        // 5,6,7 is an ascending run: 3 (threshold) + 2 (structural)
        assert_eq!(snapshot.signal, Signal::Strong);
        assert_eq!(snapshot.predicted, "8 - Ascending sequence detected");
        assert_eq!(snapshot.confidence, 85);
    }

    #[test]
    fn test_prediction_waits_for_full_window() {
        let analyzer = analyzer(false);
        feed(&analyzer, "567895012", Instant::now());

        let snapshot = analyzer.snapshot();
        assert_eq!(snapshot.last_digits.len(), 9);
        assert_eq!(snapshot.signal, Signal::Collecting);
        assert_eq!(snapshot.predicted, ANALYZING_PLACEHOLDER);
        assert!(snapshot.prediction.is_none());
        assert_eq!(snapshot.confidence, 0);

        feed(&analyzer, "3", Instant::now());
        let snapshot = analyzer.snapshot();
        assert_ne!(snapshot.signal, Signal::Collecting);
        assert_eq!(snapshot.predicted, "8 - Ascending sequence detected");
    }

    #[test]
    fn test_total_digits_survives_eviction() {
        let analyzer = analyzer(false);
        feed(&analyzer, "123456789012345", Instant::now());
        let snapshot = analyzer.snapshot();
        assert_eq!(snapshot.last_digits.len(), 10);
        assert_eq!(snapshot.total_digits, 15);
    }

    #[test]
    fn test_no_trades_without_auto_trade() {
        let analyzer = analyzer(false);
        let trades = feed(&analyzer, "5678950123", Instant::now());
        assert!(trades.is_empty());
        assert!(analyzer.snapshot().trade_history.is_empty());
    }

    #[test]
    fn test_auto_trade_fires_once_per_cooldown() {
        let analyzer = analyzer(true);
        // Window fills at the tenth digit with six over; the next ticks
        // keep it eligible but land inside the cooldown.
        let trades = feed(&analyzer, "567895012399", Instant::now());
        assert_eq!(trades.len(), 1);

        let snapshot = analyzer.snapshot();
        assert_eq!(snapshot.trade_history.len(), 1);
        assert_eq!(snapshot.last_digits.len(), 10);
    }

    #[test]
    fn test_toggle_auto_trade() {
        let analyzer = analyzer(false);
        analyzer.set_auto_trade(true);
        assert!(analyzer.auto_trade());
        analyzer.set_auto_trade(true);
        assert!(analyzer.auto_trade());
        analyzer.set_auto_trade(false);
        assert!(!analyzer.snapshot().auto_trade);
    }

    #[test]
    fn test_symbol_change_clears_state_while_disconnected() {
        let analyzer = analyzer(true);
        feed(&analyzer, "5678950123", Instant::now());
        assert_eq!(analyzer.snapshot().trade_history.len(), 1);
        assert_eq!(analyzer.connection_state(), ConnectionState::Disconnected);

        analyzer.change_symbol("R_50").unwrap();

        let snapshot = analyzer.snapshot();
        assert_eq!(snapshot.symbol, "R_50");
        assert!(snapshot.last_digits.is_empty());
        assert!(snapshot.trade_history.is_empty());
        assert_eq!(snapshot.total_digits, 10);
    }

    #[test]
    fn test_same_symbol_still_resets() {
        let analyzer = analyzer(false);
        feed(&analyzer, "1234", Instant::now());
        analyzer.change_symbol("R_10").unwrap();
        assert!(analyzer.snapshot().last_digits.is_empty());
    }

    #[test]
    fn test_invalid_symbol_rejected_without_mutation() {
        let analyzer = analyzer(false);
        feed(&analyzer, "1234", Instant::now());

        let err = analyzer.change_symbol("R 10; drop").unwrap_err();
        assert!(matches!(err, WatcherError::InvalidSymbol(_)));
        assert!(analyzer.change_symbol("").is_err());

        let snapshot = analyzer.snapshot();
        assert_eq!(snapshot.symbol, "R_10");
        assert_eq!(snapshot.last_digits.len(), 4);
    }

    #[test]
    fn test_ticks_for_previous_symbol_are_dropped() {
        let analyzer = analyzer(false);
        analyzer.change_symbol("R_25").unwrap();

        let digit = parse_digits("7").unwrap()[0];
        assert!(matches!(analyzer.ingest(Some("R_10"), digit), Ingested::Stale));
        assert!(matches!(
            analyzer.ingest(Some("R_25"), digit),
            Ingested::Accepted { trade: None }
        ));
        assert!(matches!(
            analyzer.ingest(None, digit),
            Ingested::Accepted { trade: None }
        ));
        assert_eq!(analyzer.snapshot().last_digits.len(), 2);
    }

    #[test]
    fn test_symbol_change_is_published() {
        let analyzer = analyzer(false);
        let mut rx = analyzer.symbol_updates();
        assert_eq!(*rx.borrow_and_update(), "R_10");

        analyzer.change_symbol("R_100").unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), "R_100");
    }

    #[test]
    fn test_connection_transitions_are_broadcast() {
        let analyzer = analyzer(false);
        let mut rx = analyzer.subscribe_connection();

        analyzer.set_connection_state(ConnectionState::Connecting);
        analyzer.set_connection_state(ConnectionState::Connecting);
        analyzer.set_connection_state(ConnectionState::Connected);

        assert_eq!(rx.try_recv().unwrap(), ConnectionState::Connecting);
        assert_eq!(rx.try_recv().unwrap(), ConnectionState::Connected);
        assert!(rx.try_recv().is_err());
        assert_eq!(analyzer.snapshot().connection_status, ConnectionState::Connected);
    }
}
