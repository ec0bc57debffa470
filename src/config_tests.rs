//! Tests for configuration

#[cfg(test)]
mod tests {
    use super::super::config::*;
    use crate::error::WatcherError;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_feed_config_default() {
        let config = FeedConfig::default();
        assert_eq!(config.url, "wss://ws.derivws.com/websockets/v3?app_id=1089");
        assert_eq!(config.default_symbol, "R_10");
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.stale_timeout(), Duration::from_secs(60));
        assert_eq!(config.reconnect_delay(), Duration::from_secs(3));
        assert_eq!(config.error_delay(), Duration::from_secs(5));
    }

    #[test]
    fn test_signal_config_defaults() {
        let config: SignalConfig = toml::from_str("").unwrap();
        assert_eq!(config, SignalConfig::default());
        assert_eq!(config.at_threshold_points, 3);
        assert_eq!(config.structural_pattern_points, 2);
        assert_eq!(config.frequency_pattern_points, 1);
        assert_eq!(config.strong_at, 5);
        assert_eq!(config.good_at, 3);
        assert_eq!(config.weak_at, 2);
    }

    #[test]
    fn test_trade_config_defaults() {
        let config: TradeConfig = toml::from_str("auto_trade = true").unwrap();
        assert!(config.auto_trade);
        assert_eq!(config.cooldown(), Duration::from_secs(5));
        assert_eq!(config.log_capacity, 10);
        assert_eq!(config.snapshot_len, 5);
    }

    #[test]
    fn test_full_config_from_toml() {
        let toml_str = r#"
[feed]
default_symbol = "1HZ100V"
reconnect_delay_ms = 500

[analysis]
window_capacity = 20
over_threshold = 12

[signal]
strong_at = 6

[dashboard]
enabled = false
port = 8080
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.feed.default_symbol, "1HZ100V");
        assert_eq!(config.feed.reconnect_delay(), Duration::from_millis(500));
        assert_eq!(config.feed.error_delay_ms, 5_000);
        assert_eq!(config.analysis.window_capacity, 20);
        assert_eq!(config.analysis.over_threshold, 12);
        assert_eq!(config.signal.strong_at, 6);
        assert_eq!(config.signal.good_at, 3);
        assert!(!config.trade.auto_trade);
        assert!(!config.dashboard.enabled);
        assert_eq!(config.dashboard.host, "0.0.0.0");
        assert_eq!(config.dashboard.port, 8080);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watcher.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[feed]\ndefault_symbol = \"R_75\"\n\n[trade]\ncooldown_secs = 9").unwrap();

        let config = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.feed.default_symbol, "R_75");
        assert_eq!(config.trade.cooldown(), Duration::from_secs(9));
        assert_eq!(config.analysis.window_capacity, 10);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let config = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.feed.default_symbol, "R_10");
        assert_eq!(config.analysis.over_threshold, 6);
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watcher.toml");
        std::fs::write(&path, "[trade]\nsnapshot_len = 4\n").unwrap();

        std::env::set_var("WATCHER__TRADE__SNAPSHOT_LEN", "3");
        let config = Config::load(path.to_str().unwrap());
        std::env::remove_var("WATCHER__TRADE__SNAPSHOT_LEN");

        assert_eq!(config.unwrap().trade.snapshot_len, 3);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watcher.toml");
        std::fs::write(&path, "[analysis]\nwindow_capacity = 2\nover_threshold = 1\n").unwrap();

        let err = Config::load(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, WatcherError::Config(_)));
        assert!(err.to_string().contains("window_capacity"));
    }

    #[test]
    fn test_validate() {
        assert!(Config::default().validate().is_ok());

        let mut config = Config::default();
        config.analysis.window_capacity = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.analysis.over_threshold = 11;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.trade.log_capacity = 0;
        assert!(matches!(config.validate(), Err(WatcherError::Config(_))));

        let mut config = Config::default();
        config.feed.default_symbol = "R 10".to_string();
        assert!(matches!(config.validate(), Err(WatcherError::Config(_))));
    }
}
