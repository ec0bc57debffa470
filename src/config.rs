//! Configuration loading
//!
//! Settings come from an optional TOML file, overridden by environment
//! variables such as `WATCHER__FEED__DEFAULT_SYMBOL=R_50`.

use crate::error::{Result, WatcherError};
use crate::types::validate_symbol;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub signal: SignalConfig,
    #[serde(default)]
    pub trade: TradeConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Tick feed connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_feed_url")]
    pub url: String,
    /// Symbol subscribed at startup
    #[serde(default = "default_symbol")]
    pub default_symbol: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Silence on an open connection longer than this counts as a failure
    #[serde(default = "default_stale_timeout_secs")]
    pub stale_timeout_secs: u64,
    /// Delay after a graceful or remote close
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
    /// Delay after a transport or protocol failure
    #[serde(default = "default_error_delay_ms")]
    pub error_delay_ms: u64,
}

fn default_feed_url() -> String {
    "wss://ws.derivws.com/websockets/v3?app_id=1089".to_string()
}
fn default_symbol() -> String {
    "R_10".to_string()
}
fn default_connect_timeout_secs() -> u64 {
    10
}
fn default_stale_timeout_secs() -> u64 {
    60
}
fn default_reconnect_delay_ms() -> u64 {
    3_000
}
fn default_error_delay_ms() -> u64 {
    5_000
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            default_symbol: default_symbol(),
            connect_timeout_secs: default_connect_timeout_secs(),
            stale_timeout_secs: default_stale_timeout_secs(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
            error_delay_ms: default_error_delay_ms(),
        }
    }
}

impl FeedConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn stale_timeout(&self) -> Duration {
        Duration::from_secs(self.stale_timeout_secs)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn error_delay(&self) -> Duration {
        Duration::from_millis(self.error_delay_ms)
    }
}

/// Digit window settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_window_capacity")]
    pub window_capacity: usize,
    /// Over-4 count that makes a full window tradable
    #[serde(default = "default_over_threshold")]
    pub over_threshold: usize,
}

fn default_window_capacity() -> usize {
    10
}
fn default_over_threshold() -> usize {
    6
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_capacity: default_window_capacity(),
            over_threshold: default_over_threshold(),
        }
    }
}

/// Weights of the signal strength score. Defaults are heuristic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalConfig {
    #[serde(default = "default_at_threshold_points")]
    pub at_threshold_points: u32,
    #[serde(default = "default_near_threshold_points")]
    pub near_threshold_points: u32,
    #[serde(default = "default_approaching_threshold_points")]
    pub approaching_threshold_points: u32,
    #[serde(default = "default_structural_points")]
    pub structural_pattern_points: u32,
    #[serde(default = "default_frequency_points")]
    pub frequency_pattern_points: u32,
    #[serde(default = "default_momentum_points")]
    pub momentum_points: u32,
    #[serde(default = "default_strong_at")]
    pub strong_at: u32,
    #[serde(default = "default_good_at")]
    pub good_at: u32,
    #[serde(default = "default_weak_at")]
    pub weak_at: u32,
}

fn default_at_threshold_points() -> u32 {
    3
}
fn default_near_threshold_points() -> u32 {
    2
}
fn default_approaching_threshold_points() -> u32 {
    1
}
fn default_structural_points() -> u32 {
    2
}
fn default_frequency_points() -> u32 {
    1
}
fn default_momentum_points() -> u32 {
    1
}
fn default_strong_at() -> u32 {
    5
}
fn default_good_at() -> u32 {
    3
}
fn default_weak_at() -> u32 {
    2
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            at_threshold_points: default_at_threshold_points(),
            near_threshold_points: default_near_threshold_points(),
            approaching_threshold_points: default_approaching_threshold_points(),
            structural_pattern_points: default_structural_points(),
            frequency_pattern_points: default_frequency_points(),
            momentum_points: default_momentum_points(),
            strong_at: default_strong_at(),
            good_at: default_good_at(),
            weak_at: default_weak_at(),
        }
    }
}

/// Auto-trade gate settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeConfig {
    /// Auto-trade state at startup
    #[serde(default)]
    pub auto_trade: bool,
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
    /// Number of trailing digits recorded with each trade
    #[serde(default = "default_snapshot_len")]
    pub snapshot_len: usize,
}

fn default_cooldown_secs() -> u64 {
    5
}
fn default_log_capacity() -> usize {
    10
}
fn default_snapshot_len() -> usize {
    5
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            auto_trade: false,
            cooldown_secs: default_cooldown_secs(),
            log_capacity: default_log_capacity(),
            snapshot_len: default_snapshot_len(),
        }
    }
}

impl TradeConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_true() -> bool {
    true
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5001
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load from `path` (optional) and `WATCHER__*` environment variables
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("WATCHER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let capacity = self.analysis.window_capacity;
        if capacity < 3 {
            return Err(invalid(format!(
                "analysis.window_capacity must be at least 3, got {capacity}"
            )));
        }
        if self.analysis.over_threshold > capacity {
            return Err(invalid(format!(
                "analysis.over_threshold ({}) exceeds window_capacity ({capacity})",
                self.analysis.over_threshold
            )));
        }
        if self.trade.log_capacity == 0 {
            return Err(invalid("trade.log_capacity must be positive".to_string()));
        }
        validate_symbol(&self.feed.default_symbol)
            .map_err(|e| invalid(format!("feed.default_symbol: {e}")))?;
        Ok(())
    }
}

fn invalid(message: String) -> WatcherError {
    WatcherError::Config(config::ConfigError::Message(message))
}
