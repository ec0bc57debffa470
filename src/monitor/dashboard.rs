//! Dashboard HTTP API
//!
//! Read-only snapshot plus the two commands (market change, auto-trade
//! toggle). Commands answer `204 No Content`; rejected input answers `400`
//! with the error text and leaves state untouched.

use crate::analyzer::{Analyzer, Snapshot};
use crate::error::{Result, WatcherError};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

type CommandResult = std::result::Result<StatusCode, (StatusCode, String)>;

#[derive(Debug, Deserialize)]
pub struct ChangeMarketParams {
    pub symbol: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleTradeParams {
    pub state: Option<String>,
}

// ============ HTTP API Handlers ============

/// Health check
async fn health_check() -> &'static str {
    "OK"
}

/// Current analysis snapshot
async fn check(State(analyzer): State<Arc<Analyzer>>) -> Json<Snapshot> {
    Json(analyzer.snapshot())
}

/// Switch the watched market
async fn change_market(
    State(analyzer): State<Arc<Analyzer>>,
    Query(params): Query<ChangeMarketParams>,
) -> CommandResult {
    let symbol = params.symbol.unwrap_or_default();
    analyzer
        .change_symbol(symbol.trim())
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(rejected)
}

/// Enable or disable auto-trading
async fn toggle_trade(
    State(analyzer): State<Arc<Analyzer>>,
    Query(params): Query<ToggleTradeParams>,
) -> CommandResult {
    let enabled = parse_toggle(params.state.as_deref().unwrap_or_default()).map_err(rejected)?;
    analyzer.set_auto_trade(enabled);
    Ok(StatusCode::NO_CONTENT)
}

fn parse_toggle(state: &str) -> Result<bool> {
    match state.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        other => Err(WatcherError::InvalidCommand(format!(
            "state must be on or off, got {other:?}"
        ))),
    }
}

fn rejected(err: WatcherError) -> (StatusCode, String) {
    tracing::warn!("Rejected dashboard command: {}", err);
    (StatusCode::BAD_REQUEST, err.to_string())
}

/// Create dashboard router
pub fn create_router(analyzer: Arc<Analyzer>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/check", get(check))
        .route("/change_market", get(change_market))
        .route("/toggle_trade", get(toggle_trade))
        .with_state(analyzer)
}

/// Start dashboard server
pub async fn start_dashboard(analyzer: Arc<Analyzer>, host: &str, port: u16) -> Result<()> {
    let app = create_router(analyzer);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("Dashboard server starting on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
