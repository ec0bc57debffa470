//! Digit Watcher
//!
//! Streams ticks from the feed, tracks the last digit of each quote and
//! serves the analysis over HTTP.

use clap::{Parser, Subcommand};
use digit_watcher::{
    analyzer::Analyzer,
    config::Config,
    digits::{self, DigitWindow, WindowStats},
    feed::{FeedClient, WsConnector},
    monitor::{spawn_connection_logger, start_dashboard},
    trade::PaperTradeNotifier,
    types::parse_digits,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "digit-watcher")]
#[command(about = "Real-time last-digit watcher for synthetic index tick feeds")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to the feed and serve the dashboard
    Run {
        /// Market symbol to watch instead of the configured default
        #[arg(short, long)]
        symbol: Option<String>,
        /// Start with auto-trade enabled
        #[arg(long)]
        auto_trade: bool,
        /// Do not start the HTTP dashboard
        #[arg(long)]
        no_dashboard: bool,
    },
    /// Run pattern detection and signal scoring over a digit sequence
    Analyze {
        /// Digits, oldest first (e.g. 1234567890)
        digits: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Run {
            symbol,
            auto_trade,
            no_dashboard,
        } => {
            if let Some(symbol) = symbol {
                config.feed.default_symbol = symbol;
            }
            if auto_trade {
                config.trade.auto_trade = true;
            }
            if no_dashboard {
                config.dashboard.enabled = false;
            }
            config.validate()?;
            run_watcher(config).await
        }
        Commands::Analyze { digits } => analyze_digits(&config, &digits),
    }
}

async fn run_watcher(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Starting digit watcher on {} (auto-trade {})",
        config.feed.default_symbol,
        if config.trade.auto_trade { "on" } else { "off" }
    );

    let analyzer = Arc::new(Analyzer::new(&config));
    let _logger = spawn_connection_logger(&analyzer);

    let feed = FeedClient::new(
        Arc::new(WsConnector),
        analyzer.clone(),
        Arc::new(PaperTradeNotifier),
        config.feed.clone(),
    );
    let feed_handle = tokio::spawn(feed.run());

    let dashboard = async {
        if config.dashboard.enabled {
            start_dashboard(analyzer.clone(), &config.dashboard.host, config.dashboard.port).await
        } else {
            tracing::info!("Dashboard disabled");
            std::future::pending().await
        }
    };

    let result = tokio::select! {
        res = dashboard => res.map_err(anyhow::Error::from),
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
            Ok(())
        }
    };

    feed_handle.abort();
    result
}

fn analyze_digits(config: &Config, input: &str) -> anyhow::Result<()> {
    let sequence = parse_digits(input)?;
    if sequence.is_empty() {
        anyhow::bail!("no digits given");
    }

    let mut window = DigitWindow::new(config.analysis.window_capacity);
    for d in &sequence {
        window.push(*d);
    }
    let last = window.snapshot();
    let stats: WindowStats = window.stats();
    let pattern = digits::detect(&last);
    let signal = digits::classify(
        &stats,
        pattern.as_ref(),
        config.analysis.over_threshold,
        &config.signal,
    );

    let rendered: Vec<String> = last.iter().map(|d| d.to_string()).collect();
    println!("\n🔢 Digit Analysis\n");
    println!("Window:      [{}] ({}/{})", rendered.join(", "), stats.len, stats.capacity);
    println!(
        "Over 4:      {} ({:.1}%)",
        stats.over_count,
        stats.over_percentage()
    );
    match &pattern {
        Some(p) => println!("Prediction:  {} (confidence {}%)", p, p.confidence),
        None => println!("Prediction:  {}", digit_watcher::analyzer::ANALYZING_PLACEHOLDER),
    }
    println!("Signal:      {}", signal.label());

    if let Some(strength) = digits::strength(
        &stats,
        pattern.as_ref(),
        config.analysis.over_threshold,
        &config.signal,
    ) {
        println!(
            "Strength:    {} (threshold {}, pattern {}, momentum {})",
            strength.total(),
            strength.threshold,
            strength.pattern,
            strength.momentum
        );
    }

    println!("\nFrequency:");
    for (digit, count) in stats.counts.iter().enumerate() {
        println!("  {} | {}", digit, "█".repeat(*count));
    }

    Ok(())
}
