use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use streamrank_acquire::FetchOptions;

mod pipeline;

use pipeline::EtlConfig;

/// Run with no arguments for the standard run; every flag defaults to it.
#[derive(Parser)]
#[command(name = "streamrank")]
#[command(about = "Scrape the most-streamed songs ranking, store it in SQLite and chart it")]
#[command(version)]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long)]
    utc: bool,

    /// Page to scrape
    #[arg(long, default_value = streamrank_acquire::fetch::SOURCE_URL)]
    url: String,

    /// SQLite database file (created if missing)
    #[arg(long, default_value = streamrank_store::DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Directory for the chart files
    #[arg(short = 'O', long, default_value = ".")]
    out_dir: PathBuf,

    /// Also save the fetched HTML to this path
    #[arg(long)]
    cache_html: Option<PathBuf>,

    /// Also export the cleaned rows as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Map log level, suppressing noisy HTML-parsing crates at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn  => "warn",
        LogLevel::Info  => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }

    let config = EtlConfig {
        fetch: FetchOptions {
            url: cli.url,
            ..FetchOptions::default()
        },
        db_path: cli.db,
        out_dir: cli.out_dir,
        cache_html: cli.cache_html,
        json_path: cli.json,
        ..EtlConfig::default()
    };

    // Failures are reported, not propagated: the process exits normally either way.
    match pipeline::run(&config).await {
        Ok(summary) => tracing::info!(
            rows = summary.rows,
            dropped = summary.dropped,
            artists_chart = %summary.charts.artists.display(),
            "Run complete"
        ),
        Err(err) => pipeline::report(&err),
    }

    Ok(())
}
