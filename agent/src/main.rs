use anyhow::Result;
use clap::Parser;
use tracing::info;

use server_monitor_agent::config::AgentConfig;

mod reporter;

/// Server monitor agent: periodic CPU utilization reporter.
#[derive(Parser, Debug)]
#[command(name = "server-monitor-agent", version, about)]
struct Cli {
    /// Path to a TOML configuration file (optional).
    #[arg(short, long)]
    config: Option<String>,

    /// Seconds between reports, overriding the configuration file.
    #[arg(short, long)]
    interval: Option<u64>,

    /// Print a single report and exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only reports.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server_monitor_agent=info".into()),
        )
        .init();

    let cli = Cli::parse();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting server monitor agent"
    );

    let mut cfg = if let Some(ref path) = cli.config {
        AgentConfig::from_file(path)?
    } else {
        AgentConfig::default()
    };
    if let Some(secs) = cli.interval {
        cfg.report_interval_secs = secs;
    }
    cfg.validate()?;

    info!(
        agent_id = %cfg.agent_id,
        interval = cfg.report_interval_secs,
        "Configuration loaded"
    );

    if cli.once {
        reporter::run_once(&cfg).await
    } else {
        reporter::run(&cfg).await
    }
}
