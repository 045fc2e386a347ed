use anyhow::Result;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use server_monitor_agent::collectors::{self, cpu::CpuCollector, Report};
use server_monitor_agent::config::AgentConfig;

/// Collect and print reports every `report_interval_secs` until Ctrl-C.
///
/// A failed cycle is logged and skipped; the next tick tries again.
pub async fn run(config: &AgentConfig) -> Result<()> {
    let mut collector = CpuCollector::new();
    let interval = Duration::from_secs(config.report_interval_secs);

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match collectors::build_report(config, &mut collector) {
                    Ok(report) => emit(config, &report)?,
                    Err(e) => error!("CPU collection failed, skipping cycle: {e}"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested");
                return Ok(());
            }
        }
    }
}

/// Collect a single report and print it.
///
/// The first sample has no baseline, so one throwaway sample is taken
/// before the one that gets reported.
pub async fn run_once(config: &AgentConfig) -> Result<()> {
    let mut collector = CpuCollector::new();

    collector.collect_cpu_metrics()?;
    let warmup = sysinfo::MINIMUM_CPU_UPDATE_INTERVAL.max(Duration::from_secs(1));
    debug!(warmup_ms = warmup.as_millis() as u64, "Waiting for CPU baseline");
    tokio::time::sleep(warmup).await;

    let report = collectors::build_report(config, &mut collector)?;
    emit(config, &report)
}

fn emit(config: &AgentConfig, report: &Report) -> Result<()> {
    let json = if config.pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    debug!(bytes = json.len(), "Emitting report");
    println!("{json}");
    Ok(())
}
