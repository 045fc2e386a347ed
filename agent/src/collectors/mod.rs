pub mod cpu;
#[cfg(target_os = "linux")]
pub mod proc_stat;
pub mod stats;

use serde::Serialize;

use crate::config::AgentConfig;
use cpu::{Clock, CpuCollector, CpuMetrics};
use stats::{StatsError, SystemStats};

/// One report line emitted per collection cycle.
#[derive(Debug, Serialize)]
pub struct Report {
    pub agent_id: String,
    pub hostname: String,
    pub version: String,
    pub cpu: CpuMetrics,
}

/// Collect one CPU snapshot and wrap it with the agent's identity.
pub fn build_report<S: SystemStats, C: Clock>(
    config: &AgentConfig,
    collector: &mut CpuCollector<S, C>,
) -> Result<Report, StatsError> {
    Ok(Report {
        agent_id: config.agent_id.clone(),
        hostname: hostname(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cpu: collector.collect_cpu_metrics()?,
    })
}

/// Host name as reported by the OS, or `"unknown"`.
pub fn hostname() -> String {
    sysinfo::System::host_name().unwrap_or_else(|| "unknown".to_string())
}
