//! Time-in-state percentages from Linux `/proc/stat`.
//!
//! The kernel exposes cumulative jiffies per CPU state. A percentage only
//! means something relative to a previous sample, so [`ProcStat`] keeps the
//! last counters it read and diffs every new read against them.

use std::path::PathBuf;

use super::stats::{RawCpuTimes, StatsError};

const PROC_STAT: &str = "/proc/stat";

/// Cumulative counters from the aggregate `cpu` line.
///
/// Trailing states are missing on older kernels and stay `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuCounters {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: Option<u64>,
    pub irq: Option<u64>,
    pub softirq: Option<u64>,
    pub steal: Option<u64>,
    pub guest: Option<u64>,
    pub guest_nice: Option<u64>,
}

impl CpuCounters {
    /// Parse the aggregate `cpu ` line out of `/proc/stat` content.
    ///
    /// Format: `cpu user nice system idle [iowait irq softirq steal guest guest_nice]`
    pub fn parse(content: &str) -> Result<Self, StatsError> {
        let line = content
            .lines()
            .find(|l| l.starts_with("cpu "))
            .ok_or_else(|| StatsError::Parse("no aggregate cpu line".to_string()))?;

        let fields = line
            .split_whitespace()
            .skip(1)
            .map(|f| {
                f.parse::<u64>()
                    .map_err(|_| StatsError::Parse(format!("invalid counter: {f}")))
            })
            .collect::<Result<Vec<u64>, StatsError>>()?;

        if fields.len() < 4 {
            return Err(StatsError::Parse(format!(
                "cpu line too short: expected at least 4 counters, got {}",
                fields.len()
            )));
        }

        let opt = |idx: usize| fields.get(idx).copied();

        Ok(Self {
            user: fields[0],
            nice: fields[1],
            system: fields[2],
            idle: fields[3],
            iowait: opt(4),
            irq: opt(5),
            softirq: opt(6),
            steal: opt(7),
            guest: opt(8),
            guest_nice: opt(9),
        })
    }

    /// Elapsed jiffies. Guest time is already counted inside user and nice.
    fn total(&self) -> u64 {
        self.user
            + self.nice
            + self.system
            + self.idle
            + self.iowait.unwrap_or(0)
            + self.irq.unwrap_or(0)
            + self.softirq.unwrap_or(0)
            + self.steal.unwrap_or(0)
    }
}

/// Percentages of `curr` relative to `prev`, rounded to one decimal.
pub fn percent_between(prev: &CpuCounters, curr: &CpuCounters) -> RawCpuTimes {
    let total = curr.total().saturating_sub(prev.total());

    let pct = |now: u64, before: u64| -> f64 {
        if total == 0 {
            return 0.0;
        }
        let share = now.saturating_sub(before) as f64 / total as f64 * 100.0;
        (share.clamp(0.0, 100.0) * 10.0).round() / 10.0
    };
    let opt_pct = |now: Option<u64>, before: Option<u64>| now.map(|n| pct(n, before.unwrap_or(0)));

    RawCpuTimes {
        user: Some(pct(curr.user, prev.user)),
        system: Some(pct(curr.system, prev.system)),
        idle: Some(pct(curr.idle, prev.idle)),
        nice: Some(pct(curr.nice, prev.nice)),
        iowait: opt_pct(curr.iowait, prev.iowait),
        irq: opt_pct(curr.irq, prev.irq),
        softirq: opt_pct(curr.softirq, prev.softirq),
        steal: opt_pct(curr.steal, prev.steal),
        guest: opt_pct(curr.guest, prev.guest),
        guest_nice: opt_pct(curr.guest_nice, prev.guest_nice),
    }
}

/// Stateful `/proc/stat` sampler.
#[derive(Debug)]
pub struct ProcStat {
    path: PathBuf,
    prev: CpuCounters,
}

impl ProcStat {
    pub fn new() -> Self {
        Self::with_path(PROC_STAT)
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            // The first sample diffs against boot, i.e. averages since boot.
            prev: CpuCounters::default(),
        }
    }

    /// Read the counters, diff against the previous read, and store them.
    pub fn sample(&mut self) -> Result<RawCpuTimes, StatsError> {
        let content = std::fs::read_to_string(&self.path)?;
        let curr = CpuCounters::parse(&content)?;
        let times = percent_between(&self.prev, &curr);
        self.prev = curr;
        Ok(times)
    }
}

impl Default for ProcStat {
    fn default() -> Self {
        Self::new()
    }
}
