use serde::{Deserialize, Serialize};
use tracing::debug;

use super::stats::{StatsError, SysinfoStats, SystemStats};

/// Value reported for every load field when the platform has no load average.
pub const LOAD_AVERAGE_UNSUPPORTED: f64 = -1.0;

/// System load averages, or all `-1.0` where the platform has none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadAverage {
    pub load_1_min: f64,
    pub load_5_min: f64,
    pub load_15_min: f64,
}

impl LoadAverage {
    pub fn unsupported() -> Self {
        Self {
            load_1_min: LOAD_AVERAGE_UNSUPPORTED,
            load_5_min: LOAD_AVERAGE_UNSUPPORTED,
            load_15_min: LOAD_AVERAGE_UNSUPPORTED,
        }
    }
}

/// Share of time the CPUs spent in each state since the previous sample.
///
/// States the platform does not report are `0.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuTimesPercent {
    pub user: f64,
    pub system: f64,
    pub idle: f64,
    pub nice: f64,
    pub iowait: f64,
    pub irq: f64,
    pub softirq: f64,
    pub steal: f64,
    pub guest: f64,
    pub guest_nice: f64,
}

/// One CPU snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuMetrics {
    /// Seconds since the Unix epoch.
    pub timestamp: f64,
    pub cpu_usage_per_core: Vec<f64>,
    pub cpu_usage_average: f64,
    pub load_average: LoadAverage,
    pub cpu_times_percent: CpuTimesPercent,
}

/// Source of the snapshot timestamp.
pub trait Clock {
    /// Current time in fractional seconds since the Unix epoch.
    fn now(&self) -> f64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        let now = chrono::Utc::now();
        now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1_000_000.0
    }
}

/// Collects [`CpuMetrics`] from a [`SystemStats`] facility.
///
/// The usage and time-in-state figures are deltas since the facility's
/// previous sample. The first call after start has no baseline, so every
/// core may read `0.0`; that is expected, not an error. Call at a steady
/// interval for meaningful values.
pub struct CpuCollector<S = SysinfoStats, C = SystemClock> {
    stats: S,
    clock: C,
}

impl CpuCollector {
    /// Collector over the host's real statistics and wall clock.
    pub fn new() -> Self {
        Self::with_parts(SysinfoStats::new(), SystemClock)
    }
}

impl Default for CpuCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SystemStats, C: Clock> CpuCollector<S, C> {
    pub fn with_parts(stats: S, clock: C) -> Self {
        Self { stats, clock }
    }

    /// Usage percentage of each logical core, in core-index order.
    pub fn get_cpu_usage_per_core(&mut self) -> Result<Vec<f64>, StatsError> {
        self.stats.cpu_percent_per_core()
    }

    /// Usage percentage across all cores.
    pub fn get_cpu_usage_average(&mut self) -> Result<f64, StatsError> {
        self.stats.cpu_percent()
    }

    /// 1/5/15 minute load averages.
    ///
    /// An unsupported platform yields [`LoadAverage::unsupported`]. Any other
    /// failure is returned as is.
    pub fn get_load_average(&self) -> Result<LoadAverage, StatsError> {
        match self.stats.load_average() {
            Ok((load_1_min, load_5_min, load_15_min)) => Ok(LoadAverage {
                load_1_min,
                load_5_min,
                load_15_min,
            }),
            Err(e) if e.is_unsupported() => {
                debug!("load average unavailable, reporting sentinel: {e}");
                Ok(LoadAverage::unsupported())
            }
            Err(e) => Err(e),
        }
    }

    /// Time-in-state percentages with every state present.
    pub fn get_cpu_times_percent(&mut self) -> Result<CpuTimesPercent, StatsError> {
        let raw = self.stats.cpu_times_percent()?;
        Ok(CpuTimesPercent {
            user: raw.user.unwrap_or(0.0),
            system: raw.system.unwrap_or(0.0),
            idle: raw.idle.unwrap_or(0.0),
            nice: raw.nice.unwrap_or(0.0),
            iowait: raw.iowait.unwrap_or(0.0),
            irq: raw.irq.unwrap_or(0.0),
            softirq: raw.softirq.unwrap_or(0.0),
            steal: raw.steal.unwrap_or(0.0),
            guest: raw.guest.unwrap_or(0.0),
            guest_nice: raw.guest_nice.unwrap_or(0.0),
        })
    }

    /// Take one full snapshot.
    pub fn collect_cpu_metrics(&mut self) -> Result<CpuMetrics, StatsError> {
        Ok(CpuMetrics {
            timestamp: self.clock.now(),
            cpu_usage_per_core: self.get_cpu_usage_per_core()?,
            cpu_usage_average: self.get_cpu_usage_average()?,
            load_average: self.get_load_average()?,
            cpu_times_percent: self.get_cpu_times_percent()?,
        })
    }
}
