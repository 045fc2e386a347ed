use std::fmt;

use sysinfo::System;

#[cfg(target_os = "linux")]
use super::proc_stat::ProcStat;

/// Failure raised by a [`SystemStats`] query.
#[derive(Debug)]
pub enum StatsError {
    /// The capability does not exist on this platform.
    Absent(&'static str),
    /// The query mechanism is not implemented for this OS.
    NotImplemented(&'static str),
    /// Reading a kernel interface failed.
    Io(std::io::Error),
    /// A kernel interface returned data we could not parse.
    Parse(String),
}

impl StatsError {
    /// True for the two "not supported on this platform" kinds.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, StatsError::Absent(_) | StatsError::NotImplemented(_))
    }
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsError::Absent(what) => write!(f, "{what} is not available on this platform"),
            StatsError::NotImplemented(what) => {
                write!(f, "{what} is not implemented on this OS")
            }
            StatsError::Io(e) => write!(f, "failed to read system statistics: {e}"),
            StatsError::Parse(msg) => write!(f, "malformed system statistics: {msg}"),
        }
    }
}

impl std::error::Error for StatsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StatsError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StatsError {
    fn from(e: std::io::Error) -> Self {
        StatsError::Io(e)
    }
}

/// Per-state CPU time percentages as the platform reports them.
///
/// `None` means the platform does not populate that state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCpuTimes {
    pub user: Option<f64>,
    pub system: Option<f64>,
    pub idle: Option<f64>,
    pub nice: Option<f64>,
    pub iowait: Option<f64>,
    pub irq: Option<f64>,
    pub softirq: Option<f64>,
    pub steal: Option<f64>,
    pub guest: Option<f64>,
    pub guest_nice: Option<f64>,
}

/// OS-level CPU statistics facility.
///
/// Queries that diff against a previous sample take `&mut self`: the
/// facility owns its baselines and advances them on every call.
pub trait SystemStats {
    /// Usage percentage of every logical core, in core-index order.
    fn cpu_percent_per_core(&mut self) -> Result<Vec<f64>, StatsError>;

    /// Usage percentage across all cores.
    fn cpu_percent(&mut self) -> Result<f64, StatsError>;

    /// 1, 5 and 15 minute load averages.
    fn load_average(&self) -> Result<(f64, f64, f64), StatsError>;

    /// Time-in-state percentages since the previous call.
    fn cpu_times_percent(&mut self) -> Result<RawCpuTimes, StatsError>;
}

/// [`SystemStats`] backed by `sysinfo`, plus `/proc/stat` on Linux.
pub struct SysinfoStats {
    per_core: System,
    aggregate: System,
    #[cfg(target_os = "linux")]
    times: ProcStat,
    #[cfg(not(target_os = "linux"))]
    times: System,
}

impl SysinfoStats {
    pub fn new() -> Self {
        Self {
            per_core: System::new(),
            aggregate: System::new(),
            #[cfg(target_os = "linux")]
            times: ProcStat::new(),
            #[cfg(not(target_os = "linux"))]
            times: System::new(),
        }
    }

    fn ensure_supported() -> Result<(), StatsError> {
        if sysinfo::IS_SUPPORTED_SYSTEM {
            Ok(())
        } else {
            Err(StatsError::NotImplemented("CPU usage"))
        }
    }
}

impl Default for SysinfoStats {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemStats for SysinfoStats {
    fn cpu_percent_per_core(&mut self) -> Result<Vec<f64>, StatsError> {
        Self::ensure_supported()?;
        self.per_core.refresh_cpu();
        Ok(self
            .per_core
            .cpus()
            .iter()
            .map(|cpu| f64::from(cpu.cpu_usage()))
            .collect())
    }

    fn cpu_percent(&mut self) -> Result<f64, StatsError> {
        Self::ensure_supported()?;
        self.aggregate.refresh_cpu();
        Ok(f64::from(self.aggregate.global_cpu_info().cpu_usage()))
    }

    fn load_average(&self) -> Result<(f64, f64, f64), StatsError> {
        // sysinfo reports zeros instead of failing where there is no load average.
        if !cfg!(unix) {
            return Err(StatsError::NotImplemented("load average"));
        }
        let load = System::load_average();
        Ok((load.one, load.five, load.fifteen))
    }

    #[cfg(target_os = "linux")]
    fn cpu_times_percent(&mut self) -> Result<RawCpuTimes, StatsError> {
        self.times.sample()
    }

    #[cfg(not(target_os = "linux"))]
    fn cpu_times_percent(&mut self) -> Result<RawCpuTimes, StatsError> {
        Self::ensure_supported()?;
        self.times.refresh_cpu();
        let busy = f64::from(self.times.global_cpu_info().cpu_usage());
        Ok(RawCpuTimes {
            idle: Some((100.0 - busy).max(0.0)),
            ..RawCpuTimes::default()
        })
    }
}
