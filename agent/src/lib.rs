//! CPU utilization metrics for the server monitor agent.
//!
//! [`collectors::cpu::CpuCollector`] is the entry point. It queries an
//! injected [`collectors::stats::SystemStats`] facility and returns one
//! [`collectors::cpu::CpuMetrics`] record per call.

pub mod collectors;
pub mod config;
