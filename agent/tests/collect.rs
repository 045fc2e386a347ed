//! Collection against the host's real statistics facility.
//!
//! Values depend on the machine running the tests, so these only assert
//! shape, count and the platform's sentinel rules.

use server_monitor_agent::collectors::{self, cpu::CpuCollector};
use server_monitor_agent::config::AgentConfig;

/// Helper: logical core count as the OS reports it.
fn logical_cores() -> usize {
    let mut sys = sysinfo::System::new();
    sys.refresh_cpu();
    sys.cpus().len()
}

#[test]
fn test_per_core_matches_logical_core_count() {
    let mut collector = CpuCollector::new();
    let per_core = collector
        .get_cpu_usage_per_core()
        .expect("per-core query failed");
    assert_eq!(per_core.len(), logical_cores());
    assert!(per_core.iter().all(|v| v.is_finite()));
}

#[test]
fn test_average_is_finite() {
    let mut collector = CpuCollector::new();
    let avg = collector
        .get_cpu_usage_average()
        .expect("average query failed");
    assert!(avg.is_finite());
}

#[test]
fn test_load_average_follows_platform() {
    let collector = CpuCollector::new();
    let load = collector.get_load_average().expect("load query failed");
    if cfg!(unix) {
        assert!(load.load_1_min >= 0.0);
        assert!(load.load_5_min >= 0.0);
        assert!(load.load_15_min >= 0.0);
    } else {
        assert_eq!(load.load_1_min, -1.0);
        assert_eq!(load.load_5_min, -1.0);
        assert_eq!(load.load_15_min, -1.0);
    }
}

#[test]
fn test_second_sample_has_every_field() {
    let mut collector = CpuCollector::new();
    collector.collect_cpu_metrics().expect("first sample failed");
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);

    let metrics = collector
        .collect_cpu_metrics()
        .expect("second sample failed");
    assert!(metrics.timestamp > 0.0);
    assert_eq!(metrics.cpu_usage_per_core.len(), logical_cores());

    let json = serde_json::to_value(&metrics).unwrap();
    for key in [
        "timestamp",
        "cpu_usage_per_core",
        "cpu_usage_average",
        "load_average",
        "cpu_times_percent",
    ] {
        assert!(json.get(key).is_some(), "missing key {key}");
    }
    assert_eq!(json["load_average"].as_object().unwrap().len(), 3);
    assert_eq!(json["cpu_times_percent"].as_object().unwrap().len(), 10);
}

#[test]
fn test_report_carries_agent_identity() {
    let cfg = AgentConfig::from_toml("agent_id = \"test-agent\"").unwrap();
    let mut collector = CpuCollector::new();

    let report = collectors::build_report(&cfg, &mut collector).expect("report failed");
    assert_eq!(report.agent_id, "test-agent");
    assert_eq!(report.version, env!("CARGO_PKG_VERSION"));
    assert!(!report.hostname.is_empty());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["agent_id"], "test-agent");
    assert!(json["cpu"]["cpu_usage_per_core"].is_array());
}
