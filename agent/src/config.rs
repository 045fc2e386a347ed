use anyhow::{bail, Result};
use serde::Deserialize;

/// Agent configuration loaded from a TOML file or defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Identifier attached to every report. Defaults to the host name.
    #[serde(default = "default_agent_id")]
    pub agent_id: String,

    /// Seconds between two collection cycles.
    #[serde(default = "default_report_interval")]
    pub report_interval_secs: u64,

    /// Pretty-print report JSON instead of one line per report.
    #[serde(default)]
    pub pretty: bool,
}

fn default_agent_id() -> String {
    crate::collectors::hostname()
}

fn default_report_interval() -> u64 {
    5
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            agent_id: default_agent_id(),
            report_interval_secs: default_report_interval(),
            pretty: false,
        }
    }
}

impl AgentConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AgentConfig = toml::de::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the collector cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.report_interval_secs == 0 {
            bail!("report_interval_secs must be at least 1");
        }
        if self.agent_id.trim().is_empty() {
            bail!("agent_id must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let cfg = AgentConfig::from_toml("").unwrap();
        assert_eq!(cfg.report_interval_secs, 5);
        assert!(!cfg.pretty);
        assert_eq!(cfg.agent_id, crate::collectors::hostname());
    }

    #[test]
    fn test_explicit_values() {
        let cfg = AgentConfig::from_toml(
            r#"
agent_id = "web-01"
report_interval_secs = 30
pretty = true
"#,
        )
        .unwrap();
        assert_eq!(cfg.agent_id, "web-01");
        assert_eq!(cfg.report_interval_secs, 30);
        assert!(cfg.pretty);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = AgentConfig::from_toml("report_interval_secs = 0").unwrap_err();
        assert!(err.to_string().contains("report_interval_secs"));
    }

    #[test]
    fn test_blank_agent_id_rejected() {
        assert!(AgentConfig::from_toml("agent_id = \"  \"").is_err());
    }

    #[test]
    fn test_malformed_toml_rejected() {
        assert!(AgentConfig::from_toml("report_interval_secs = \"soon\"").is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(AgentConfig::from_file("/nonexistent/server-monitor/agent.toml").is_err());
    }

    #[test]
    fn test_default_is_valid() {
        AgentConfig::default().validate().unwrap();
    }
}
