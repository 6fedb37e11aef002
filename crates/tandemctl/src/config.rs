//! TOML configuration for `tandemctl`.
//!
//! Every section and key is optional; missing values fall back to
//! [`RepairPolicy::default`] and an `info` log level.

use std::path::Path;

use serde::Deserialize;
use tandem_repair::{RepairPolicy, ReplicationFactorPolicy};

/// Top-level configuration, parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Repair policy handed to the planner.
    pub policy: PolicySection,
    /// Logging configuration.
    pub log: LogSection,
}

/// `[policy]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PolicySection {
    /// Flag copied onto every `BeginRepairs`.
    pub rename_distribute_shards_like: Option<bool>,
    /// `"reject"` or `"adopt-prototype"`.
    pub replication_factor: Option<ReplicationFactorPolicy>,
}

/// `[log]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Log level filter (e.g. `"info"`, `"debug"`, `"warn"`).
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl CliConfig {
    /// Load config from a TOML file, or use defaults if no path given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)?;
                let config: CliConfig = toml::from_str(&content)?;
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse config from a TOML string (used in tests).
    #[cfg(test)]
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Effective repair policy.
    pub fn policy(&self) -> RepairPolicy {
        let defaults = RepairPolicy::default();
        RepairPolicy {
            rename_distribute_shards_like: self
                .policy
                .rename_distribute_shards_like
                .unwrap_or(defaults.rename_distribute_shards_like),
            replication_factor: self
                .policy
                .replication_factor
                .unwrap_or(defaults.replication_factor),
        }
    }
}
