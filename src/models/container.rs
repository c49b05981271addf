// Container stat snapshot models (input from the external collector)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cumulative CPU time in nanoseconds since container start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuUsage {
    pub total: u64,
    #[serde(default)]
    pub per_cpu: Vec<u64>,
    #[serde(default)]
    pub user: u64,
    #[serde(default)]
    pub system: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuStats {
    pub usage: CpuUsage,
}

/// Point-in-time memory readings in bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStats {
    pub usage: u64,
    #[serde(default)]
    pub working_set: u64,
    #[serde(default)]
    pub cache: u64,
    #[serde(default)]
    pub rss: u64,
}

/// Cumulative network counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStats {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    #[serde(default)]
    pub rx_packets: u64,
    #[serde(default)]
    pub tx_packets: u64,
    #[serde(default)]
    pub rx_errors: u64,
    #[serde(default)]
    pub tx_errors: u64,
    #[serde(default)]
    pub rx_dropped: u64,
    #[serde(default)]
    pub tx_dropped: u64,
}

/// One timestamped resource snapshot. Sub-structures are absent when the
/// collector could not read them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerStats {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub cpu: Option<CpuStats>,
    #[serde(default)]
    pub memory: Option<MemoryStats>,
    #[serde(default)]
    pub network: Option<NetworkStats>,
}

impl ContainerStats {
    /// Snapshot at `timestamp` with no sub-structures filled in.
    pub fn empty(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            cpu: None,
            memory: None,
            network: None,
        }
    }

    pub fn cpu_total(&self) -> Option<u64> {
        self.cpu.as_ref().map(|c| c.usage.total)
    }

    pub fn memory_usage(&self) -> Option<u64> {
        self.memory.as_ref().map(|m| m.usage)
    }
}
