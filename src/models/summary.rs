// Derived per-container aggregates (output to the reporting layer)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuSample {
    /// Nanoseconds of CPU consumed during the interval.
    pub usage: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySample {
    /// Point-in-time usage in bytes at the end of the interval.
    pub usage: u64,
}

/// Non-cumulative delta between two ordered snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerStatsSample {
    /// Timestamp of the later snapshot.
    pub timestamp: DateTime<Utc>,
    /// Interval length in milliseconds.
    pub duration_ms: u64,
    pub cpu: CpuSample,
    pub memory: MemorySample,
}

/// One row of a percentile table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Percentile {
    pub percentage: u32,
    pub value: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerStatsSummary {
    /// Time of the most recent observation, if any.
    pub timestamp: Option<DateTime<Utc>>,
    pub max_memory_usage: u64,
    pub avg_memory_usage: u64,
    pub samples: Vec<ContainerStatsSample>,
    pub cpu_usage_percentiles: Vec<Percentile>,
    pub memory_usage_percentiles: Vec<Percentile>,
}
