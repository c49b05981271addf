// Shared test helpers

#![allow(dead_code)]

use std::sync::Mutex;

use chrono::{DateTime, TimeDelta, Utc};
use usage_summary::models::*;
use usage_summary::source::StatsSource;

pub fn base_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

pub fn stats_at(secs: i64, cpu_total: u64, memory_usage: u64) -> ContainerStats {
    ContainerStats {
        timestamp: base_time() + TimeDelta::seconds(secs),
        cpu: Some(CpuStats {
            usage: CpuUsage {
                total: cpu_total,
                per_cpu: vec![cpu_total / 2, cpu_total - cpu_total / 2],
                user: cpu_total / 2,
                system: cpu_total - cpu_total / 2,
            },
        }),
        memory: Some(MemoryStats {
            usage: memory_usage,
            working_set: memory_usage,
            cache: 0,
            rss: memory_usage,
        }),
        network: None,
    }
}

pub const TEST_CONFIG: &str = r#"
[sampler]
name = "uniform"
num_samples = 100

[history]
max_age_secs = 600
max_items = 50

[monitoring]
sample_interval_ms = 1000
stats_log_interval_secs = 60
"#;

/// Source emitting a steadily growing container: one second and 1ms of CPU
/// per read, memory cycling through 100..=199. Reads listed in `fail_on`
/// (1-based) return an error instead.
pub struct SyntheticSource {
    reads: Mutex<u64>,
    fail_on: Vec<u64>,
}

impl SyntheticSource {
    pub fn new() -> Self {
        Self::failing_on(vec![])
    }

    pub fn failing_on(fail_on: Vec<u64>) -> Self {
        Self {
            reads: Mutex::new(0),
            fail_on,
        }
    }

    pub fn reads(&self) -> u64 {
        *self.reads.lock().unwrap()
    }
}

impl StatsSource for SyntheticSource {
    async fn get_stats(&self) -> anyhow::Result<ContainerStats> {
        let n = {
            let mut reads = self.reads.lock().unwrap();
            *reads += 1;
            *reads
        };
        anyhow::ensure!(!self.fail_on.contains(&n), "synthetic read {} failed", n);
        Ok(stats_at(n as i64, n * 1_000_000, 100 + (n % 100)))
    }
}
