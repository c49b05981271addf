// Nearest-rank percentiles and rate samples derived from cumulative snapshots.

use crate::models::{ContainerStats, ContainerStatsSample, CpuSample, MemorySample, Percentile};

/// Percentage points reported when none are configured.
pub const DEFAULT_PERCENTAGES: [u32; 5] = [50, 80, 90, 95, 99];

/// Nearest-rank percentiles of `values` (sorted in place, ascending).
///
/// For `p` over `n` values the rank is `floor(p/100 * (n+1))`, clamped to
/// `[1, n]`; no interpolation. An empty input yields an empty table.
pub fn percentiles(values: &mut [u64], percentages: &[u32]) -> Vec<Percentile> {
    if values.is_empty() {
        return Vec::new();
    }
    values.sort_unstable();
    let n = values.len();
    percentages
        .iter()
        .map(|&percentage| {
            let rank = (percentage as u64 * (n as u64 + 1)) / 100;
            let rank = (rank as usize).clamp(1, n);
            Percentile {
                percentage,
                value: values[rank - 1],
            }
        })
        .collect()
}

/// Appends the rate sample between `prev` and `current` to `samples`.
///
/// No-op unless both are present, both carry CPU and memory data, and
/// `current` is strictly later than `prev`. Returns whether a sample was added.
pub fn add_sample(
    prev: Option<&ContainerStats>,
    current: Option<&ContainerStats>,
    samples: &mut Vec<ContainerStatsSample>,
) -> bool {
    let (Some(prev), Some(current)) = (prev, current) else {
        return false;
    };
    let (Some(prev_cpu), Some(cur_cpu)) = (prev.cpu_total(), current.cpu_total()) else {
        return false;
    };
    if prev.memory.is_none() {
        return false;
    }
    let Some(cur_mem) = current.memory_usage() else {
        return false;
    };
    if current.timestamp <= prev.timestamp {
        return false;
    }
    let duration_ms = (current.timestamp - prev.timestamp)
        .num_milliseconds()
        .max(0) as u64;
    samples.push(ContainerStatsSample {
        timestamp: current.timestamp,
        duration_ms,
        cpu: CpuSample {
            usage: cur_cpu.saturating_sub(prev_cpu),
        },
        memory: MemorySample { usage: cur_mem },
    });
    true
}
