// Summary wrapper: decorates a stats source, turning each pair of consecutive
// observations into one rate sample for the sampler, keeping the running
// memory aggregates, and building percentile tables on demand.

pub mod percentiles;

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::models::{ContainerStats, ContainerStatsSample, ContainerStatsSummary};
use crate::sampling::{Sampler, Strategy};
use crate::source::StatsSource;
use percentiles::{add_sample, percentiles};

struct SummaryState {
    sampler: Strategy<ContainerStatsSample>,
    // Last observed snapshot; the next observation is paired with it.
    previous: Option<ContainerStats>,
    last_observed: Option<DateTime<Utc>>,
    observations: u64,
    max_memory_usage: u64,
    // Exact running mean: u128 cannot overflow summing u64 readings.
    memory_total: u128,
    memory_count: u64,
    avg_memory_usage: u64,
}

/// Per-container summary state behind one lock. Observation and summary reads
/// each hold the lock for their full duration.
pub struct StatsSummaryWrapper<S> {
    name: String,
    source: S,
    percentages: Vec<u32>,
    state: Mutex<SummaryState>,
}

impl<S: StatsSource> StatsSummaryWrapper<S> {
    /// Reads from the wrapped source and records the snapshot.
    #[instrument(skip(self), fields(container = %self.name, operation = "get_stats"))]
    pub async fn get_stats(&self) -> anyhow::Result<ContainerStats> {
        let stats = self.source.get_stats().await?;
        self.observe(&stats);
        Ok(stats)
    }
}

impl<S> StatsSummaryWrapper<S> {
    pub fn new(
        name: impl Into<String>,
        source: S,
        sampler: Strategy<ContainerStatsSample>,
        percentages: Vec<u32>,
    ) -> Self {
        Self {
            name: name.into(),
            source,
            percentages,
            state: Mutex::new(SummaryState {
                sampler,
                previous: None,
                last_observed: None,
                observations: 0,
                max_memory_usage: 0,
                memory_total: 0,
                memory_count: 0,
                avg_memory_usage: 0,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn lock(&self) -> MutexGuard<'_, SummaryState> {
        // Every update completes under the lock, so a poisoned state is still whole.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records one snapshot. The interval since the previous snapshot becomes
    /// one rate sample; a rejected pair only moves the previous snapshot on.
    pub fn observe(&self, stats: &ContainerStats) {
        let mut state = self.lock();
        state.last_observed = Some(Utc::now());
        state.observations += 1;

        let mut interval = Vec::with_capacity(1);
        add_sample(state.previous.as_ref(), Some(stats), &mut interval);
        if let Some(sample) = interval.pop() {
            state.sampler.update(sample);
        } else if state.previous.is_some() {
            debug!(
                container = %self.name,
                "snapshot pair skipped (missing data or non-increasing timestamp)"
            );
        }
        state.previous = Some(stats.clone());

        if let Some(usage) = stats.memory_usage() {
            state.max_memory_usage = state.max_memory_usage.max(usage);
            state.memory_total += u128::from(usage);
            state.memory_count += 1;
            state.avg_memory_usage = (state.memory_total / u128::from(state.memory_count)) as u64;
        }
    }

    /// Number of snapshots observed since construction.
    pub fn observations(&self) -> u64 {
        self.lock().observations
    }

    /// Number of rate samples the sampler currently retains.
    pub fn retained_samples(&self) -> usize {
        self.lock().sampler.len()
    }

    /// Builds the summary from the current sample, oldest interval first.
    #[instrument(skip(self), fields(container = %self.name, operation = "summary"))]
    pub fn summary(&self) -> ContainerStatsSummary {
        let state = self.lock();

        let mut samples = state.sampler.items();
        samples.sort_by_key(|s| s.timestamp);

        let mut cpu: Vec<u64> = samples.iter().map(|s| s.cpu.usage).collect();
        let mut memory: Vec<u64> = samples.iter().map(|s| s.memory.usage).collect();

        ContainerStatsSummary {
            timestamp: state.last_observed,
            max_memory_usage: state.max_memory_usage,
            avg_memory_usage: state.avg_memory_usage,
            cpu_usage_percentiles: percentiles(&mut cpu, &self.percentages),
            memory_usage_percentiles: percentiles(&mut memory, &self.percentages),
            samples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CpuStats, CpuUsage, MemoryStats};
    use crate::sampling::ReservoirSampler;
    use chrono::TimeDelta;

    fn wrapper(k: usize) -> StatsSummaryWrapper<()> {
        StatsSummaryWrapper::new(
            "test",
            (),
            Strategy::Uniform(ReservoirSampler::with_seed(k, 1)),
            percentiles::DEFAULT_PERCENTAGES.to_vec(),
        )
    }

    fn stats(secs: i64, cpu_total: u64, mem: Option<u64>) -> ContainerStats {
        ContainerStats {
            timestamp: DateTime::from_timestamp(1_700_000_000, 0).unwrap() + TimeDelta::seconds(secs),
            cpu: Some(CpuStats {
                usage: CpuUsage {
                    total: cpu_total,
                    ..Default::default()
                },
            }),
            memory: mem.map(|usage| MemoryStats {
                usage,
                ..Default::default()
            }),
            network: None,
        }
    }

    #[test]
    fn running_max_and_exact_mean() {
        let w = wrapper(10);
        w.observe(&stats(0, 0, Some(100)));
        w.observe(&stats(1, 10, Some(300)));
        w.observe(&stats(2, 20, Some(201)));
        let s = w.summary();
        assert_eq!(s.max_memory_usage, 300);
        // 601 / 3, integer division
        assert_eq!(s.avg_memory_usage, 200);
    }

    #[test]
    fn mean_survives_totals_beyond_u64() {
        let w = wrapper(4);
        for i in 0..10 {
            w.observe(&stats(i, 0, Some(u64::MAX)));
        }
        let s = w.summary();
        assert_eq!(s.avg_memory_usage, u64::MAX);
        assert_eq!(s.max_memory_usage, u64::MAX);
    }

    #[test]
    fn snapshots_without_memory_skip_aggregates_but_are_sampled() {
        let w = wrapper(10);
        w.observe(&stats(0, 0, None));
        w.observe(&stats(1, 10, Some(50)));
        assert_eq!(w.observations(), 2);
        // The first snapshot has no memory, so the pair yields no sample.
        assert_eq!(w.retained_samples(), 0);
        let s = w.summary();
        assert_eq!(s.avg_memory_usage, 50);
        assert!(s.samples.is_empty());

        w.observe(&stats(2, 25, Some(70)));
        let s = w.summary();
        assert_eq!(s.samples.len(), 1);
        assert_eq!(s.samples[0].cpu.usage, 15);
    }

    #[test]
    fn each_observation_pairs_with_the_previous_one() {
        let w = wrapper(10);
        w.observe(&stats(0, 0, Some(100)));
        w.observe(&stats(1, 10, Some(200)));
        w.observe(&stats(3, 30, Some(300)));
        let s = w.summary();
        let cpu: Vec<u64> = s.samples.iter().map(|x| x.cpu.usage).collect();
        let mem: Vec<u64> = s.samples.iter().map(|x| x.memory.usage).collect();
        let ms: Vec<u64> = s.samples.iter().map(|x| x.duration_ms).collect();
        assert_eq!(cpu, vec![10, 20]);
        assert_eq!(mem, vec![200, 300]);
        assert_eq!(ms, vec![1_000, 2_000]);
        assert_eq!(s.cpu_usage_percentiles.len(), 5);
        assert!(s.timestamp.is_some());
    }

    #[test]
    fn out_of_order_snapshot_yields_no_sample() {
        let w = wrapper(10);
        w.observe(&stats(5, 50, Some(100)));
        w.observe(&stats(4, 40, Some(100)));
        assert_eq!(w.retained_samples(), 0);
        // The late snapshot still becomes the pairing base.
        w.observe(&stats(6, 45, Some(100)));
        let s = w.summary();
        assert_eq!(s.samples.len(), 1);
        assert_eq!(s.samples[0].cpu.usage, 5);
        assert_eq!(s.samples[0].duration_ms, 2_000);
    }

    #[test]
    fn evicting_sampler_keeps_one_interval_per_sample() {
        let w = wrapper(5);
        for i in 0..500 {
            w.observe(&stats(i, i as u64 * 3, Some(10)));
        }
        assert_eq!(w.retained_samples(), 5);
        let s = w.summary();
        assert_eq!(s.samples.len(), 5);
        assert!(s.samples.iter().all(|x| x.cpu.usage == 3 && x.duration_ms == 1_000));
        assert!(s.cpu_usage_percentiles.iter().all(|p| p.value == 3));
    }

    #[test]
    fn empty_summary() {
        let s = wrapper(10).summary();
        assert_eq!(s, ContainerStatsSummary::default());
    }
}
