// Per-container recent-stats window for historical queries.

use chrono::{DateTime, TimeDelta, Utc};

use crate::config::HistoryConfig;
use crate::models::ContainerStats;
use crate::timed_store::TimedStore;

#[derive(Debug, Clone)]
pub struct StatsHistory {
    store: TimedStore<ContainerStats>,
}

impl StatsHistory {
    pub fn new(max_age: TimeDelta, max_items: Option<usize>) -> Self {
        Self {
            store: TimedStore::new(max_age, max_items),
        }
    }

    pub fn from_config(config: &HistoryConfig) -> Self {
        Self::new(config.max_age(), config.max_items())
    }

    pub fn add(&mut self, stats: ContainerStats) {
        self.store.add(stats.timestamp, stats);
    }

    /// Snapshots in `[start, end]`, oldest first, at most the newest `max_stats`.
    pub fn recent_stats(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        max_stats: usize,
    ) -> Vec<ContainerStats> {
        self.store
            .in_time_range(start, end, max_stats)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn latest(&self) -> Option<&ContainerStats> {
        self.store.get(0)
    }

    pub fn max_age(&self) -> TimeDelta {
        self.store.age()
    }

    pub fn max_items(&self) -> Option<usize> {
        self.store.max_items()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
