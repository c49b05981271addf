// Per-container collection task: one periodic writer per container drives the
// summary wrapper and the recent-stats history. Different containers share nothing.

use std::sync::Arc;

use tokio::sync::{RwLock, oneshot};
use tokio::time::{Duration, Instant, interval};
use tracing::Instrument;

use crate::config::EngineConfig;
use crate::history::StatsHistory;
use crate::models::ContainerStatsSample;
use crate::sampling::{SamplerError, SamplerRegistry};
use crate::source::StatsSource;
use crate::summary::StatsSummaryWrapper;

/// Rate limit for repeated source failures (a dead container fails every tick).
const READ_FAILURE_WARN_INTERVAL: Duration = Duration::from_secs(60);

/// Everything the collection task writes to, shared with readers.
pub struct MonitoredContainer<S> {
    pub wrapper: Arc<StatsSummaryWrapper<S>>,
    pub history: Arc<RwLock<StatsHistory>>,
}

impl<S> Clone for MonitoredContainer<S> {
    fn clone(&self) -> Self {
        Self {
            wrapper: self.wrapper.clone(),
            history: self.history.clone(),
        }
    }
}

impl<S: StatsSource> MonitoredContainer<S> {
    /// Builds the sampler, summary wrapper and history for one container.
    /// Fails only when the configured sampler cannot be built; the caller
    /// decides whether to skip the container or abort.
    pub fn new(
        name: impl Into<String>,
        source: S,
        registry: &SamplerRegistry<ContainerStatsSample>,
        config: &EngineConfig,
    ) -> Result<Self, SamplerError> {
        let sampler = registry.new_sampler(&config.sampler_parameters())?;
        let wrapper = StatsSummaryWrapper::new(
            name,
            source,
            sampler,
            config.summary.percentiles.clone(),
        );
        Ok(Self {
            wrapper: Arc::new(wrapper),
            history: Arc::new(RwLock::new(StatsHistory::from_config(&config.history))),
        })
    }
}

/// Collection timing and logging config.
pub struct MonitorConfig {
    pub sample_interval_ms: u64,
    /// How often to log summary stats (real seconds).
    pub stats_log_interval_secs: u64,
}

impl From<&EngineConfig> for MonitorConfig {
    fn from(c: &EngineConfig) -> Self {
        Self {
            sample_interval_ms: c.monitoring.sample_interval_ms,
            stats_log_interval_secs: c.monitoring.stats_log_interval_secs,
        }
    }
}

/// Spawns the collection task. It polls the source every `sample_interval_ms`
/// until `shutdown_rx` fires (or its sender is dropped); the wrapper and history
/// are left as they were.
pub fn spawn<S>(
    container: MonitoredContainer<S>,
    config: MonitorConfig,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()>
where
    S: StatsSource + 'static,
{
    let MonitoredContainer { wrapper, history } = container;
    let MonitorConfig {
        sample_interval_ms,
        stats_log_interval_secs,
    } = config;

    let span = tracing::span!(
        tracing::Level::DEBUG,
        "monitor",
        container = wrapper.name(),
        sample_interval_ms
    );

    tokio::spawn(
        async move {
            let mut tick = interval(Duration::from_millis(sample_interval_ms));
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
            stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            {
                let history = history.read().await;
                tracing::debug!(
                    history_max_age_secs = history.max_age().num_seconds(),
                    history_max_items = ?history.max_items(),
                    "Monitor started"
                );
            }

            let mut read_failures_total: u64 = 0;
            let mut last_failure_warn: Option<Instant> = None;

            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        match wrapper.get_stats().await {
                            Ok(stats) => history.write().await.add(stats),
                            Err(e) => {
                                read_failures_total += 1;
                                let should_warn = last_failure_warn
                                    .is_none_or(|t| t.elapsed() >= READ_FAILURE_WARN_INTERVAL);
                                if should_warn {
                                    tracing::warn!(
                                        error = %e,
                                        operation = "get_stats",
                                        read_failures_total,
                                        "stats read failed"
                                    );
                                    last_failure_warn = Some(Instant::now());
                                } else {
                                    tracing::debug!(error = %e, operation = "get_stats", "stats read failed");
                                }
                            }
                        }
                    }
                    _ = &mut shutdown_rx => {
                        tracing::debug!("Monitor shutting down");
                        break;
                    }
                    _ = stats_log_tick.tick() => {
                        let history_len = history.read().await.len();
                        tracing::info!(
                            observations = wrapper.observations(),
                            retained_samples = wrapper.retained_samples(),
                            history_len,
                            read_failures_total,
                            "summary stats"
                        );
                    }
                }
            }
        }
        .instrument(span),
    )
}
