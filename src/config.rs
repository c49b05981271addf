use std::time::Duration;

use chrono::TimeDelta;
use serde::Deserialize;

use crate::sampling::SamplerParameters;
use crate::summary::percentiles::DEFAULT_PERCENTAGES;

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub sampler: SamplerConfig,
    pub history: HistoryConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SamplerConfig {
    #[serde(default = "default_sampler_name")]
    pub name: String,
    pub num_samples: usize,
    /// Observations per window; required by the "window" sampler.
    #[serde(default)]
    pub window_size: u64,
    /// 0 disables periodic reset.
    #[serde(default)]
    pub reset_period_secs: u64,
    /// Recency scale of the "weighted" sampler.
    #[serde(default = "default_decay_secs")]
    pub decay_secs: u64,
}

fn default_sampler_name() -> String {
    "uniform".into()
}

fn default_decay_secs() -> u64 {
    300
}

impl From<&SamplerConfig> for SamplerParameters {
    fn from(c: &SamplerConfig) -> Self {
        SamplerParameters {
            sampler_name: c.name.clone(),
            num_samples: c.num_samples,
            window_size: c.window_size,
            reset_period: Duration::from_secs(c.reset_period_secs),
            decay: Duration::from_secs(c.decay_secs),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    pub max_age_secs: u64,
    /// -1 keeps every entry younger than max_age_secs.
    pub max_items: i64,
}

impl HistoryConfig {
    pub fn max_age(&self) -> TimeDelta {
        i64::try_from(self.max_age_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX)
    }

    pub fn max_items(&self) -> Option<usize> {
        usize::try_from(self.max_items).ok()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryConfig {
    #[serde(default = "default_percentiles")]
    pub percentiles: Vec<u32>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            percentiles: default_percentiles(),
        }
    }
}

fn default_percentiles() -> Vec<u32> {
    DEFAULT_PERCENTAGES.to_vec()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    pub sample_interval_ms: u64,
    /// How often each collection task logs its summary stats at INFO level.
    pub stats_log_interval_secs: u64,
}

impl EngineConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: EngineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn sampler_parameters(&self) -> SamplerParameters {
        SamplerParameters::from(&self.sampler)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.sampler.name.is_empty(),
            "sampler.name must be non-empty"
        );
        anyhow::ensure!(
            self.sampler.num_samples > 0,
            "sampler.num_samples must be > 0, got {}",
            self.sampler.num_samples
        );
        anyhow::ensure!(
            self.sampler.name != "window" || self.sampler.window_size > 0,
            "sampler.window_size must be > 0 for the window sampler, got {}",
            self.sampler.window_size
        );
        anyhow::ensure!(
            self.sampler.decay_secs > 0,
            "sampler.decay_secs must be > 0, got {}",
            self.sampler.decay_secs
        );
        anyhow::ensure!(
            self.history.max_age_secs > 0,
            "history.max_age_secs must be > 0, got {}",
            self.history.max_age_secs
        );
        anyhow::ensure!(
            self.history.max_items == -1 || self.history.max_items > 0,
            "history.max_items must be -1 (unbounded) or > 0, got {}",
            self.history.max_items
        );
        anyhow::ensure!(
            !self.summary.percentiles.is_empty(),
            "summary.percentiles must be non-empty"
        );
        if let Some(p) = self
            .summary
            .percentiles
            .iter()
            .find(|p| !(1..=100).contains(*p))
        {
            anyhow::bail!("summary.percentiles entries must be in 1..=100, got {}", p);
        }
        anyhow::ensure!(
            self.monitoring.sample_interval_ms > 0,
            "monitoring.sample_interval_ms must be > 0, got {}",
            self.monitoring.sample_interval_ms
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        Ok(())
    }
}
