// Name -> factory registry for sampler strategies. Built once at startup and
// passed to whoever constructs per-container samplers.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use tracing::debug;

use super::{
    ChainSampler, PeriodicReset, ReservoirSampler, Strategy, WeightedSampler, recency_priority,
};

/// Reset periods at or below this are treated as "never reset".
pub const MIN_RESET_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, thiserror::Error)]
pub enum SamplerError {
    #[error("unknown sampler: {0}")]
    UnknownSampler(String),
    #[error("invalid sampler parameters: {0}")]
    InvalidParameters(String),
}

/// Selects and parameterizes a sampling strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerParameters {
    pub sampler_name: String,
    pub num_samples: usize,
    /// Observations per window; only used by "window".
    pub window_size: u64,
    /// Wraps the sampler in a periodic reset when above [`MIN_RESET_PERIOD`].
    pub reset_period: Duration,
    /// Recency scale of "weighted": items this far apart differ in weight by `e`.
    pub decay: Duration,
}

impl Default for SamplerParameters {
    fn default() -> Self {
        Self {
            sampler_name: "uniform".into(),
            num_samples: 100,
            window_size: 0,
            reset_period: Duration::ZERO,
            decay: Duration::from_secs(300),
        }
    }
}

pub type SamplerFactory<T> =
    Box<dyn Fn(&SamplerParameters) -> Result<Strategy<T>, SamplerError> + Send + Sync>;

pub struct SamplerRegistry<T> {
    factories: HashMap<String, SamplerFactory<T>>,
}

impl<T> Default for SamplerRegistry<T> {
    fn default() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }
}

impl<T> fmt::Debug for SamplerRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SamplerRegistry")
            .field("names", &self.names())
            .finish()
    }
}

impl<T: Clone + 'static> SamplerRegistry<T> {
    /// Registry with "uniform", "weighted" and "window" registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::default();
        registry.register("uniform", |p| {
            Ok(Strategy::Uniform(ReservoirSampler::new(p.num_samples)))
        });
        registry.register("weighted", |p| {
            if p.decay.is_zero() {
                return Err(SamplerError::InvalidParameters(
                    "weighted sampler needs a non-zero decay".into(),
                ));
            }
            Ok(Strategy::Weighted(WeightedSampler::new(
                p.num_samples,
                recency_priority(p.decay),
            )))
        });
        registry.register("window", |p| {
            if p.window_size == 0 {
                return Err(SamplerError::InvalidParameters(
                    "window sampler needs window_size > 0".into(),
                ));
            }
            Ok(Strategy::Windowed(ChainSampler::new(
                p.num_samples,
                p.window_size,
            )))
        });
        registry
    }

    /// Adds or replaces the factory for `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&SamplerParameters) -> Result<Strategy<T>, SamplerError> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Builds the sampler named by `params.sampler_name`.
    pub fn new_sampler(&self, params: &SamplerParameters) -> Result<Strategy<T>, SamplerError> {
        let factory = self
            .factories
            .get(&params.sampler_name)
            .ok_or_else(|| SamplerError::UnknownSampler(params.sampler_name.clone()))?;
        if params.num_samples == 0 {
            return Err(SamplerError::InvalidParameters(
                "num_samples must be > 0".into(),
            ));
        }
        let sampler = factory(params)?;
        debug!(
            sampler = %params.sampler_name,
            num_samples = params.num_samples,
            reset_period_secs = params.reset_period.as_secs(),
            "sampler created"
        );
        if params.reset_period > MIN_RESET_PERIOD {
            Ok(Strategy::PeriodicReset(PeriodicReset::new(
                params.reset_period,
                sampler,
            )))
        } else {
            Ok(sampler)
        }
    }
}

impl<T> SamplerRegistry<T> {
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
