// Bounded sampling of an unbounded observation stream.
//
// Three strategies (uniform reservoir, recency-weighted reservoir, sliding-window
// chain) plus a periodic-reset decorator, unified by the `Strategy` enum.
// No variant locks internally; callers serialize access.

mod chain;
mod periodic;
mod registry;
mod reservoir;
mod weighted;

pub use chain::ChainSampler;
pub use periodic::PeriodicReset;
pub use registry::{
    MIN_RESET_PERIOD, SamplerError, SamplerFactory, SamplerParameters, SamplerRegistry,
};
pub use reservoir::ReservoirSampler;
pub use weighted::{PriorityFn, WeightedSampler, recency_priority};

/// Common capability of every sampling strategy.
pub trait Sampler<T> {
    /// Records one observation.
    fn update(&mut self, item: T);

    /// Number of items currently retained.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visits every retained item, in no particular order.
    fn for_each<F: FnMut(&T)>(&self, f: F);

    /// Discards all retained items.
    fn reset(&mut self);

    fn items(&self) -> Vec<T>
    where
        T: Clone,
        Self: Sized,
    {
        let mut out = Vec::with_capacity(self.len());
        self.for_each(|item| out.push(item.clone()));
        out
    }
}

/// The closed set of sampler variants a registry can build.
#[derive(Debug)]
pub enum Strategy<T> {
    Uniform(ReservoirSampler<T>),
    Weighted(WeightedSampler<T>),
    Windowed(ChainSampler<T>),
    PeriodicReset(PeriodicReset<T>),
}

impl<T> Strategy<T> {
    /// Short name of the variant, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Strategy::Uniform(_) => "uniform",
            Strategy::Weighted(_) => "weighted",
            Strategy::Windowed(_) => "window",
            Strategy::PeriodicReset(_) => "periodic_reset",
        }
    }
}

impl<T: Clone> Sampler<T> for Strategy<T> {
    fn update(&mut self, item: T) {
        match self {
            Strategy::Uniform(s) => s.update(item),
            Strategy::Weighted(s) => s.update(item),
            Strategy::Windowed(s) => s.update(item),
            Strategy::PeriodicReset(s) => s.update(item),
        }
    }

    fn len(&self) -> usize {
        match self {
            Strategy::Uniform(s) => s.len(),
            Strategy::Weighted(s) => s.len(),
            Strategy::Windowed(s) => s.len(),
            Strategy::PeriodicReset(s) => s.len(),
        }
    }

    fn for_each<F: FnMut(&T)>(&self, f: F) {
        match self {
            Strategy::Uniform(s) => s.for_each(f),
            Strategy::Weighted(s) => s.for_each(f),
            Strategy::Windowed(s) => s.for_each(f),
            Strategy::PeriodicReset(s) => s.for_each(f),
        }
    }

    fn reset(&mut self) {
        match self {
            Strategy::Uniform(s) => s.reset(),
            Strategy::Weighted(s) => s.reset(),
            Strategy::Windowed(s) => s.reset(),
            Strategy::PeriodicReset(s) => s.reset(),
        }
    }
}
