// Recency-biased weighted reservoir (Efraimidis-Spirakis, keys kept in log space).

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::time::Instant;

use super::Sampler;

/// Maps time elapsed since the sampler's reference instant to a log-weight.
/// An item with log-weight `p` is `e^p` times as likely to survive as one with 0.
pub type PriorityFn = Box<dyn Fn(Duration) -> f64 + Send + Sync>;

/// Log-weight growing linearly with age of the sampler: items observed `decay`
/// apart differ in weight by a factor of `e`.
pub fn recency_priority(decay: Duration) -> PriorityFn {
    let scale = decay.as_secs_f64().max(f64::MIN_POSITIVE);
    Box::new(move |elapsed| elapsed.as_secs_f64() / scale)
}

struct Keyed<T> {
    key: f64,
    item: T,
}

impl<T> PartialEq for Keyed<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key.total_cmp(&other.key) == Ordering::Equal
    }
}

impl<T> Eq for Keyed<T> {}

impl<T> PartialOrd for Keyed<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Keyed<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.total_cmp(&other.key)
    }
}

/// Weighted reservoir of at most `max_size` items. Each update draws
/// `key = ln(-ln u) - priority(elapsed)`; the `max_size` smallest keys are kept,
/// which is the classic `u^(1/w)` largest-key rule without overflowing `w`.
pub struct WeightedSampler<T> {
    max_size: usize,
    // Max-heap on key: the root is the first to go.
    heap: BinaryHeap<Keyed<T>>,
    priority: PriorityFn,
    reference: Instant,
    rng: SmallRng,
}

impl<T> WeightedSampler<T> {
    pub fn new(max_size: usize, priority: PriorityFn) -> Self {
        Self::with_rng(max_size, priority, SmallRng::from_entropy())
    }

    pub fn with_seed(max_size: usize, priority: PriorityFn, seed: u64) -> Self {
        Self::with_rng(max_size, priority, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(max_size: usize, priority: PriorityFn, rng: SmallRng) -> Self {
        Self {
            max_size,
            heap: BinaryHeap::with_capacity(max_size),
            priority,
            reference: Instant::now(),
            rng,
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    fn draw_key(&mut self) -> f64 {
        let elapsed = Instant::now().saturating_duration_since(self.reference);
        let u: f64 = self.rng.gen_range(f64::MIN_POSITIVE..1.0);
        (-u.ln()).ln() - (self.priority)(elapsed)
    }
}

impl<T> fmt::Debug for WeightedSampler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeightedSampler")
            .field("max_size", &self.max_size)
            .field("len", &self.heap.len())
            .field("reference", &self.reference)
            .finish_non_exhaustive()
    }
}

impl<T> Sampler<T> for WeightedSampler<T> {
    fn update(&mut self, item: T) {
        if self.max_size == 0 {
            return;
        }
        let key = self.draw_key();
        if self.heap.len() < self.max_size {
            self.heap.push(Keyed { key, item });
            return;
        }
        if let Some(worst) = self.heap.peek()
            && key < worst.key
        {
            self.heap.pop();
            self.heap.push(Keyed { key, item });
        }
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn for_each<F: FnMut(&T)>(&self, mut f: F) {
        for keyed in self.heap.iter() {
            f(&keyed.item);
        }
    }

    /// Clears the sample. The reference instant is kept so priorities stay
    /// comparable across resets.
    fn reset(&mut self) {
        self.heap.clear();
    }
}
