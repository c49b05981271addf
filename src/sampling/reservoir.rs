// Uniform reservoir sampling (Algorithm R).

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::Sampler;

/// Keeps a uniform random sample of at most `max_size` items from an
/// unbounded stream: after `n` updates every item has probability `k/n` of
/// being retained.
#[derive(Debug, Clone)]
pub struct ReservoirSampler<T> {
    max_size: usize,
    samples: Vec<T>,
    seen: u64,
    rng: SmallRng,
}

impl<T> ReservoirSampler<T> {
    pub fn new(max_size: usize) -> Self {
        Self::with_rng(max_size, SmallRng::from_entropy())
    }

    pub fn with_seed(max_size: usize, seed: u64) -> Self {
        Self::with_rng(max_size, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(max_size: usize, rng: SmallRng) -> Self {
        Self {
            max_size,
            samples: Vec::with_capacity(max_size),
            seen: 0,
            rng,
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Number of updates since construction or the last reset.
    pub fn seen(&self) -> u64 {
        self.seen
    }
}

impl<T> Sampler<T> for ReservoirSampler<T> {
    fn update(&mut self, item: T) {
        self.seen += 1;
        if self.samples.len() < self.max_size {
            self.samples.push(item);
            return;
        }
        let slot = self.rng.gen_range(0..self.seen);
        if slot < self.max_size as u64 {
            self.samples[slot as usize] = item;
        }
    }

    fn len(&self) -> usize {
        self.samples.len()
    }

    fn for_each<F: FnMut(&T)>(&self, f: F) {
        self.samples.iter().for_each(f);
    }

    fn reset(&mut self) {
        self.samples.clear();
        self.seen = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_k_items() {
        let mut s = ReservoirSampler::with_seed(5, 1);
        for i in 0..5 {
            s.update(i);
        }
        let mut got = s.items();
        got.sort();
        assert_eq!(got, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn never_exceeds_max_size() {
        let mut s = ReservoirSampler::with_seed(10, 3);
        for i in 0..10_000 {
            s.update(i);
            assert!(s.len() <= 10);
        }
        assert_eq!(s.len(), 10);
        assert_eq!(s.seen(), 10_000);
    }

    #[test]
    fn zero_size_keeps_nothing() {
        let mut s = ReservoirSampler::with_seed(0, 3);
        for i in 0..100 {
            s.update(i);
        }
        assert!(s.is_empty());
    }

    #[test]
    fn early_and_late_items_equally_likely() {
        // 2000 independent runs of k=10 over a 1000-item stream. Each item is
        // expected in 1% of the samples: 20 of the 2000 runs per item, so the
        // first and last 100-item blocks each expect 2000 hits.
        let runs = 2_000;
        let mut early = 0u64;
        let mut late = 0u64;
        for seed in 0..runs {
            let mut s = ReservoirSampler::with_seed(10, seed);
            for i in 0..1_000u32 {
                s.update(i);
            }
            s.for_each(|&v| {
                if v < 100 {
                    early += 1;
                } else if v >= 900 {
                    late += 1;
                }
            });
        }
        let expected = 2_000.0;
        assert!(((early as f64) - expected).abs() / expected < 0.1, "early = {early}");
        assert!(((late as f64) - expected).abs() / expected < 0.1, "late = {late}");
    }

    #[test]
    fn reset_clears_state() {
        let mut s = ReservoirSampler::with_seed(3, 9);
        for i in 0..10 {
            s.update(i);
        }
        s.reset();
        assert_eq!(s.len(), 0);
        assert_eq!(s.seen(), 0);
        s.update(42);
        assert_eq!(s.items(), vec![42]);
    }
}
