// Chain sampling over a sliding window of the most recent observations.

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::Sampler;

#[derive(Debug, Clone)]
struct Chain<T> {
    // Head is the current sample; the rest are pre-selected successors, by arrival index.
    links: VecDeque<(u64, T)>,
    next_index: u64,
}

impl<T> Default for Chain<T> {
    fn default() -> Self {
        Self {
            links: VecDeque::new(),
            next_index: 0,
        }
    }
}

/// `num_samples` independent chains, each holding one uniform sample of the
/// last `window_size` observations. When a chain's sample leaves the window it
/// is replaced by a successor chosen when the sample was taken, so each chain
/// needs O(1) expected memory.
///
/// Samples are drawn with replacement: two chains may hold the same item.
#[derive(Debug, Clone)]
pub struct ChainSampler<T> {
    num_samples: usize,
    window_size: u64,
    seen: u64,
    chains: Vec<Chain<T>>,
    rng: SmallRng,
}

impl<T: Clone> ChainSampler<T> {
    /// `window_size` is clamped to at least 1.
    pub fn new(num_samples: usize, window_size: u64) -> Self {
        Self::with_rng(num_samples, window_size, SmallRng::from_entropy())
    }

    pub fn with_seed(num_samples: usize, window_size: u64, seed: u64) -> Self {
        Self::with_rng(num_samples, window_size, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(num_samples: usize, window_size: u64, rng: SmallRng) -> Self {
        Self {
            num_samples,
            window_size: window_size.max(1),
            seen: 0,
            chains: (0..num_samples).map(|_| Chain::default()).collect(),
            rng,
        }
    }

    pub fn window_size(&self) -> u64 {
        self.window_size
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }
}

impl<T: Clone> Sampler<T> for ChainSampler<T> {
    fn update(&mut self, item: T) {
        self.seen += 1;
        let n = self.seen;
        let window = n.min(self.window_size);

        for chain in &mut self.chains {
            if self.rng.gen_range(0..window) == 0 {
                // New sample for this chain; its successors are discarded.
                chain.links.clear();
                chain.links.push_back((n, item.clone()));
                chain.next_index = n + self.rng.gen_range(1..=self.window_size);
            } else if n == chain.next_index {
                chain.links.push_back((n, item.clone()));
                chain.next_index = n + self.rng.gen_range(1..=self.window_size);
            }

            while chain.links.len() > 1
                && chain
                    .links
                    .front()
                    .is_some_and(|(idx, _)| idx + self.window_size <= n)
            {
                chain.links.pop_front();
            }
        }
    }

    fn len(&self) -> usize {
        self.chains.iter().filter(|c| !c.links.is_empty()).count()
    }

    fn for_each<F: FnMut(&T)>(&self, mut f: F) {
        for chain in &self.chains {
            if let Some((_, item)) = chain.links.front() {
                f(item);
            }
        }
    }

    fn reset(&mut self) {
        self.seen = 0;
        for chain in &mut self.chains {
            *chain = Chain::default();
        }
    }
}
