// Periodic-reset decorator: discards the wrapped sampler's state once per period.

use std::time::Duration;

use tokio::time::Instant;

use super::{Sampler, Strategy};

#[derive(Debug)]
pub struct PeriodicReset<T> {
    period: Duration,
    last_reset: Instant,
    inner: Box<Strategy<T>>,
}

impl<T> PeriodicReset<T> {
    pub fn new(period: Duration, inner: Strategy<T>) -> Self {
        Self {
            period,
            last_reset: Instant::now(),
            inner: Box::new(inner),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn inner(&self) -> &Strategy<T> {
        &self.inner
    }

    /// True once a full period has passed since the last reset. Reads treat an
    /// expired sampler as empty; the next update performs the actual reset.
    fn expired(&self) -> bool {
        self.last_reset.elapsed() >= self.period
    }
}

impl<T: Clone> Sampler<T> for PeriodicReset<T> {
    fn update(&mut self, item: T) {
        if self.expired() {
            self.reset();
        }
        self.inner.update(item);
    }

    fn len(&self) -> usize {
        if self.expired() { 0 } else { self.inner.len() }
    }

    fn for_each<F: FnMut(&T)>(&self, f: F) {
        if !self.expired() {
            self.inner.for_each(f);
        }
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.last_reset = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::ReservoirSampler;

    fn periodic(period_secs: u64) -> PeriodicReset<u32> {
        PeriodicReset::new(
            Duration::from_secs(period_secs),
            Strategy::Uniform(ReservoirSampler::with_seed(100, 1)),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn len_drops_to_zero_once_period_elapses() {
        let mut s = periodic(10);
        for i in 0..50 {
            s.update(i);
        }
        tokio::time::advance(Duration::from_secs(9)).await;
        assert_eq!(s.len(), 50);
        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(s.len(), 0);
        assert!(s.items().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn update_after_expiry_starts_fresh_window() {
        let mut s = periodic(10);
        for i in 0..50 {
            s.update(i);
        }
        tokio::time::advance(Duration::from_secs(15)).await;
        s.update(500);
        assert_eq!(s.items(), vec![500]);
        tokio::time::advance(Duration::from_secs(5)).await;
        // Window restarted at the update, not at the previous deadline.
        assert_eq!(s.len(), 1);
    }
}
