// Time-indexed ring buffer with age and count retention.
// Entries are kept ascending by timestamp; index 0 of the public view is the newest.

use chrono::{DateTime, TimeDelta, Utc};
use std::collections::VecDeque;

#[derive(Debug, Clone)]
struct Entry<T> {
    timestamp: DateTime<Utc>,
    item: T,
}

/// Bounded recent-history window.
///
/// `max_items = None` grows without a count bound (the deque doubles its
/// backing storage); `Some(n)` keeps at most the `n` newest entries. Either way
/// entries older than `newest - age` are dropped on every add.
///
/// No internal locking: one writer per store.
#[derive(Debug, Clone)]
pub struct TimedStore<T> {
    buffer: VecDeque<Entry<T>>,
    age: TimeDelta,
    max_items: Option<usize>,
}

impl<T> TimedStore<T> {
    pub fn new(age: TimeDelta, max_items: Option<usize>) -> Self {
        let buffer = match max_items {
            Some(n) => VecDeque::with_capacity(n),
            None => VecDeque::new(),
        };
        Self {
            buffer,
            age,
            max_items,
        }
    }

    pub fn age(&self) -> TimeDelta {
        self.age
    }

    pub fn max_items(&self) -> Option<usize> {
        self.max_items
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Inserts `item` at `timestamp`. In-order timestamps append in O(1);
    /// out-of-order ones are placed after any equal timestamps.
    pub fn add(&mut self, timestamp: DateTime<Utc>, item: T) {
        if let Some(max) = self.max_items {
            if max == 0 {
                return;
            }
            if self.buffer.len() >= max {
                // Full window: the oldest entry makes room, unless the new one is older still.
                match self.buffer.front() {
                    Some(oldest) if timestamp < oldest.timestamp => return,
                    _ => {
                        self.buffer.pop_front();
                    }
                }
            }
        }

        let entry = Entry { timestamp, item };
        match self.buffer.back() {
            Some(newest) if timestamp < newest.timestamp => {
                let pos = self.buffer.partition_point(|e| e.timestamp <= timestamp);
                // VecDeque::insert moves whichever side of `pos` is shorter.
                self.buffer.insert(pos, entry);
            }
            _ => self.buffer.push_back(entry),
        }

        self.evict_expired();
    }

    /// Drops everything older than `newest - age` in one pass.
    fn evict_expired(&mut self) {
        let Some(newest) = self.buffer.back().map(|e| e.timestamp) else {
            return;
        };
        let Some(cutoff) = newest.checked_sub_signed(self.age) else {
            return;
        };
        let expired = self.buffer.partition_point(|e| e.timestamp < cutoff);
        if expired > 0 {
            self.buffer.drain(..expired);
        }
    }

    /// Items with timestamps in `[start, end]`, ascending. `None` leaves that side
    /// unbounded. When more than `max_results` qualify, the newest are kept.
    pub fn in_time_range(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        max_results: usize,
    ) -> Vec<&T> {
        if self.buffer.is_empty() || max_results == 0 {
            return Vec::new();
        }
        if let (Some(s), Some(e)) = (start, end)
            && s > e
        {
            return Vec::new();
        }

        let lo = start.map_or(0, |s| self.buffer.partition_point(|e| e.timestamp < s));
        let hi = end.map_or(self.buffer.len(), |end| {
            self.buffer.partition_point(|e| e.timestamp <= end)
        });
        if lo >= hi {
            return Vec::new();
        }
        let lo = lo.max(hi - max_results.min(hi));
        self.buffer.range(lo..hi).map(|e| &e.item).collect()
    }

    /// The `index`-th most recent item; 0 is the newest.
    pub fn get(&self, index: usize) -> Option<&T> {
        let len = self.buffer.len();
        if index >= len {
            return None;
        }
        self.buffer.get(len - 1 - index).map(|e| &e.item)
    }

    /// Timestamp of the newest entry.
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.buffer.back().map(|e| e.timestamp)
    }

    /// All items, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, &T)> {
        self.buffer.iter().map(|e| (e.timestamp, &e.item))
    }
}
