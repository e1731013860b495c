//! Virtual clock with an ordered queue of pending continuations.
//!
//! Nothing here reads wall time. The owner moves the clock forward with
//! [`Timeline::pop_due`] and gets back every entry that became due, ordered by
//! due time and then by scheduling order.

use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug)]
pub struct Timeline<T> {
    now: Duration,
    seq: u64,
    pending: BTreeMap<(Duration, u64), T>,
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Timeline<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            seq: 0,
            pending: BTreeMap::new(),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Due time of the earliest pending entry.
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(due, _)| *due)
    }

    /// Schedule `item` to fire `delay` after the current virtual time.
    pub fn schedule(&mut self, delay: Duration, item: T) -> Duration {
        let due = self.now + delay;
        self.pending.insert((due, self.seq), item);
        self.seq += 1;
        due
    }

    /// Pop the earliest entry due at or before `now`, advancing the clock to
    /// its due time. The clock never moves backwards.
    ///
    /// Call repeatedly until it returns `None`; entries scheduled by the
    /// caller in between are picked up if they are already due.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, T)> {
        let key = *self.pending.keys().next()?;
        if key.0 > now {
            self.now = self.now.max(now);
            return None;
        }
        let item = self.pending.remove(&key)?;
        self.now = self.now.max(key.0);
        Some((key.0, item))
    }

    /// Drop every pending entry matching `pred`.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|_, item| !pred(item));
        before - self.pending.len()
    }
}
