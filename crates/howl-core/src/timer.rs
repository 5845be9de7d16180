//! Keyed one-shot countdown timers.
//!
//! Each timer carries an event value that is handed to the caller's handler when it expires.
//! Handlers receive the manager itself, so they can schedule follow-ups (including under the
//! key that just fired) or cancel timers that have not fired yet.

use fnv::FnvHashMap;

#[derive(Clone, Debug)]
struct Timer<E> {
    initial_duration: f64,
    remaining: f64,
    // Unique per add; expiry order and stale-snapshot detection both use it.
    id: u64,
    event: E,
}

#[derive(Clone, Debug)]
pub struct TimerManager<E = ()> {
    timers: FnvHashMap<String, Timer<E>>,
    next_id: u64,
}

impl<E> Default for TimerManager<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TimerManager<E> {
    pub fn new() -> Self {
        Self {
            timers: FnvHashMap::default(),
            next_id: 0,
        }
    }

    /// Schedules `event` to fire after `duration` seconds, replacing any timer under `key`.
    ///
    /// A non-positive duration does not schedule anything: the event comes straight back so
    /// the caller can fire it before doing anything else.
    pub fn add_timer(&mut self, key: impl Into<String>, duration: f64, event: E) -> Option<E> {
        if duration.is_nan() || duration <= 0.0 {
            return Some(event);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.timers.insert(
            key.into(),
            Timer {
                initial_duration: duration,
                remaining: duration,
                id,
                event,
            },
        );
        None
    }

    /// Removes the timer under `key` without firing it. Returns whether one existed.
    pub fn cancel_timer(&mut self, key: &str) -> bool {
        self.timers.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn has_timer(&self, key: &str) -> bool {
        self.timers.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn remaining_time(&self, key: &str) -> Option<f64> {
        self.timers.get(key).map(|t| t.remaining)
    }

    pub fn elapsed_time(&self, key: &str) -> Option<f64> {
        self.timers
            .get(key)
            .map(|t| t.initial_duration - t.remaining)
    }

    /// Fraction of the timer's duration that has passed, in [0, 1).
    pub fn proportion_elapsed(&self, key: &str) -> Option<f64> {
        self.timers
            .get(key)
            .map(|t| (t.initial_duration - t.remaining) / t.initial_duration)
    }

    /// Counts every timer down by `dt` seconds and fires the ones that run out.
    ///
    /// Timers are visited in the order they were scheduled, over a snapshot taken before any
    /// handler runs. An expired timer is removed before `on_fire` sees its event. Timers added
    /// by a handler wait for the next update; timers cancelled or replaced by a handler are
    /// skipped.
    pub fn update<F>(&mut self, dt: f64, mut on_fire: F)
    where
        F: FnMut(&mut Self, E),
    {
        assert!(dt >= 0.0, "time delta may not be negative (got {dt})");
        let mut snapshot: Vec<(u64, String)> = self
            .timers
            .iter()
            .map(|(key, timer)| (timer.id, key.clone()))
            .collect();
        snapshot.sort_unstable_by_key(|(id, _)| *id);

        for (id, key) in snapshot {
            let expired = match self.timers.get_mut(&key) {
                Some(timer) if timer.id == id => {
                    timer.remaining -= dt;
                    timer.remaining <= 0.0
                }
                _ => continue,
            };
            if expired {
                if let Some(timer) = self.timers.remove(&key) {
                    log::trace!("timer '{key}' fired after {:.3}s", timer.initial_duration);
                    on_fire(self, timer.event);
                }
            }
        }
    }
}
