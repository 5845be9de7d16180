//! Eased value transitions.
//!
//! A [`SmoothedValue`] glides from wherever it currently is to a new target along a smoothstep
//! curve. Completion is reported by handing back the event registered with the transition, so
//! the owner decides what "reached" means without the value borrowing its owner.

use crate::numeric::{smoothstep, smoothstep_integral};

/// How long a transition should take: exactly one of a rate or a fixed duration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transition {
    /// Units per second. A rate of zero or less completes instantly.
    Rate(f64),
    /// Seconds. Ignored (instant completion) when the value is already at its target.
    Duration(f64),
}

#[derive(Clone, Debug)]
pub struct SmoothedValue<E = ()> {
    start: f64,
    target: f64,
    elapsed: f64,
    duration: f64,
    on_reached: Option<E>,
}

impl<E> Default for SmoothedValue<E> {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl<E> SmoothedValue<E> {
    pub fn new(initial: f64) -> Self {
        Self {
            start: initial,
            target: initial,
            elapsed: 0.0,
            duration: 0.0,
            on_reached: None,
        }
    }

    /// Current interpolated value; equals the target once the transition is over.
    pub fn current(&self) -> f64 {
        if !self.is_transitioning() {
            return self.target;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.start + (self.target - self.start) * smoothstep(t)
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_transitioning(&self) -> bool {
        self.duration > 0.0 && self.elapsed < self.duration
    }

    /// Area under the value over the next `dt` seconds, following the transition as
    /// [`update`](Self::update) would and holding at the target once it is reached.
    pub fn integral(&self, dt: f64) -> f64 {
        if !self.is_transitioning() {
            return self.target * dt;
        }
        let t0 = self.elapsed / self.duration;
        let t1 = ((self.elapsed + dt) / self.duration).min(1.0);
        let eased = smoothstep_integral(t1) - smoothstep_integral(t0);
        let ramp = self.duration * (self.start * (t1 - t0) + (self.target - self.start) * eased);
        let settled = (self.elapsed + dt - self.duration).max(0.0) * self.target;
        ramp + settled
    }

    /// Starts a transition from the current value towards `target`.
    ///
    /// Any event registered by an earlier, unfinished transition is dropped. When the new
    /// transition has zero length it is complete already and `on_reached` is returned here
    /// instead of from a later [`update`](Self::update).
    pub fn set_target(
        &mut self,
        target: f64,
        transition: Transition,
        on_reached: Option<E>,
    ) -> Option<E> {
        assert!(target.is_finite(), "smoothed target must be finite, got {target}");
        let start = self.current();
        let difference = (target - start).abs();
        self.duration = match transition {
            Transition::Rate(rate) if rate > 0.0 => difference / rate,
            Transition::Rate(_) => 0.0,
            Transition::Duration(duration) if difference > 0.0 => duration.max(0.0),
            Transition::Duration(_) => 0.0,
        };
        self.start = start;
        self.target = target;
        self.elapsed = 0.0;
        self.on_reached = on_reached;

        if self.is_transitioning() {
            None
        } else {
            self.on_reached.take()
        }
    }

    /// Snaps to `value` and discards any pending completion event.
    pub fn set_immediately(&mut self, value: f64) {
        self.start = value;
        self.target = value;
        self.elapsed = 0.0;
        self.duration = 0.0;
        self.on_reached = None;
    }

    /// Advances the transition by `dt` seconds, returning the completion event if this step
    /// finished it.
    pub fn update(&mut self, dt: f64) -> Option<E> {
        assert!(dt >= 0.0, "time delta may not be negative (got {dt})");
        if !self.is_transitioning() {
            return None;
        }
        self.elapsed += dt;
        if self.is_transitioning() {
            None
        } else {
            self.on_reached.take()
        }
    }
}
