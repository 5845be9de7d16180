//! The capability every pulse-producing activity exposes to its host.

use crate::pulse::Pulse;

/// A procedural pulse generator driven by a host loop.
///
/// # Implementation Requirements
///
/// - `initialise()` is called once, before the first `run_simulation()`
/// - `run_simulation()` advances all owned state by `dt` seconds; `dt` is never negative and
///   may be large (the first tick, or after a pause)
/// - `pulse()` only reads; it may be called any number of times between ticks
pub trait Activity {
    fn initialise(&mut self);

    fn run_simulation(&mut self, dt: f64);

    fn pulse(&self) -> Pulse;
}

impl<A: Activity + ?Sized> Activity for Box<A> {
    fn initialise(&mut self) {
        (**self).initialise();
    }

    fn run_simulation(&mut self, dt: f64) {
        (**self).run_simulation(dt);
    }

    fn pulse(&self) -> Pulse {
        (**self).pulse()
    }
}
