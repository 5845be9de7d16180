//! Phase-driven playback of one or more cyclic waves.
//!
//! A [`WaveManager`] owns a phase accumulator shared by every wave it holds, eased speed and
//! amplitude controls, and per-cycle random variance. Completion hooks (speed or amplitude
//! reaching a target, the end of the current cycle, an iteration count being reached) are
//! event values handed to the handler passed to [`WaveManager::update`].

use fnv::FnvHashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;

use crate::constants::{
    BOUNDARY_SEARCH_STEPS, DEFAULT_AMPLITUDE, DEFAULT_AMPLITUDE_VARIANCE, DEFAULT_SPEED,
    DEFAULT_SPEED_VARIANCE, MIN_SPEED_FACTOR,
};
use crate::numeric::lerp;
use crate::shape::{wrap_phase, CyclicalWave};
use crate::smoothed::{SmoothedValue, Transition};

pub struct WaveManager<E = ()> {
    waves: FnvHashMap<String, CyclicalWave>,
    phase: f64,
    iteration: u64,
    speed: SmoothedValue<E>,
    amplitude: SmoothedValue<E>,
    speed_variance: f64,
    amplitude_variance: f64,
    amplitude_variance_ease_in: f64,
    speed_factor: f64,
    amplitude_factor: f64,
    at_end_of_cycle: SmallVec<[E; 2]>,
    after_iterations: SmallVec<[(u64, E); 2]>,
    rng: StdRng,
}

impl<E> WaveManager<E> {
    /// Creates an empty manager whose variance draws come from a generator seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            waves: FnvHashMap::default(),
            phase: 0.0,
            iteration: 0,
            speed: SmoothedValue::new(DEFAULT_SPEED),
            amplitude: SmoothedValue::new(DEFAULT_AMPLITUDE),
            speed_variance: DEFAULT_SPEED_VARIANCE,
            amplitude_variance: DEFAULT_AMPLITUDE_VARIANCE,
            amplitude_variance_ease_in: 0.0,
            speed_factor: 1.0,
            amplitude_factor: 1.0,
            at_end_of_cycle: SmallVec::new(),
            after_iterations: SmallVec::new(),
            rng,
        }
    }

    /// Adds `wave` under its shape's name, replacing any wave already there.
    pub fn add_wave(&mut self, wave: CyclicalWave) {
        let name = wave.name().to_owned();
        self.waves.insert(name, wave);
    }

    /// Adds `wave` under `name`, replacing any wave already there.
    pub fn add_wave_as(&mut self, name: impl Into<String>, wave: CyclicalWave) {
        self.waves.insert(name.into(), wave);
    }

    pub fn wave(&self, name: &str) -> Option<&CyclicalWave> {
        self.waves.get(name)
    }

    pub fn has_wave(&self, name: &str) -> bool {
        self.waves.contains_key(name)
    }

    // --- speed ---

    /// Sets the base speed (cycles per second) with no transition.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed.set_immediately(speed);
    }

    /// Eases the base speed towards `target` at `rate` units per second.
    ///
    /// Returns `on_reached` straight away when there is nothing to ease.
    pub fn set_target_speed(&mut self, target: f64, rate: f64, on_reached: Option<E>) -> Option<E> {
        self.speed
            .set_target(target, Transition::Rate(rate), on_reached)
    }

    /// Base speed without the per-cycle variance.
    pub fn current_speed(&self) -> f64 {
        self.speed.current()
    }

    pub fn target_speed(&self) -> f64 {
        self.speed.target()
    }

    /// Speed the phase actually advances at: base speed times this cycle's variance.
    pub fn effective_speed(&self) -> f64 {
        self.speed.current() * self.speed_factor
    }

    // --- amplitude ---

    pub fn set_amplitude(&mut self, amplitude: f64) {
        self.amplitude.set_immediately(amplitude);
    }

    pub fn set_target_amplitude(
        &mut self,
        target: f64,
        rate: f64,
        on_reached: Option<E>,
    ) -> Option<E> {
        self.amplitude
            .set_target(target, Transition::Rate(rate), on_reached)
    }

    pub fn current_amplitude(&self) -> f64 {
        self.amplitude.current()
    }

    // --- variance ---

    /// Fraction by which each cycle's speed may deviate either way. Clamped to [0, 1].
    pub fn set_speed_variance(&mut self, variance: f64) {
        self.speed_variance = variance.clamp(0.0, 1.0);
    }

    /// Fraction of the amplitude each cycle may lose. Clamped to [0, 1].
    pub fn set_amplitude_variance(&mut self, variance: f64) {
        self.amplitude_variance = variance.clamp(0.0, 1.0);
    }

    /// Number of cycles after a restart over which amplitude variance fades in.
    pub fn set_amplitude_variance_ease_in(&mut self, cycles: f64) {
        self.amplitude_variance_ease_in = cycles.max(0.0);
    }

    pub fn speed_variance_factor(&self) -> f64 {
        self.speed_factor
    }

    pub fn amplitude_variance_factor(&self) -> f64 {
        self.amplitude_factor
    }

    // --- cycle control ---

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Cycle boundaries crossed since construction or the last [`restart`](Self::restart).
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Returns to the start of a cycle and zeroes the iteration counter.
    ///
    /// Speed and amplitude targets and pending hooks are kept. The first cycle after a restart
    /// runs without variance.
    pub fn restart(&mut self) {
        self.phase = 0.0;
        self.iteration = 0;
        self.speed_factor = 1.0;
        self.amplitude_factor = 1.0;
    }

    /// Fires `event` at the next cycle boundary.
    pub fn stop_at_end_of_cycle(&mut self, event: E) {
        self.at_end_of_cycle.push(event);
    }

    /// Fires `event` at the first boundary where the iteration counter reaches `iterations`.
    pub fn stop_after_iterations(&mut self, iterations: u64, event: E) {
        self.after_iterations.push((iterations, event));
    }

    /// Drops every pending end-of-cycle and iteration hook.
    pub fn clear_pending(&mut self) {
        self.at_end_of_cycle.clear();
        self.after_iterations.clear();
    }

    /// Advances speed, amplitude and phase by `dt` seconds.
    ///
    /// The phase follows the speed as it eases, so one long step lands where many short ones
    /// would. Each cycle boundary crossed is handled in turn: the iteration counter increments,
    /// new variance factors are drawn, then due hooks are passed to `on_event`. A speed
    /// transition that completes on the way to a boundary is reported after that boundary's
    /// hooks. The handler may reconfigure or restart the manager; the rest of `dt` is then
    /// played at the new settings.
    pub fn update<F>(&mut self, dt: f64, mut on_event: F)
    where
        F: FnMut(&mut Self, E),
    {
        assert!(dt >= 0.0, "time delta may not be negative (got {dt})");
        if let Some(event) = self.amplitude.update(dt) {
            on_event(self, event);
        }

        let mut remaining = dt;
        loop {
            let distance = self.speed_factor * self.speed.integral(remaining);
            if distance.is_nan() || distance <= 0.0 || self.phase + distance < 1.0 {
                if distance > 0.0 {
                    self.phase += distance;
                }
                if let Some(event) = self.speed.update(remaining) {
                    on_event(self, event);
                }
                break;
            }

            let step = self.time_to_boundary(remaining);
            let reached = self.speed.update(step);
            remaining -= step;
            self.phase = 0.0;
            self.complete_cycle(&mut on_event);
            if let Some(event) = reached {
                on_event(self, event);
            }
            if remaining <= 0.0 {
                break;
            }
        }
        self.phase = wrap_phase(self.phase);
    }

    /// Seconds until the phase reaches 1.0, at most `limit`.
    fn time_to_boundary(&self, limit: f64) -> f64 {
        let needed = 1.0 - self.phase;
        if !self.speed.is_transitioning() {
            return (needed / self.effective_speed()).min(limit);
        }
        // Travel only grows with time while speed is positive, so bisect on it.
        let (mut low, mut high) = (0.0, limit);
        for _ in 0..BOUNDARY_SEARCH_STEPS {
            let mid = 0.5 * (low + high);
            if self.speed_factor * self.speed.integral(mid) < needed {
                low = mid;
            } else {
                high = mid;
            }
        }
        high
    }

    fn complete_cycle<F>(&mut self, on_event: &mut F)
    where
        F: FnMut(&mut Self, E),
    {
        self.iteration += 1;
        self.draw_variance();
        log::trace!(
            "cycle {} done: speed x{:.3}, amplitude x{:.3}",
            self.iteration,
            self.speed_factor,
            self.amplitude_factor
        );

        // Take the due hooks out first so anything a handler registers waits for a later
        // boundary.
        let end_of_cycle = std::mem::take(&mut self.at_end_of_cycle);
        let iteration = self.iteration;
        let (reached, waiting): (SmallVec<[(u64, E); 2]>, SmallVec<[(u64, E); 2]>) =
            std::mem::take(&mut self.after_iterations)
                .into_iter()
                .partition(|(target, _)| *target <= iteration);
        self.after_iterations = waiting;

        for event in end_of_cycle {
            on_event(self, event);
        }
        for (_, event) in reached {
            on_event(self, event);
        }
    }

    fn draw_variance(&mut self) {
        let speed_draw: f64 = self.rng.gen_range(-1.0..=1.0);
        let amplitude_draw: f64 = self.rng.gen();

        self.speed_factor = (1.0 + self.speed_variance * speed_draw).max(MIN_SPEED_FACTOR);

        let strength = if self.amplitude_variance_ease_in > 0.0 {
            (self.iteration as f64 / self.amplitude_variance_ease_in).min(1.0)
        } else {
            1.0
        };
        let full = 1.0 - self.amplitude_variance * amplitude_draw;
        self.amplitude_factor = lerp(1.0, full, strength);
    }

    // --- sampling ---

    fn amplitude_scale(&self, apply_variance: bool) -> f64 {
        if apply_variance {
            self.amplitude.current() * self.amplitude_factor
        } else {
            self.amplitude.current()
        }
    }

    /// Value of wave `name` at the current phase, scaled by amplitude and this cycle's
    /// amplitude variance. Unknown names read as silence.
    pub fn position(&self, name: &str) -> f64 {
        self.position_with_variance(name, true)
    }

    /// As [`position`](Self::position) but ignoring the per-cycle amplitude variance.
    pub fn position_without_variance(&self, name: &str) -> f64 {
        self.position_with_variance(name, false)
    }

    fn position_with_variance(&self, name: &str, apply_variance: bool) -> f64 {
        match self.waves.get(name) {
            Some(wave) => wave.position(self.phase) * self.amplitude_scale(apply_variance),
            None => 0.0,
        }
    }

    /// Position as in [`position`](Self::position) and its rate of change per second.
    pub fn position_and_velocity(&self, name: &str) -> (f64, f64) {
        let Some(wave) = self.waves.get(name) else {
            return (0.0, 0.0);
        };
        let (position, velocity) = wave.position_and_velocity(self.phase);
        let scale = self.amplitude_scale(true);
        (
            position * scale,
            velocity * scale * self.effective_speed(),
        )
    }
}
