use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::SeedableRng;

use howl_core::random::uniform;
use howl_core::{Activity, Pulse, TimerManager};

const LEVEL: RangeInclusive<f64> = 0.0..=1.0;
const PULSE_TIME_CHANGE_SECS: RangeInclusive<f64> = 10.0..=30.0;
const PULSE_TIME: RangeInclusive<f64> = 0.025..=0.25;

/// Every channel value jumps to a new random level at a short, occasionally redrawn interval.
pub struct ChaosActivity {
    timers: TimerManager,
    rng: StdRng,
    pulse_time: f64,
    pulse_time_counter: f64,
    levels: [f64; 4],
}

impl ChaosActivity {
    pub fn new(seed: u64) -> Self {
        Self {
            timers: TimerManager::new(),
            rng: StdRng::seed_from_u64(seed),
            pulse_time: *PULSE_TIME.start(),
            pulse_time_counter: 0.0,
            levels: [0.0; 4],
        }
    }

    fn randomise(&mut self) {
        for level in &mut self.levels {
            *level = uniform(&mut self.rng, LEVEL);
        }
    }
}

fn randomise_pulse_time(rng: &mut StdRng, pulse_time: &mut f64, timers: &mut TimerManager) {
    *pulse_time = uniform(rng, PULSE_TIME);
    let secs = uniform(rng, PULSE_TIME_CHANGE_SECS);
    if timers.add_timer("randomisePulseTime", secs, ()).is_some() {
        randomise_pulse_time(rng, pulse_time, timers);
    }
}

impl Activity for ChaosActivity {
    fn initialise(&mut self) {
        self.randomise();
        randomise_pulse_time(&mut self.rng, &mut self.pulse_time, &mut self.timers);
    }

    fn run_simulation(&mut self, dt: f64) {
        let (rng, pulse_time) = (&mut self.rng, &mut self.pulse_time);
        self.timers
            .update(dt, |timers, ()| randomise_pulse_time(rng, pulse_time, timers));

        // At most one jump per tick, however long the tick; time beyond the last whole
        // interval is all that carries over.
        self.pulse_time_counter += dt;
        if self.pulse_time_counter > self.pulse_time {
            self.randomise();
            self.pulse_time_counter %= self.pulse_time;
        }
    }

    fn pulse(&self) -> Pulse {
        let [amp_a, amp_b, freq_a, freq_b] = self.levels;
        Pulse::new(amp_a, amp_b, freq_a, freq_b)
    }
}
