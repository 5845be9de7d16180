use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use howl_core::constants::mix_seed;
use howl_core::numeric::scale_between;
use howl_core::random::uniform;
use howl_core::{Activity, CyclicalWave, InterpolationType, Pulse, WaveManager};

use super::ramp_wave;

const SWITCH_PROBABILITY: f64 = 0.1;
const SHAPE_CHANGE_PROBABILITY: f64 = 0.2;
const MIN_SPEED: f64 = 0.15;
const MAX_SPEED: f64 = 5.0;
const SPEED_CHANGE_RATE: RangeInclusive<f64> = 0.1..=0.3;

#[derive(Clone, Copy, Debug)]
enum FastSlowEvent {
    NextIteration,
}

/// Two copies of the same waves, one speeding up while the other slows down, swapping
/// direction each time the sweep completes.
pub struct FastSlowActivity {
    driver: WaveManager<FastSlowEvent>,
    follower: WaveManager<FastSlowEvent>,
    state: FastSlowState,
}

struct FastSlowState {
    rng: StdRng,
    wave_names: Vec<String>,
    accelerating: bool,
    switch_amplitudes: bool,
    switch_frequencies: bool,
    wave_a: usize,
    wave_b: usize,
}

fn possible_waves() -> [CyclicalWave; 4] {
    [
        ramp_wave("sawtooth", 0.0, 0.9, InterpolationType::Linear),
        ramp_wave("reverseSawtooth", 0.9, 0.0, InterpolationType::Linear),
        ramp_wave("hermiteSawtooth", 0.0, 0.9, InterpolationType::Hermite),
        ramp_wave("hermiteReverseSawtooth", 0.9, 0.0, InterpolationType::Hermite),
    ]
}

impl FastSlowActivity {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let switch_amplitudes = rng.gen_bool(0.5);
        let switch_frequencies = rng.gen_bool(0.5);
        Self {
            driver: WaveManager::new(mix_seed(seed, 0)),
            follower: WaveManager::new(mix_seed(seed, 1)),
            state: FastSlowState {
                rng,
                wave_names: Vec::new(),
                accelerating: false,
                switch_amplitudes,
                switch_frequencies,
                wave_a: 0,
                wave_b: 0,
            },
        }
    }
}

impl FastSlowState {
    fn next_iteration(
        &mut self,
        driver: &mut WaveManager<FastSlowEvent>,
        follower: &mut WaveManager<FastSlowEvent>,
    ) {
        self.accelerating = !self.accelerating;
        let (start, target) = if self.accelerating {
            (MIN_SPEED, MAX_SPEED)
        } else {
            (MAX_SPEED, MIN_SPEED)
        };
        let rate = uniform(&mut self.rng, SPEED_CHANGE_RATE);
        driver.set_speed(start);
        let reached = driver.set_target_speed(target, rate, Some(FastSlowEvent::NextIteration));
        follower.set_speed(target);
        let _ = follower.set_target_speed(start, rate, None);

        let count = self.wave_names.len().max(1);
        if self.rng.gen::<f64>() < SHAPE_CHANGE_PROBABILITY {
            self.wave_a = self.rng.gen_range(0..count);
        }
        if self.rng.gen::<f64>() < SHAPE_CHANGE_PROBABILITY {
            self.wave_b = self.rng.gen_range(0..count);
        }
        if self.rng.gen::<f64>() < SWITCH_PROBABILITY {
            self.switch_amplitudes = !self.switch_amplitudes;
        }
        if self.rng.gen::<f64>() < SWITCH_PROBABILITY {
            self.switch_frequencies = !self.switch_frequencies;
        }

        if let Some(FastSlowEvent::NextIteration) = reached {
            self.next_iteration(driver, follower);
        }
    }

    fn wave_name(&self, index: usize) -> &str {
        self.wave_names.get(index).map_or("", String::as_str)
    }
}

impl Activity for FastSlowActivity {
    fn initialise(&mut self) {
        for wave in possible_waves() {
            self.state.wave_names.push(wave.name().to_owned());
            self.follower.add_wave(wave.clone());
            self.driver.add_wave(wave);
        }
        self.state.next_iteration(&mut self.driver, &mut self.follower);
    }

    fn run_simulation(&mut self, dt: f64) {
        let Self {
            driver,
            follower,
            state,
        } = self;
        driver.update(dt, |driver, FastSlowEvent::NextIteration| {
            state.next_iteration(driver, follower)
        });
        follower.update(dt, |_, _| {});
    }

    fn pulse(&self) -> Pulse {
        let phase = (self.driver.current_speed() - MIN_SPEED) / (MAX_SPEED - MIN_SPEED);
        let mut amp_a = self.follower.position(self.state.wave_name(self.state.wave_a));
        let mut amp_b = self.driver.position(self.state.wave_name(self.state.wave_b));
        let mut freq_a = scale_between(1.0 - phase, 0.0, 1.0);
        let mut freq_b = scale_between(phase, 0.0, 1.0);

        if self.state.switch_amplitudes {
            std::mem::swap(&mut amp_a, &mut amp_b);
        }
        if self.state.switch_frequencies {
            std::mem::swap(&mut freq_a, &mut freq_b);
        }
        Pulse::new(amp_a, amp_b, freq_a, freq_b)
    }
}
