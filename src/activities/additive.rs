use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use howl_core::constants::mix_seed;
use howl_core::random::{random_in_range, uniform};
use howl_core::{
    Activity, CyclicalWave, InterpolationType, Pulse, SmoothedValue, TimerManager, Transition,
    WaveManager, WavePoint,
};

use super::literal_wave;

const SPEED_CHANGE_SECS: RangeInclusive<f64> = 10.0..=30.0;
const PROPORTION_CHANGE_SECS: RangeInclusive<f64> = 10.0..=30.0;
const SHAPE_CHANGE_SECS: RangeInclusive<f64> = 10.0..=60.0;
const SPEED: RangeInclusive<f64> = 0.08..=2.0;
const SPEED_BIAS: f64 = 2.5;
const SPEED_CHANGE_RATE: RangeInclusive<f64> = 0.03..=0.2;
const PROPORTION: RangeInclusive<f64> = 0.0..=1.0;
const PROPORTION_CHANGE_RATE: f64 = 0.05;
const WAVE_POWER: RangeInclusive<f64> = 0.7..=1.0;
const SHAPE_CHANGE_PROBABILITY: f64 = 0.3;
const PROPORTION_CHANGE_PROBABILITY: f64 = 0.3;
const SPEED_CHANGE_PROBABILITY: f64 = 0.3;

#[derive(Clone, Copy, Debug)]
enum AdditiveEvent {
    ProportionChange,
    ShapeChange,
    SpeedChange,
}

/// Mixes two independently running wave sets. Each output is a drifting blend of the two.
pub struct AdditiveActivity {
    timers: TimerManager<AdditiveEvent>,
    state: AdditiveState,
}

struct AdditiveState {
    rng: StdRng,
    waves: [WaveManager; 2],
    /// Weight of the first wave set in amp A, amp B, freq A and freq B.
    proportions: [SmoothedValue; 4],
}

impl AdditiveActivity {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let proportions =
            std::array::from_fn(|_| SmoothedValue::new(uniform(&mut rng, PROPORTION)));
        Self {
            timers: TimerManager::new(),
            state: AdditiveState {
                rng,
                waves: [
                    WaveManager::new(mix_seed(seed, 0)),
                    WaveManager::new(mix_seed(seed, 1)),
                ],
                proportions,
            },
        }
    }
}

impl AdditiveState {
    fn random_wave(&mut self) -> CyclicalWave {
        let peak_time = uniform(&mut self.rng, 0.01..=0.99);
        let power = uniform(&mut self.rng, WAVE_POWER);
        literal_wave(
            "random",
            &[
                WavePoint::with_slope(0.0, 0.0, 0.0),
                WavePoint::with_slope(peak_time, power, 0.0),
            ],
            InterpolationType::Hermite,
        )
    }

    fn handle(&mut self, event: AdditiveEvent, timers: &mut TimerManager<AdditiveEvent>) {
        let (key, secs) = match event {
            AdditiveEvent::ProportionChange => {
                for index in 0..self.proportions.len() {
                    if self.rng.gen::<f64>() < PROPORTION_CHANGE_PROBABILITY {
                        let target = uniform(&mut self.rng, PROPORTION);
                        let _ = self.proportions[index].set_target(
                            target,
                            Transition::Rate(PROPORTION_CHANGE_RATE),
                            None,
                        );
                    }
                }
                ("proportionChange", uniform(&mut self.rng, PROPORTION_CHANGE_SECS))
            }
            AdditiveEvent::ShapeChange => {
                for index in 0..self.waves.len() {
                    for name in ["amp", "freq"] {
                        if self.rng.gen::<f64>() < SHAPE_CHANGE_PROBABILITY {
                            let wave = self.random_wave();
                            self.waves[index].add_wave_as(name, wave);
                        }
                    }
                }
                ("shapeChange", uniform(&mut self.rng, SHAPE_CHANGE_SECS))
            }
            AdditiveEvent::SpeedChange => {
                for waves in &mut self.waves {
                    if self.rng.gen::<f64>() < SPEED_CHANGE_PROBABILITY {
                        let speed = random_in_range(&mut self.rng, SPEED, SPEED_BIAS);
                        let rate = uniform(&mut self.rng, SPEED_CHANGE_RATE);
                        let _ = waves.set_target_speed(speed, rate, None);
                    }
                }
                ("speedChange", uniform(&mut self.rng, SPEED_CHANGE_SECS))
            }
        };
        if let Some(event) = timers.add_timer(key, secs, event) {
            self.handle(event, timers);
        }
    }

    fn blend(&self, wave: &str, proportion: usize) -> f64 {
        let weight = self.proportions[proportion].current();
        self.waves[0].position(wave) * weight + self.waves[1].position(wave) * (1.0 - weight)
    }
}

impl Activity for AdditiveActivity {
    fn initialise(&mut self) {
        let state = &mut self.state;
        for index in 0..state.waves.len() {
            let amp = state.random_wave();
            let freq = state.random_wave();
            let speed = random_in_range(&mut state.rng, SPEED, SPEED_BIAS);
            let waves = &mut state.waves[index];
            waves.add_wave_as("amp", amp);
            waves.add_wave_as("freq", freq);
            waves.set_speed(speed);
        }
        for event in [
            AdditiveEvent::ShapeChange,
            AdditiveEvent::SpeedChange,
            AdditiveEvent::ProportionChange,
        ] {
            state.handle(event, &mut self.timers);
        }
    }

    fn run_simulation(&mut self, dt: f64) {
        let Self { timers, state } = self;
        timers.update(dt, |timers, event| state.handle(event, timers));
        for waves in &mut state.waves {
            waves.update(dt, |_, ()| {});
        }
        for proportion in &mut state.proportions {
            let _ = proportion.update(dt);
        }
    }

    fn pulse(&self) -> Pulse {
        Pulse::new(
            self.state.blend("amp", 0),
            self.state.blend("amp", 1),
            self.state.blend("freq", 2),
            self.state.blend("freq", 3),
        )
    }
}
