use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use howl_core::constants::mix_seed;
use howl_core::effects::positional_effect;
use howl_core::random::uniform;
use howl_core::{Activity, InterpolationType, Pulse, TimerManager, WaveManager};

use super::{ramp_wave, up_down_wave};

const WOMP_START_FREQ: f64 = 0.0;
const WOMP_END_FREQ: f64 = 0.7;
const WOMP_START_SPEED: f64 = 0.3;
const WOMP_END_SPEED: f64 = 2.5;
const WOMP_SPEED_CHANGE_RATE: RangeInclusive<f64> = 0.1..=0.15;
const BUZZ_FREQ_A: RangeInclusive<f64> = 0.0..=0.3;
const BUZZ_FREQ_B: RangeInclusive<f64> = 0.7..=1.0;
const BUZZ_SPEED: RangeInclusive<f64> = 0.4..=0.8;
const BUZZ_SECS: RangeInclusive<f64> = 6.0..=12.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MilkerStage {
    Womp,
    Buzz,
}

#[derive(Clone, Copy, Debug)]
enum MilkerEvent {
    /// Womps reached full speed; switch over once the current one finishes.
    WompRamped,
    BuzzStart,
    BuzzEnd,
}

/// Alternates accelerating "womp" sweeps with a steady buzz whose frequencies glide between
/// two random endpoints.
pub struct MilkerActivity {
    waves: WaveManager<MilkerEvent>,
    timers: TimerManager<MilkerEvent>,
    state: MilkerState,
}

struct MilkerState {
    rng: StdRng,
    stage: MilkerStage,
    buzz_freq_a: (f64, f64),
    buzz_freq_b: (f64, f64),
    reverse_womp: bool,
}

impl MilkerActivity {
    pub fn new(seed: u64) -> Self {
        Self {
            waves: WaveManager::new(mix_seed(seed, 0)),
            timers: TimerManager::new(),
            state: MilkerState {
                rng: StdRng::seed_from_u64(seed),
                stage: MilkerStage::Womp,
                buzz_freq_a: (0.75, 0.75),
                buzz_freq_b: (0.75, 0.75),
                reverse_womp: false,
            },
        }
    }
}

impl MilkerState {
    fn handle(
        &mut self,
        event: MilkerEvent,
        waves: &mut WaveManager<MilkerEvent>,
        timers: &mut TimerManager<MilkerEvent>,
    ) {
        match event {
            MilkerEvent::WompRamped => waves.stop_at_end_of_cycle(MilkerEvent::BuzzStart),
            MilkerEvent::BuzzStart => self.buzz_start(waves, timers),
            MilkerEvent::BuzzEnd => self.womp_start(waves, timers),
        }
    }

    fn womp_start(
        &mut self,
        waves: &mut WaveManager<MilkerEvent>,
        timers: &mut TimerManager<MilkerEvent>,
    ) {
        self.stage = MilkerStage::Womp;
        waves.restart();
        let rate = uniform(&mut self.rng, WOMP_SPEED_CHANGE_RATE);
        self.reverse_womp = self.rng.gen_bool(0.5);
        waves.set_speed(WOMP_START_SPEED);
        let ramped = waves.set_target_speed(WOMP_END_SPEED, rate, Some(MilkerEvent::WompRamped));
        if let Some(event) = ramped {
            self.handle(event, waves, timers);
        }
    }

    fn buzz_start(
        &mut self,
        waves: &mut WaveManager<MilkerEvent>,
        timers: &mut TimerManager<MilkerEvent>,
    ) {
        self.stage = MilkerStage::Buzz;
        self.buzz_freq_a = (
            uniform(&mut self.rng, BUZZ_FREQ_A),
            uniform(&mut self.rng, BUZZ_FREQ_A),
        );
        self.buzz_freq_b = (
            uniform(&mut self.rng, BUZZ_FREQ_B),
            uniform(&mut self.rng, BUZZ_FREQ_B),
        );
        let speed = uniform(&mut self.rng, BUZZ_SPEED);
        waves.restart();
        waves.set_speed(speed);
        let secs = uniform(&mut self.rng, BUZZ_SECS);
        if let Some(event) = timers.add_timer("buzzEnd", secs, MilkerEvent::BuzzEnd) {
            self.handle(event, waves, timers);
        }
    }
}

impl Activity for MilkerActivity {
    fn initialise(&mut self) {
        let Self {
            waves,
            timers,
            state,
        } = self;
        waves.add_wave(ramp_wave("womp", 1.0, 0.0, InterpolationType::Hermite));
        waves.add_wave(up_down_wave("buzz", 0.0, 1.0, 0.5));
        waves.set_speed_variance(0.0);
        waves.set_amplitude_variance(0.0);
        state.womp_start(waves, timers);
    }

    fn run_simulation(&mut self, dt: f64) {
        let Self {
            waves,
            timers,
            state,
        } = self;
        timers.update(dt, |timers, event| state.handle(event, waves, timers));
        waves.update(dt, |waves, event| state.handle(event, waves, timers));
    }

    fn pulse(&self) -> Pulse {
        match self.state.stage {
            MilkerStage::Womp => {
                let position = self.waves.position("womp");
                let position = if self.state.reverse_womp {
                    1.0 - position
                } else {
                    position
                };
                let (amp_a, amp_b) = positional_effect(0.9, position, 1.0);
                let freq = position * (WOMP_END_FREQ - WOMP_START_FREQ) + WOMP_START_FREQ;
                Pulse::new(amp_a, amp_b, freq, freq)
            }
            MilkerStage::Buzz => {
                let position = self.waves.position("buzz");
                let progress = self.timers.proportion_elapsed("buzzEnd").unwrap_or(1.0);
                let glide = |(start, end): (f64, f64)| progress * (end - start) + start;
                let amp = 0.8 + 0.1 * position;
                Pulse::new(
                    amp,
                    amp,
                    glide(self.state.buzz_freq_a),
                    glide(self.state.buzz_freq_b),
                )
            }
        }
    }
}
