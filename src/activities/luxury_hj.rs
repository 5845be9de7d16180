use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use howl_core::constants::mix_seed;
use howl_core::effects::positional_effect;
use howl_core::random::uniform;
use howl_core::{Activity, Pulse, TimerManager, WaveManager};

use super::up_down_wave;

const SPEED_CHANGE_SECS: RangeInclusive<f64> = 1.0..=20.0;
const SPEED: RangeInclusive<f64> = 0.3..=3.0;
const SPEED_CHANGE_RATE: RangeInclusive<f64> = 0.05..=0.3;
const BONUS_SECS: RangeInclusive<f64> = 10.0..=25.0;
const BONUS_SPEED: RangeInclusive<f64> = 1.5..=5.0;
const BONUS_PER_MINUTE: f64 = 0.7;
const BONUS_WEIGHT: f64 = 0.7;
const START_FREQ: f64 = 0.15;
const END_FREQ: f64 = 0.65;
const BONUS_START_FREQ: f64 = 0.8;
const BONUS_END_FREQ: f64 = 1.0;

#[derive(Clone, Copy, Debug)]
enum HjEvent {
    SpeedChange,
    /// A bonus period ran out; its timer's absence is what ends it.
    BonusOver,
}

/// A steady stroke with drifting speed, now and then overlaid on one channel by a fast
/// high-frequency "bonus" for a while.
pub struct LuxuryHjActivity {
    hj: WaveManager,
    bonus: WaveManager,
    timers: TimerManager<HjEvent>,
    rng: StdRng,
}

impl LuxuryHjActivity {
    pub fn new(seed: u64) -> Self {
        Self {
            hj: WaveManager::new(mix_seed(seed, 0)),
            bonus: WaveManager::new(mix_seed(seed, 1)),
            timers: TimerManager::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Starts a bonus on channel `key` unless the other channel already has one.
    fn maybe_start_bonus(&mut self, key: &str, other: &str, probability: f64) {
        if self.rng.gen::<f64>() < probability && !self.timers.has_timer(other) {
            self.bonus.set_speed(uniform(&mut self.rng, BONUS_SPEED));
            let secs = uniform(&mut self.rng, BONUS_SECS);
            let _ = self.timers.add_timer(key, secs, HjEvent::BonusOver);
        }
    }
}

fn speed_change(hj: &mut WaveManager, timers: &mut TimerManager<HjEvent>, rng: &mut StdRng) {
    let speed = uniform(rng, SPEED);
    let rate = uniform(rng, SPEED_CHANGE_RATE);
    let secs = uniform(rng, SPEED_CHANGE_SECS);
    let _ = hj.set_target_speed(speed, rate, None);
    if timers.add_timer("speedChange", secs, HjEvent::SpeedChange).is_some() {
        speed_change(hj, timers, rng);
    }
}

impl Activity for LuxuryHjActivity {
    fn initialise(&mut self) {
        self.hj.add_wave(up_down_wave("hj", 0.0, 1.0, 0.5));
        self.bonus.add_wave(up_down_wave("bonus", 0.6, 1.0, 0.5));

        self.hj.set_speed_variance(0.2);
        self.hj.set_amplitude_variance(0.2);
        self.hj.set_amplitude_variance_ease_in(1.0);
        self.bonus.set_speed_variance(0.5);
        self.bonus.set_amplitude_variance(0.15);
        self.bonus.set_speed(1.0);
        self.hj.set_speed(0.5);
        speed_change(&mut self.hj, &mut self.timers, &mut self.rng);
    }

    fn run_simulation(&mut self, dt: f64) {
        let Self {
            hj, timers, rng, ..
        } = self;
        timers.update(dt, |timers, event| match event {
            HjEvent::SpeedChange => speed_change(hj, timers, rng),
            HjEvent::BonusOver => {}
        });
        self.hj.update(dt, |_, ()| {});
        self.bonus.update(dt, |_, ()| {});

        let probability = BONUS_PER_MINUTE * dt / 60.0;
        self.maybe_start_bonus("bonusA", "bonusB", probability);
        self.maybe_start_bonus("bonusB", "bonusA", probability);
    }

    fn pulse(&self) -> Pulse {
        let position = self.hj.position_without_variance("hj");
        let (mut amp_a, mut amp_b) =
            positional_effect(self.hj.current_amplitude(), position, 1.0);
        let freq = position * (END_FREQ - START_FREQ) + START_FREQ;
        let (mut freq_a, mut freq_b) = (freq * 0.98, freq);

        let bonus_amp = self.bonus.position("bonus");
        let bonus_freq = bonus_amp * (BONUS_END_FREQ - BONUS_START_FREQ) + BONUS_START_FREQ;
        let blend = |base: f64, bonus: f64| bonus * BONUS_WEIGHT + base * (1.0 - BONUS_WEIGHT);

        if self.timers.has_timer("bonusA") {
            amp_a = blend(amp_a, bonus_amp);
            freq_a = blend(freq_a, bonus_freq);
        }
        if self.timers.has_timer("bonusB") {
            amp_b = blend(amp_b, bonus_amp);
            freq_b = blend(freq_b, bonus_freq);
        }
        Pulse::new(amp_a, amp_b, freq_a, freq_b)
    }
}
