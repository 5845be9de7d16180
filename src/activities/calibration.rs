//! Fixed, predictable patterns for checking electrode placement and levels.

use howl_core::constants::mix_seed;
use howl_core::effects::positional_effect;
use howl_core::{Activity, Pulse, TimerManager, WaveManager};

use super::up_down_wave;

const WAVE_SPEED: f64 = 0.25;
const WAVE_POWER: f64 = 0.9;
const WAVE_FREQUENCY: f64 = 0.5;
const PHASE_CHANGE_SECS: f64 = 16.0;

fn calibration_waves(seed: u64) -> WaveManager {
    let mut waves = WaveManager::new(mix_seed(seed, 0));
    waves.add_wave(up_down_wave("calibration", 0.0, 1.0, 0.5));
    waves.set_speed(WAVE_SPEED);
    waves.set_speed_variance(0.0);
    waves.set_amplitude_variance(0.0);
    waves
}

/// Pans a constant-frequency signal slowly from A to B and back.
pub struct Calibration1Activity {
    waves: WaveManager,
}

impl Calibration1Activity {
    pub fn new(seed: u64) -> Self {
        Self {
            waves: calibration_waves(seed),
        }
    }
}

impl Activity for Calibration1Activity {
    fn initialise(&mut self) {}

    fn run_simulation(&mut self, dt: f64) {
        self.waves.update(dt, |_, ()| {});
    }

    fn pulse(&self) -> Pulse {
        let position = self.waves.position("calibration");
        let (amp_a, amp_b) = positional_effect(WAVE_POWER, position, 1.0);
        Pulse::new(amp_a, amp_b, WAVE_FREQUENCY, WAVE_FREQUENCY)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CalibrationPhase {
    ChannelA,
    ChannelB,
    Both,
}

impl CalibrationPhase {
    fn next(self) -> Self {
        match self {
            Self::ChannelA => Self::ChannelB,
            Self::ChannelB => Self::Both,
            Self::Both => Self::ChannelA,
        }
    }
}

/// Sweeps the frequency range at fixed power on channel A, then B, then both, switching
/// every 16 seconds.
pub struct Calibration2Activity {
    waves: WaveManager,
    timers: TimerManager,
    phase: CalibrationPhase,
}

impl Calibration2Activity {
    pub fn new(seed: u64) -> Self {
        Self {
            waves: calibration_waves(seed),
            timers: TimerManager::new(),
            phase: CalibrationPhase::ChannelA,
        }
    }
}

impl Activity for Calibration2Activity {
    fn initialise(&mut self) {
        let _ = self.timers.add_timer("nextPhase", PHASE_CHANGE_SECS, ());
    }

    fn run_simulation(&mut self, dt: f64) {
        let phase = &mut self.phase;
        self.timers.update(dt, |timers, ()| {
            *phase = phase.next();
            let _ = timers.add_timer("nextPhase", PHASE_CHANGE_SECS, ());
        });
        self.waves.update(dt, |_, ()| {});
    }

    fn pulse(&self) -> Pulse {
        let frequency = self.waves.position("calibration");
        let amp_a = if self.phase == CalibrationPhase::ChannelB {
            0.0
        } else {
            WAVE_POWER
        };
        let amp_b = if self.phase == CalibrationPhase::ChannelA {
            0.0
        } else {
            WAVE_POWER
        };
        Pulse::new(amp_a, amp_b, frequency, frequency)
    }
}
