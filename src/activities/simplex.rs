use std::f64::consts::PI;
use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::SeedableRng;

use howl_core::constants::mix_seed;
use howl_core::random::uniform;
use howl_core::{Activity, NoiseGenerator, Pulse, SmoothedValue, TimerManager, Transition};

/// Tuning for [`SimplexActivity`].
///
/// Fields:
/// - `amp_time_speed`: how fast the amplitude noise drifts along its time axis
/// - `amp_rotation_speed`: how fast the amplitude sampling point circles (radians per second)
/// - `change_rate`: transition rate when either speed is redrawn
/// - `amp_time_change_secs` / `amp_rotation_change_secs`: time between redraws
/// - `amp_radius` / `freq_radius`: noise radius, i.e. how far outputs stray from 0.5
/// - `freq_time_speed` / `freq_rotation_speed`: fixed drift of the frequency noise
#[derive(Clone, Debug, PartialEq)]
pub struct SimplexParams {
    pub amp_time_speed: RangeInclusive<f64>,
    pub amp_rotation_speed: RangeInclusive<f64>,
    pub change_rate: RangeInclusive<f64>,
    pub amp_time_change_secs: RangeInclusive<f64>,
    pub amp_rotation_change_secs: RangeInclusive<f64>,
    pub amp_radius: f64,
    pub freq_radius: f64,
    pub freq_time_speed: f64,
    pub freq_rotation_speed: f64,
}

impl SimplexParams {
    pub const STANDARD: Self = Self {
        amp_time_speed: 0.2..=4.0,
        amp_rotation_speed: 0.0..=PI * 0.2,
        change_rate: 0.1..=0.5,
        amp_time_change_secs: 10.0..=50.0,
        amp_rotation_change_secs: 10.0..=50.0,
        amp_radius: 0.3,
        freq_radius: 0.2,
        freq_time_speed: 0.2,
        freq_rotation_speed: 0.1,
    };

    /// Slower drift, fast rotation and a wider swing.
    pub const PRO: Self = Self {
        amp_time_speed: 0.2..=0.8,
        amp_rotation_speed: PI * 0.5..=PI * 4.0,
        change_rate: 0.2..=0.5,
        amp_radius: 0.4,
        freq_radius: 0.3,
        ..Self::STANDARD
    };

    /// Very fast rotation with the widest swing.
    pub const TURBO: Self = Self {
        amp_time_speed: 0.1..=0.5,
        amp_rotation_speed: PI * 3.0..=PI * 6.0,
        change_rate: 0.2..=0.5,
        amp_radius: 0.6,
        freq_radius: 0.3,
        ..Self::STANDARD
    };
}

impl Default for SimplexParams {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[derive(Clone, Copy, Debug)]
enum SimplexEvent {
    AmpTimeSpeedChange,
    AmpRotationSpeedChange,
}

/// Both channels follow slowly wandering coherent noise, amplitudes and frequencies each on
/// their own patch of the noise field.
pub struct SimplexActivity {
    timers: TimerManager<SimplexEvent>,
    state: SimplexState,
}

struct SimplexState {
    params: SimplexParams,
    rng: StdRng,
    noise: NoiseGenerator,
    elapsed: f64,
    phase_time: f64,
    phase_rotation: f64,
    amp_time_speed: SmoothedValue,
    amp_rotation_speed: SmoothedValue,
}

impl SimplexActivity {
    pub fn new(seed: u64) -> Self {
        Self::with_params(seed, SimplexParams::STANDARD)
    }

    pub fn pro(seed: u64) -> Self {
        Self::with_params(seed, SimplexParams::PRO)
    }

    pub fn turbo(seed: u64) -> Self {
        Self::with_params(seed, SimplexParams::TURBO)
    }

    pub fn with_params(seed: u64, params: SimplexParams) -> Self {
        Self {
            timers: TimerManager::new(),
            state: SimplexState {
                params,
                rng: StdRng::seed_from_u64(seed),
                noise: NoiseGenerator::new(mix_seed(seed, 0)),
                elapsed: 0.0,
                phase_time: 0.0,
                phase_rotation: 0.0,
                amp_time_speed: SmoothedValue::default(),
                amp_rotation_speed: SmoothedValue::default(),
            },
        }
    }

    pub fn params(&self) -> &SimplexParams {
        &self.state.params
    }
}

impl SimplexState {
    fn handle(&mut self, event: SimplexEvent, timers: &mut TimerManager<SimplexEvent>) {
        let rate = uniform(&mut self.rng, self.params.change_rate.clone());
        let (key, secs) = match event {
            SimplexEvent::AmpTimeSpeedChange => {
                let target = uniform(&mut self.rng, self.params.amp_time_speed.clone());
                let _ = self
                    .amp_time_speed
                    .set_target(target, Transition::Rate(rate), None);
                let secs = uniform(&mut self.rng, self.params.amp_time_change_secs.clone());
                ("ampTimeSpeedChange", secs)
            }
            SimplexEvent::AmpRotationSpeedChange => {
                let target = uniform(&mut self.rng, self.params.amp_rotation_speed.clone());
                let _ = self
                    .amp_rotation_speed
                    .set_target(target, Transition::Rate(rate), None);
                let secs = uniform(&mut self.rng, self.params.amp_rotation_change_secs.clone());
                ("ampRotationSpeedChange", secs)
            }
        };
        if let Some(event) = timers.add_timer(key, secs, event) {
            self.handle(event, timers);
        }
    }
}

impl Activity for SimplexActivity {
    fn initialise(&mut self) {
        let state = &mut self.state;
        let time_speed = uniform(&mut state.rng, state.params.amp_time_speed.clone());
        let rotation_speed = uniform(&mut state.rng, state.params.amp_rotation_speed.clone());
        state.amp_time_speed.set_immediately(time_speed);
        state.amp_rotation_speed.set_immediately(rotation_speed);
        state.handle(SimplexEvent::AmpTimeSpeedChange, &mut self.timers);
        state.handle(SimplexEvent::AmpRotationSpeedChange, &mut self.timers);
    }

    fn run_simulation(&mut self, dt: f64) {
        let Self { timers, state } = self;
        timers.update(dt, |timers, event| state.handle(event, timers));
        let _ = state.amp_time_speed.update(dt);
        let _ = state.amp_rotation_speed.update(dt);
        state.elapsed += dt;
        state.phase_time += state.amp_time_speed.current() * dt;
        state.phase_rotation += state.amp_rotation_speed.current() * dt;
    }

    fn pulse(&self) -> Pulse {
        let state = &self.state;
        let params = &state.params;
        let (amp_a, amp_b) = state.noise.get_noise(
            state.phase_time,
            state.phase_rotation,
            params.amp_radius,
            2,
            true,
        );
        let (freq_a, freq_b) = state.noise.get_noise(
            state.elapsed * params.freq_time_speed,
            state.elapsed * params.freq_rotation_speed,
            params.freq_radius,
            1,
            true,
        );
        Pulse::new(amp_a, amp_b, freq_a, freq_b)
    }
}
