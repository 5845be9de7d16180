use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::SeedableRng;

use howl_core::constants::mix_seed;
use howl_core::effects::scale_velocity;
use howl_core::random::uniform;
use howl_core::{
    Activity, CyclicalWave, InterpolationType, Pulse, SmoothedValue, TimerManager, Transition,
    WaveManager, WavePoint,
};

use super::literal_wave;

const SPEED_CHANGE_SECS: RangeInclusive<f64> = 1.0..=20.0;
const SPEED: RangeInclusive<f64> = 0.3..=3.0;
const SPEED_CHANGE_RATE: RangeInclusive<f64> = 0.05..=0.3;
const FEEL_EXPONENT: RangeInclusive<f64> = 1.0..=2.0;
const FEEL_EXPONENT_CHANGE_RATE: RangeInclusive<f64> = 0.05..=0.1;
const FEEL_CHANGE_SECS: RangeInclusive<f64> = 2.0..=10.0;

#[derive(Clone, Copy, Debug)]
enum PenetrationEvent {
    SpeedChange,
    FeelChange,
}

/// In-and-out strokes with a slow dwell at full depth.
///
/// Stroke speed and the "feel" exponent that bends both frequencies drift independently on
/// their own random schedules.
pub struct PenetrationActivity {
    waves: WaveManager,
    timers: TimerManager<PenetrationEvent>,
    state: PenetrationState,
}

struct PenetrationState {
    rng: StdRng,
    feel_exponent: SmoothedValue,
}

fn penetration_wave() -> CyclicalWave {
    literal_wave(
        "penetration",
        &[
            WavePoint::with_slope(0.0, 0.0, 0.0),
            WavePoint::with_slope(0.4, 0.95, 0.2),
            WavePoint::with_slope(0.5, 0.97, 0.0),
            WavePoint::with_slope(0.6, 0.95, -0.2),
        ],
        InterpolationType::Hermite,
    )
}

impl PenetrationActivity {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let feel_exponent = SmoothedValue::new(uniform(&mut rng, FEEL_EXPONENT));
        Self {
            waves: WaveManager::new(mix_seed(seed, 0)),
            timers: TimerManager::new(),
            state: PenetrationState { rng, feel_exponent },
        }
    }
}

impl PenetrationState {
    fn handle(
        &mut self,
        event: PenetrationEvent,
        waves: &mut WaveManager,
        timers: &mut TimerManager<PenetrationEvent>,
    ) {
        let (key, secs) = match event {
            PenetrationEvent::SpeedChange => {
                let speed = uniform(&mut self.rng, SPEED);
                let rate = uniform(&mut self.rng, SPEED_CHANGE_RATE);
                let _ = waves.set_target_speed(speed, rate, None);
                ("speedChange", uniform(&mut self.rng, SPEED_CHANGE_SECS))
            }
            PenetrationEvent::FeelChange => {
                let target = uniform(&mut self.rng, FEEL_EXPONENT);
                let rate = uniform(&mut self.rng, FEEL_EXPONENT_CHANGE_RATE);
                let _ = self
                    .feel_exponent
                    .set_target(target, Transition::Rate(rate), None);
                ("feelChange", uniform(&mut self.rng, FEEL_CHANGE_SECS))
            }
        };
        if let Some(event) = timers.add_timer(key, secs, event) {
            self.handle(event, waves, timers);
        }
    }
}

impl Activity for PenetrationActivity {
    fn initialise(&mut self) {
        let Self {
            waves,
            timers,
            state,
        } = self;
        waves.add_wave(penetration_wave());
        waves.set_speed_variance(0.2);
        waves.set_amplitude_variance(0.1);
        state.handle(PenetrationEvent::SpeedChange, waves, timers);
        state.handle(PenetrationEvent::FeelChange, waves, timers);
        // Always open with a slow warm-up; the first drawn speed only applies from the next
        // change onwards.
        waves.set_speed(0.15);
        let _ = waves.set_target_speed(0.5, 0.1, None);
    }

    fn run_simulation(&mut self, dt: f64) {
        let Self {
            waves,
            timers,
            state,
        } = self;
        timers.update(dt, |timers, event| state.handle(event, waves, timers));
        let _ = state.feel_exponent.update(dt);
        waves.update(dt, |_, ()| {});
    }

    fn pulse(&self) -> Pulse {
        let (position, velocity) = self.waves.position_and_velocity("penetration");
        let scaled_velocity = scale_velocity(velocity, 0.1);
        let feel = self.state.feel_exponent.current();

        let (slowest, fastest) = (*SPEED.start(), *SPEED.end());
        let speed_fraction = (self.waves.current_speed() - slowest) / (fastest - slowest);
        let amp_factor = 0.8 + speed_fraction * 0.2;

        let freq_a = (position * 0.7).max(0.0).powf(feel).clamp(0.0, 1.0);
        let freq_b = (scaled_velocity * 0.5 + position * 0.4)
            .max(0.0)
            .powf(feel)
            .clamp(0.0, 1.0);

        Pulse::new(
            position * amp_factor,
            (scaled_velocity * 0.6 + position * 0.4) * amp_factor,
            freq_a,
            freq_b,
        )
    }
}
