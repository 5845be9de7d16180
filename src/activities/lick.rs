use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use howl_core::constants::mix_seed;
use howl_core::effects::{positional_effect, scale_velocity};
use howl_core::random::uniform;
use howl_core::{Activity, Pulse, WaveManager};

use super::{bidirectional_wave, unidirectional_wave};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LickType {
    Unidirectional,
    Bidirectional,
}

#[derive(Clone, Copy, Debug)]
enum LickEvent {
    NewLick,
}

/// Licks of random length and direction between two random points on the A-B axis.
///
/// Each lick repeats for a few seconds before the next one is drawn. Amplitude follows the
/// speed of the motion, frequency follows where along the axis it is.
pub struct LickActivity {
    waves: WaveManager<LickEvent>,
    state: LickState,
}

struct LickState {
    rng: StdRng,
    lick_type: LickType,
    start_point: f64,
    end_point: f64,
}

impl LickActivity {
    pub fn new(seed: u64) -> Self {
        Self {
            waves: WaveManager::new(mix_seed(seed, 0)),
            state: LickState {
                rng: StdRng::seed_from_u64(seed),
                lick_type: LickType::Bidirectional,
                start_point: 0.0,
                end_point: 1.0,
            },
        }
    }
}

impl LickState {
    fn handle(&mut self, event: LickEvent, waves: &mut WaveManager<LickEvent>) {
        match event {
            LickEvent::NewLick => self.new_lick(waves),
        }
    }

    fn new_lick(&mut self, waves: &mut WaveManager<LickEvent>) {
        self.lick_type = if self.rng.gen_bool(0.5) {
            LickType::Unidirectional
        } else {
            LickType::Bidirectional
        };
        self.start_point = self.rng.gen();
        self.end_point = self.rng.gen();

        // Long licks are slower.
        let distance = (self.end_point - self.start_point).abs();
        let max_speed = -3.0 * distance + 4.5;
        let speed = uniform(&mut self.rng, 0.3..=max_speed);
        let desired_secs = uniform(&mut self.rng, 1.0..=5.0);
        let repetitions = ((desired_secs * speed) as u64).max(1);

        waves.restart();
        waves.set_speed(speed);
        waves.stop_after_iterations(repetitions, LickEvent::NewLick);
    }
}

impl Activity for LickActivity {
    fn initialise(&mut self) {
        self.waves.add_wave(bidirectional_wave());
        self.waves.add_wave(unidirectional_wave());
        self.waves.set_amplitude_variance(0.5);
        self.waves.set_speed_variance(0.5);
        self.state.new_lick(&mut self.waves);
    }

    fn run_simulation(&mut self, dt: f64) {
        let Self { waves, state } = self;
        waves.update(dt, |waves, event| state.handle(event, waves));
    }

    fn pulse(&self) -> Pulse {
        let wave = match self.state.lick_type {
            LickType::Unidirectional => "unidirectional",
            LickType::Bidirectional => "bidirectional",
        };
        let (position, velocity) = self.waves.position_and_velocity(wave);
        let span = self.state.end_point - self.state.start_point;
        let lick_position = span * position + self.state.start_point;
        let scaled_velocity = scale_velocity(velocity, 0.1);

        let (amp_a, amp_b) = positional_effect(scaled_velocity, lick_position, 1.0);
        Pulse::new(
            amp_a,
            amp_b,
            lick_position * 0.5 + 0.5,
            lick_position * 0.52 + 0.48,
        )
    }
}
