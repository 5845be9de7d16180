use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use howl_core::constants::mix_seed;
use howl_core::effects::{engulf_effect, positional_effect, scale_velocity};
use howl_core::numeric::scale_between;
use howl_core::random::uniform;
use howl_core::{
    Activity, FrequencyConverter, FrequencyInterpolation, FrequencyPoint, Pulse, TimerManager,
    WaveManager,
};

use super::{bidirectional_wave, unidirectional_wave, up_down_wave};

const PRIMARY_SECS: RangeInclusive<f64> = 20.0..=60.0;
const SECONDARY_SECS: RangeInclusive<f64> = 6.0..=20.0;
const LICK_FREQUENCY: (f64, f64) = (0.8, 1.0);
const SPEED_CHANGE_SECS: RangeInclusive<f64> = 1.0..=20.0;
const SPEED: RangeInclusive<f64> = 0.2..=1.2;
const SPEED_CHANGE_RATE: RangeInclusive<f64> = 0.03..=0.2;
const FULL_LICK_SPEED: RangeInclusive<f64> = 0.3..=1.0;
const TIP_LICK_SPEED: RangeInclusive<f64> = 0.5..=3.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BjStage {
    FullLick,
    TipLick,
    Suck,
    Deepthroat,
}

const STAGES: [BjStage; 4] = [
    BjStage::FullLick,
    BjStage::TipLick,
    BjStage::Suck,
    BjStage::Deepthroat,
];

#[derive(Clone, Copy, Debug)]
enum BjEvent {
    SpeedChange,
    /// The stage has run its time; move on once the current stroke finishes.
    StageDue,
    NextStage,
}

/// A medley of four stages (full licks, tip licks, sucking, deepthroat), each held for a
/// random time before moving to a different one at the end of a stroke.
pub struct BjActivity {
    waves: WaveManager<BjEvent>,
    timers: TimerManager<BjEvent>,
    state: BjState,
}

struct BjState {
    rng: StdRng,
    stage: BjStage,
    deepthroat_frequency: FrequencyConverter,
    suck_frequency_a: FrequencyConverter,
    suck_frequency_b: FrequencyConverter,
}

fn converter(points: &[(f64, f64)]) -> FrequencyConverter {
    FrequencyConverter::new(
        points.iter().map(|&(position, frequency)| FrequencyPoint::new(position, frequency)),
        FrequencyInterpolation::Smoothstep,
    )
    .unwrap_or_else(|err| panic!("literal frequency map is invalid: {err}"))
}

fn random_stage(rng: &mut StdRng) -> BjStage {
    STAGES[rng.gen_range(0..STAGES.len())]
}

impl BjActivity {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let stage = random_stage(&mut rng);
        Self {
            waves: WaveManager::new(mix_seed(seed, 0)),
            timers: TimerManager::new(),
            state: BjState {
                rng,
                stage,
                deepthroat_frequency: converter(&[(0.0, 1.0), (0.7, 0.0), (1.0, 0.3)]),
                suck_frequency_a: converter(&[(0.0, 0.7), (1.0, 0.3)]),
                suck_frequency_b: converter(&[(0.0, 0.9), (1.0, 0.3)]),
            },
        }
    }
}

impl BjState {
    fn handle(
        &mut self,
        event: BjEvent,
        waves: &mut WaveManager<BjEvent>,
        timers: &mut TimerManager<BjEvent>,
    ) {
        match event {
            BjEvent::SpeedChange => self.speed_change(waves, timers),
            BjEvent::StageDue => waves.stop_at_end_of_cycle(BjEvent::NextStage),
            BjEvent::NextStage => self.next_stage(waves, timers),
        }
    }

    fn speed_change(
        &mut self,
        waves: &mut WaveManager<BjEvent>,
        timers: &mut TimerManager<BjEvent>,
    ) {
        let speed = uniform(&mut self.rng, SPEED);
        let rate = uniform(&mut self.rng, SPEED_CHANGE_RATE);
        if let Some(event) = waves.set_target_speed(speed, rate, None) {
            self.handle(event, waves, timers);
        }
        let secs = uniform(&mut self.rng, SPEED_CHANGE_SECS);
        if let Some(event) = timers.add_timer("speedChange", secs, BjEvent::SpeedChange) {
            self.handle(event, waves, timers);
        }
    }

    fn next_stage(
        &mut self,
        waves: &mut WaveManager<BjEvent>,
        timers: &mut TimerManager<BjEvent>,
    ) {
        let previous = self.stage;
        while self.stage == previous {
            self.stage = random_stage(&mut self.rng);
        }
        log::debug!("bj stage {:?} -> {:?}", previous, self.stage);

        let duration = match self.stage {
            BjStage::FullLick | BjStage::TipLick => uniform(&mut self.rng, SECONDARY_SECS),
            BjStage::Suck | BjStage::Deepthroat => uniform(&mut self.rng, PRIMARY_SECS),
        };

        waves.restart();
        waves.set_amplitude_variance_ease_in(0.0);
        match self.stage {
            BjStage::FullLick | BjStage::TipLick => {
                waves.set_speed_variance(0.4);
                waves.set_amplitude_variance(0.3);
                let speed_range = if self.stage == BjStage::FullLick {
                    FULL_LICK_SPEED
                } else {
                    TIP_LICK_SPEED
                };
                waves.set_speed(uniform(&mut self.rng, speed_range));
                timers.cancel_timer("speedChange");
            }
            BjStage::Suck | BjStage::Deepthroat => {
                waves.set_speed_variance(0.2);
                waves.set_amplitude_variance(0.2);
                waves.set_speed(uniform(&mut self.rng, SPEED));
                self.speed_change(waves, timers);
            }
        }

        if let Some(event) = timers.add_timer("nextStage", duration, BjEvent::StageDue) {
            self.handle(event, waves, timers);
        }
    }
}

impl Activity for BjActivity {
    fn initialise(&mut self) {
        let Self {
            waves,
            timers,
            state,
        } = self;
        waves.add_wave(up_down_wave("position", 0.0, 1.0, 0.35));
        waves.add_wave(bidirectional_wave());
        waves.add_wave(unidirectional_wave());
        state.next_stage(waves, timers);
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
        let (lick_low, lick_high) = LICK_FREQUENCY;
        match self.state.stage {
            BjStage::FullLick | BjStage::TipLick => {
                let wave = if self.state.stage == BjStage::FullLick {
                    "unidirectional"
                } else {
                    "bidirectional"
                };
                let (position, velocity) = self.waves.position_and_velocity(wave);
                let lick_position = if self.state.stage == BjStage::FullLick {
                    position
                } else {
                    scale_between(position, 0.6, 1.0)
                };
                let scaled_velocity = scale_velocity(velocity, 0.1);
                let (amp_a, amp_b) = positional_effect(scaled_velocity, lick_position, 1.0);
                let freq_b = scale_between(position, lick_low, lick_high);
                Pulse::new(amp_a, amp_b, freq_b - 0.1, freq_b)
            }
            BjStage::Suck => {
                let position = self.waves.position_without_variance("position");
                let amplitude = self.waves.current_amplitude();
                let (amp_a, amp_b) = engulf_effect(amplitude, position, 0.7, 0.4);
                Pulse::new(
                    amp_a,
                    amp_b,
                    self.state.suck_frequency_a.frequency(position),
                    self.state.suck_frequency_b.frequency(position),
                )
            }
            BjStage::Deepthroat => {
                let position = self.waves.position_without_variance("position");
                let amplitude = self.waves.current_amplitude();
                let (amp_a, amp_b) = engulf_effect(amplitude, position, 0.8, 0.3);
                Pulse::new(
                    amp_a,
                    amp_b,
                    position,
                    self.state.deepthroat_frequency.frequency(position),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_changes_never_repeat() {
        let mut bj = BjActivity::new(13);
        bj.initialise();
        let BjActivity {
            waves,
            timers,
            state,
        } = &mut bj;

        let mut visited = vec![state.stage];
        for _ in 0..200 {
            let previous = state.stage;
            state.next_stage(waves, timers);
            assert_ne!(state.stage, previous);
            visited.push(state.stage);
        }
        for stage in STAGES {
            assert!(visited.contains(&stage), "{stage:?} never came up");
        }
    }

    #[test]
    fn licking_stages_stop_speed_changes() {
        let mut bj = BjActivity::new(2);
        bj.initialise();
        for _ in 0..100 {
            let BjActivity {
                waves,
                timers,
                state,
            } = &mut bj;
            state.next_stage(waves, timers);
            let licking = matches!(state.stage, BjStage::FullLick | BjStage::TipLick);
            assert_eq!(timers.has_timer("speedChange"), !licking, "{:?}", state.stage);
            assert!(timers.has_timer("nextStage"));
        }
    }
}
