use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::SeedableRng;

use howl_core::random::uniform;
use howl_core::{Activity, Pulse, SmoothedValue, TimerManager, Transition};

const LEVEL: RangeInclusive<f64> = 0.0..=1.0;
const OVERALL_SPEED: RangeInclusive<f64> = 0.5..=3.0;
const OVERALL_SPEED_CHANGE_RATE: RangeInclusive<f64> = 0.2..=0.5;
const OVERALL_SPEED_CHANGE_SECS: RangeInclusive<f64> = 10.0..=20.0;
const BASE_CHANGE_RATE: RangeInclusive<f64> = 0.15..=0.4;

#[derive(Clone, Copy, Debug)]
enum OppositesEvent {
    AmplitudeReached,
    FrequencyReached,
    SpeedChange,
}

/// Channel B always mirrors channel A: when A gets stronger or higher, B gets weaker or lower.
pub struct OppositesActivity {
    timers: TimerManager<OppositesEvent>,
    state: OppositesState,
}

struct OppositesState {
    rng: StdRng,
    amp_a: SmoothedValue<OppositesEvent>,
    freq_a: SmoothedValue<OppositesEvent>,
    overall_speed: SmoothedValue<OppositesEvent>,
}

impl OppositesActivity {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let amp_a = SmoothedValue::new(uniform(&mut rng, LEVEL));
        let freq_a = SmoothedValue::new(uniform(&mut rng, LEVEL));
        let overall_speed = SmoothedValue::new(uniform(&mut rng, OVERALL_SPEED));
        Self {
            timers: TimerManager::new(),
            state: OppositesState {
                rng,
                amp_a,
                freq_a,
                overall_speed,
            },
        }
    }
}

impl OppositesState {
    /// Transition rate scaled by the current overall speed.
    fn change_rate(&mut self) -> f64 {
        let speed = self.overall_speed.current();
        let range = BASE_CHANGE_RATE.start() * speed..=BASE_CHANGE_RATE.end() * speed;
        uniform(&mut self.rng, range)
    }

    fn handle(&mut self, event: OppositesEvent, timers: &mut TimerManager<OppositesEvent>) {
        let immediate = match event {
            OppositesEvent::AmplitudeReached => {
                let target = uniform(&mut self.rng, LEVEL);
                let rate = self.change_rate();
                self.amp_a
                    .set_target(target, Transition::Rate(rate), Some(event))
            }
            OppositesEvent::FrequencyReached => {
                let target = uniform(&mut self.rng, LEVEL);
                let rate = self.change_rate();
                self.freq_a
                    .set_target(target, Transition::Rate(rate), Some(event))
            }
            OppositesEvent::SpeedChange => {
                let target = uniform(&mut self.rng, OVERALL_SPEED);
                let rate = uniform(&mut self.rng, OVERALL_SPEED_CHANGE_RATE);
                let secs = uniform(&mut self.rng, OVERALL_SPEED_CHANGE_SECS);
                let _ = self
                    .overall_speed
                    .set_target(target, Transition::Rate(rate), None);
                timers.add_timer("speedChange", secs, event)
            }
        };
        if let Some(event) = immediate {
            self.handle(event, timers);
        }
    }
}

impl Activity for OppositesActivity {
    fn initialise(&mut self) {
        for event in [
            OppositesEvent::AmplitudeReached,
            OppositesEvent::FrequencyReached,
            OppositesEvent::SpeedChange,
        ] {
            self.state.handle(event, &mut self.timers);
        }
    }

    fn run_simulation(&mut self, dt: f64) {
        let Self { timers, state } = self;
        timers.update(dt, |timers, event| state.handle(event, timers));
        for event in [state.amp_a.update(dt), state.freq_a.update(dt)]
            .into_iter()
            .flatten()
        {
            state.handle(event, timers);
        }
        let _ = state.overall_speed.update(dt);
    }

    fn pulse(&self) -> Pulse {
        let amp_a = self.state.amp_a.current();
        let freq_a = self.state.freq_a.current();
        Pulse::new(amp_a, 1.0 - amp_a, freq_a, 1.0 - freq_a)
    }
}
