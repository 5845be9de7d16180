use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use howl_core::effects::positional_effect;
use howl_core::random::uniform;
use howl_core::{Activity, Pulse, SmoothedValue, TimerManager, Transition};

const VIBE_SPEED: RangeInclusive<f64> = 0.0..=1.0;
const MOVE_SPEED: RangeInclusive<f64> = 0.04..=0.3;
const HOLD_SECS: RangeInclusive<f64> = 0.0..=3.0;
const SPEED_CHANGE_SECS: RangeInclusive<f64> = 5.0..=30.0;
const POSITION: RangeInclusive<f64> = 0.0..=1.0;
const VIBE_POWER: f64 = 0.9;
const HOLD_PROBABILITY: f64 = 0.5;

#[derive(Clone, Copy, Debug)]
enum VibroEvent {
    SpeedChange,
    NewTarget,
    TargetReached,
}

/// A vibrator sliding between random spots, sometimes pausing when it gets there.
pub struct VibroActivity {
    timers: TimerManager<VibroEvent>,
    state: VibroState,
}

struct VibroState {
    rng: StdRng,
    vibe_speed: f64,
    position: SmoothedValue<VibroEvent>,
}

impl VibroActivity {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let position = SmoothedValue::new(uniform(&mut rng, POSITION));
        Self {
            timers: TimerManager::new(),
            state: VibroState {
                rng,
                vibe_speed: 0.3,
                position,
            },
        }
    }
}

impl VibroState {
    fn handle(&mut self, event: VibroEvent, timers: &mut TimerManager<VibroEvent>) {
        match event {
            VibroEvent::SpeedChange => {
                self.vibe_speed = uniform(&mut self.rng, VIBE_SPEED);
                self.schedule_speed_change(timers);
            }
            VibroEvent::NewTarget => self.new_target(timers),
            VibroEvent::TargetReached => {
                if self.rng.gen::<f64>() < HOLD_PROBABILITY {
                    let secs = uniform(&mut self.rng, HOLD_SECS);
                    if let Some(event) = timers.add_timer("hold", secs, VibroEvent::NewTarget) {
                        self.handle(event, timers);
                    }
                } else {
                    self.new_target(timers);
                }
            }
        }
    }

    fn new_target(&mut self, timers: &mut TimerManager<VibroEvent>) {
        let target = uniform(&mut self.rng, POSITION);
        let rate = uniform(&mut self.rng, MOVE_SPEED);
        if let Some(event) =
            self.position
                .set_target(target, Transition::Rate(rate), Some(VibroEvent::TargetReached))
        {
            self.handle(event, timers);
        }
    }

    fn schedule_speed_change(&mut self, timers: &mut TimerManager<VibroEvent>) {
        let secs = uniform(&mut self.rng, SPEED_CHANGE_SECS);
        if let Some(event) = timers.add_timer("speedChange", secs, VibroEvent::SpeedChange) {
            self.handle(event, timers);
        }
    }
}

impl Activity for VibroActivity {
    fn initialise(&mut self) {
        let state = &mut self.state;
        state.vibe_speed = uniform(&mut state.rng, VIBE_SPEED);
        let start = uniform(&mut state.rng, POSITION);
        state.position.set_immediately(start);
        state.new_target(&mut self.timers);
        state.schedule_speed_change(&mut self.timers);
    }

    fn run_simulation(&mut self, dt: f64) {
        let Self { timers, state } = self;
        timers.update(dt, |timers, event| state.handle(event, timers));
        if let Some(event) = state.position.update(dt) {
            state.handle(event, timers);
        }
    }

    fn pulse(&self) -> Pulse {
        let (amp_a, amp_b) = positional_effect(VIBE_POWER, self.state.position.current(), 1.0);
        let freq = self.state.vibe_speed;
        Pulse::new(amp_a, amp_b, freq, freq)
    }
}
