use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use howl_core::constants::mix_seed;
use howl_core::random::{random_in_range, uniform};
use howl_core::{
    Activity, CyclicalWave, InterpolationType, Pulse, ShapeError, TimerManager, WaveManager,
    WavePoint, WaveShape,
};

const ITERATION_SECS: RangeInclusive<f64> = 1.0..=30.0;
const SPEED: RangeInclusive<f64> = 0.2..=0.4;
const SPEED_BIAS: f64 = 2.5;
const FREQUENCY: RangeInclusive<f64> = 0.0..=1.0;
const WAVE_POWER: RangeInclusive<f64> = 0.8..=0.95;
const MAX_REPEATS: usize = 4;

#[derive(Clone, Copy, Debug)]
enum RelentlessEvent {
    /// Time for a new pattern once the current cycle is over.
    IterationDue,
    NextIteration,
}

/// A random attack/hold/decay envelope played on one channel while the other plays the same
/// envelope squeezed 1 to 4 times into each cycle.
pub struct RelentlessActivity {
    waves: WaveManager<RelentlessEvent>,
    timers: TimerManager<RelentlessEvent>,
    state: RelentlessState,
}

struct RelentlessState {
    rng: StdRng,
    speed: f64,
    freq_a: f64,
    freq_b: f64,
    swap_channels: bool,
}

/// Random envelope: an attack to a peak, an optional hold, and a decay, with the attack and
/// decay sometimes broken by an intermediate point. The return to zero is left to the wrap.
fn random_envelope<R: Rng>(rng: &mut R) -> Result<WaveShape, ShapeError> {
    let has_hold = rng.gen::<f64>() < 0.3;
    let split_attack = rng.gen::<f64>() < 0.5;
    let split_decay = rng.gen::<f64>() < 0.5;
    let peak = uniform(rng, WAVE_POWER);

    let attack_weight = uniform(rng, 0.5..=3.0);
    let decay_weight = uniform(rng, 0.5..=3.0);
    let hold_weight = if has_hold {
        uniform(rng, 0.25..=1.5)
    } else {
        0.0
    };
    let total = attack_weight + decay_weight + hold_weight;
    let attack = attack_weight / total;
    let decay = decay_weight / total;
    let hold = hold_weight / total;

    let mut points = vec![WavePoint::new(0.0, 0.0)];
    let mut time = 0.0;
    if split_attack {
        let split = uniform(rng, 0.3..=0.7);
        let level = peak * uniform(rng, 0.2..=0.8);
        points.push(WavePoint::new(time + attack * split, level));
    }
    time += attack;
    points.push(WavePoint::new(time, peak));
    if has_hold {
        time += hold;
        points.push(WavePoint::new(time, peak));
    }
    if split_decay {
        let split = uniform(rng, 0.3..=0.7);
        let level = peak * uniform(rng, 0.2..=0.8);
        points.push(WavePoint::new(time + decay * split, level));
    }

    WaveShape::new("randomWave", points, InterpolationType::Hermite)
}

impl RelentlessActivity {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let speed = random_in_range(&mut rng, SPEED, SPEED_BIAS);
        let freq_a = uniform(&mut rng, FREQUENCY);
        let freq_b = uniform(&mut rng, FREQUENCY);
        let swap_channels = rng.gen_bool(0.5);
        Self {
            waves: WaveManager::new(mix_seed(seed, 0)),
            timers: TimerManager::new(),
            state: RelentlessState {
                rng,
                speed,
                freq_a,
                freq_b,
                swap_channels,
            },
        }
    }
}

impl RelentlessState {
    fn handle(
        &mut self,
        event: RelentlessEvent,
        waves: &mut WaveManager<RelentlessEvent>,
        timers: &mut TimerManager<RelentlessEvent>,
    ) {
        match event {
            RelentlessEvent::IterationDue => {
                waves.stop_at_end_of_cycle(RelentlessEvent::NextIteration)
            }
            RelentlessEvent::NextIteration => self.next_iteration(waves, timers),
        }
    }

    fn next_iteration(
        &mut self,
        waves: &mut WaveManager<RelentlessEvent>,
        timers: &mut TimerManager<RelentlessEvent>,
    ) {
        self.speed = random_in_range(&mut self.rng, SPEED, SPEED_BIAS);
        self.freq_a = uniform(&mut self.rng, FREQUENCY);
        self.freq_b = uniform(&mut self.rng, FREQUENCY);
        self.swap_channels = self.rng.gen_bool(0.5);

        let repeats = self.rng.gen_range(1..=MAX_REPEATS);
        let built = random_envelope(&mut self.rng).and_then(|shape| {
            let long = CyclicalWave::new(shape);
            let short = long.create_repeated_wave(repeats, "shortWave")?;
            Ok((long, short))
        });
        match built {
            Ok((long, short)) => {
                waves.add_wave_as("longWave", long);
                waves.add_wave_as("shortWave", short);
            }
            Err(err) => log::warn!("keeping previous envelope: {err}"),
        }

        waves.set_speed(self.speed);
        waves.restart();
        let secs = uniform(&mut self.rng, ITERATION_SECS);
        let due = timers.add_timer("nextIteration", secs, RelentlessEvent::IterationDue);
        if let Some(event) = due {
            self.handle(event, waves, timers);
        }
    }
}

impl Activity for RelentlessActivity {
    fn initialise(&mut self) {
        let Self {
            waves,
            timers,
            state,
        } = self;
        state.next_iteration(waves, timers);
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
        let long = self.waves.position("longWave");
        let short = self.waves.position("shortWave");
        let (amp_a, amp_b) = if self.state.swap_channels {
            (long, short)
        } else {
            (short, long)
        };
        Pulse::new(amp_a, amp_b, self.state.freq_a, self.state.freq_b)
    }
}
