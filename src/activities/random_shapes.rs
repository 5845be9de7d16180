use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use howl_core::constants::{mix_seed, TMAX};
use howl_core::random::{random_in_range, uniform};
use howl_core::{
    Activity, CyclicalWave, InterpolationType, Pulse, ShapeError, TimerManager, WaveManager,
    WavePoint, WaveShape,
};

const ITERATION_SECS: RangeInclusive<f64> = 10.0..=40.0;
const SPEED: RangeInclusive<f64> = 0.2..=0.8;
const SPEED_BIAS: f64 = 1.8;
const FREQUENCY: RangeInclusive<f64> = 0.0..=1.0;
const WAVE_POINTS: RangeInclusive<usize> = 2..=5;
const MAX_POWER: f64 = 0.95;
const POWER_LOWER_BOUND: f64 = 0.8;
const MIN_TIME_SPACING: f64 = 0.05;

#[derive(Clone, Copy, Debug)]
enum RandomShapesEvent {
    IterationDue,
    NextIteration,
}

/// Each channel plays its own freshly drawn random shape, replaced every so often.
pub struct RandomShapesActivity {
    waves: WaveManager<RandomShapesEvent>,
    timers: TimerManager<RandomShapesEvent>,
    state: RandomShapesState,
}

struct RandomShapesState {
    rng: StdRng,
    speed: f64,
    freq_a: f64,
    freq_b: f64,
}

/// A shape through `count` random points spaced at least [`MIN_TIME_SPACING`] apart (and
/// from both cycle ends), anchored at zero, with at least one point reaching
/// [`POWER_LOWER_BOUND`].
fn random_shape<R: Rng>(rng: &mut R, count: usize) -> Result<WaveShape, ShapeError> {
    let mut times = vec![0.0, 1.0];
    let mut points = Vec::with_capacity(count + 1);
    for _ in 0..count {
        let time = loop {
            let candidate = uniform(rng, 0.0..=TMAX);
            if times
                .iter()
                .all(|existing: &f64| (existing - candidate).abs() >= MIN_TIME_SPACING)
            {
                break candidate;
            }
        };
        times.push(time);
        points.push(WavePoint::new(time, uniform(rng, 0.0..=MAX_POWER)));
    }

    if !points.is_empty() && points.iter().all(|p| p.position < POWER_LOWER_BOUND) {
        let index = rng.gen_range(0..points.len());
        points[index].position = uniform(rng, POWER_LOWER_BOUND..=MAX_POWER);
    }
    points.push(WavePoint::new(0.0, 0.0));

    WaveShape::new("randomWave", points, InterpolationType::Hermite)
}

impl RandomShapesActivity {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let speed = random_in_range(&mut rng, SPEED, SPEED_BIAS);
        let freq_a = uniform(&mut rng, FREQUENCY);
        let freq_b = uniform(&mut rng, FREQUENCY);
        Self {
            waves: WaveManager::new(mix_seed(seed, 0)),
            timers: TimerManager::new(),
            state: RandomShapesState {
                rng,
                speed,
                freq_a,
                freq_b,
            },
        }
    }
}

impl RandomShapesState {
    fn handle(
        &mut self,
        event: RandomShapesEvent,
        waves: &mut WaveManager<RandomShapesEvent>,
        timers: &mut TimerManager<RandomShapesEvent>,
    ) {
        match event {
            RandomShapesEvent::IterationDue => {
                waves.stop_at_end_of_cycle(RandomShapesEvent::NextIteration)
            }
            RandomShapesEvent::NextIteration => self.next_iteration(waves, timers),
        }
    }

    fn next_iteration(
        &mut self,
        waves: &mut WaveManager<RandomShapesEvent>,
        timers: &mut TimerManager<RandomShapesEvent>,
    ) {
        self.speed = random_in_range(&mut self.rng, SPEED, SPEED_BIAS);
        self.freq_a = uniform(&mut self.rng, FREQUENCY);
        self.freq_b = uniform(&mut self.rng, FREQUENCY);

        for name in ["waveA", "waveB"] {
            let count = self.rng.gen_range(WAVE_POINTS);
            match random_shape(&mut self.rng, count) {
                Ok(shape) => waves.add_wave_as(name, CyclicalWave::new(shape)),
                Err(err) => log::warn!("keeping previous {name}: {err}"),
            }
        }

        waves.set_speed(self.speed);
        waves.restart();
        let secs = uniform(&mut self.rng, ITERATION_SECS);
        let due = timers.add_timer("nextIteration", secs, RandomShapesEvent::IterationDue);
        if let Some(event) = due {
            self.handle(event, waves, timers);
        }
    }
}

impl Activity for RandomShapesActivity {
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
        Pulse::new(
            self.waves.position("waveA"),
            self.waves.position("waveB"),
            self.state.freq_a,
            self.state.freq_b,
        )
    }
}
