//! # Howl Core
//!
//! Procedural signal generation for two-channel pulse output:
//!
//! - [`WaveShape`] / [`CyclicalWave`] - cyclic waveforms with monotone Hermite or linear
//!   interpolation
//! - [`WaveManager`] - phase playback with eased speed/amplitude and per-cycle variance
//! - [`SmoothedValue`] - smoothstep transitions towards a target
//! - [`TimerManager`] - keyed one-shot timers that are safe to reschedule from their handlers
//! - [`NoiseGenerator`] - pure, continuous two-channel coherent noise
//! - [`Activity`] - the interface a host drives to obtain [`Pulse`] values
//!
//! Nothing here sleeps or does I/O. Every component moves forward only when given a
//! non-negative time step, and all randomness comes from explicitly seeded generators.

pub mod activity;
pub mod constants;
pub mod effects;
pub mod frequency;
pub mod noise;
pub mod numeric;
pub mod pulse;
pub mod random;
pub mod shape;
pub mod smoothed;
pub mod timer;
pub mod wave_manager;

pub use activity::Activity;
pub use frequency::{FrequencyConverter, FrequencyInterpolation, FrequencyMapError, FrequencyPoint};
pub use noise::NoiseGenerator;
pub use pulse::Pulse;
pub use shape::{CyclicalWave, InterpolationType, ShapeError, WavePoint, WaveShape};
pub use smoothed::{SmoothedValue, Transition};
pub use timer::TimerManager;
pub use wave_manager::WaveManager;
