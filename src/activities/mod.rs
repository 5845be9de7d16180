//! Concrete activities built from the howl-core components.
//!
//! Every activity owns a seeded generator, so two activities built from the same seed and
//! driven with the same time steps produce the same pulses. Completion hooks are small
//! per-activity event enums, dispatched by the activity's `handle` method with mutable access
//! to the manager that fired them.

mod additive;
mod bj;
mod calibration;
mod chaos;
mod fast_slow;
mod lick;
mod luxury_hj;
mod milker;
mod opposites;
mod penetration;
mod random_shapes;
mod relentless;
mod simplex;
mod vibro;

pub use additive::AdditiveActivity;
pub use bj::BjActivity;
pub use calibration::{Calibration1Activity, Calibration2Activity};
pub use chaos::ChaosActivity;
pub use fast_slow::FastSlowActivity;
pub use lick::LickActivity;
pub use luxury_hj::LuxuryHjActivity;
pub use milker::MilkerActivity;
pub use opposites::OppositesActivity;
pub use penetration::PenetrationActivity;
pub use random_shapes::RandomShapesActivity;
pub use relentless::RelentlessActivity;
pub use simplex::{SimplexActivity, SimplexParams};
pub use vibro::VibroActivity;

use howl_core::constants::TMAX;
use howl_core::{CyclicalWave, InterpolationType, WavePoint};

/// Builds a wave from literal points. A rejected literal is a bug, so this panics.
pub(crate) fn literal_wave(
    name: &str,
    points: &[WavePoint],
    interpolation: InterpolationType,
) -> CyclicalWave {
    CyclicalWave::from_points(name, points.iter().copied(), interpolation)
        .unwrap_or_else(|err| panic!("literal wave '{name}' is invalid: {err}"))
}

/// Rises from 0 to `peak` at mid-cycle and falls back, flat at both turning points.
pub(crate) fn up_down_wave(name: &str, low: f64, peak: f64, peak_time: f64) -> CyclicalWave {
    literal_wave(
        name,
        &[
            WavePoint::with_slope(0.0, low, 0.0),
            WavePoint::with_slope(peak_time, peak, 0.0),
        ],
        InterpolationType::Hermite,
    )
}

/// Runs from `from` to `to` over the whole cycle, then jumps back.
pub(crate) fn ramp_wave(
    name: &str,
    from: f64,
    to: f64,
    interpolation: InterpolationType,
) -> CyclicalWave {
    literal_wave(
        name,
        &[
            WavePoint::with_slope(0.0, from, 0.0),
            WavePoint::with_slope(TMAX, to, 0.0),
        ],
        interpolation,
    )
}

pub(crate) fn bidirectional_wave() -> CyclicalWave {
    up_down_wave("bidirectional", 0.0, 1.0, 0.5)
}

pub(crate) fn unidirectional_wave() -> CyclicalWave {
    ramp_wave("unidirectional", 0.0, 1.0, InterpolationType::Hermite)
}
