// Shared tuning constants for the signal core.

/// Gap left before the end of a cycle by shapes whose last point should sit "at" 1.0.
pub const SMALL_AMOUNT: f64 = 0.0001;
/// Latest time a wave point may use.
pub const TMAX: f64 = 1.0 - SMALL_AMOUNT;

// Wave manager defaults
pub const DEFAULT_SPEED: f64 = 1.0; // cycles per second
pub const DEFAULT_AMPLITUDE: f64 = 1.0;
pub const DEFAULT_SPEED_VARIANCE: f64 = 0.1; // +/- fraction of speed redrawn each cycle
pub const DEFAULT_AMPLITUDE_VARIANCE: f64 = 0.1; // fraction of amplitude a cycle may lose

// Noise sampling
pub const NOISE_CIRCLE_RADIUS: f64 = 1.0; // radius of the sampled circle in field space
pub const NOISE_AXIS_OFFSET: f64 = 71.3; // separates the regions sampled by different axes
pub const NOISE_FIELD_SCALE: f64 = 76.0; // brings the 3D simplex sum into roughly [-1, 1]
pub const DEFAULT_NOISE_SEED: u64 = 0x5EED_0F_4A11;

/// Multiplier used to derive independent child seeds from a parent seed.
pub const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Derive the `index`-th child seed from `seed`.
#[inline]
pub fn mix_seed(seed: u64, index: u64) -> u64 {
    seed ^ index.wrapping_add(1).wrapping_mul(SEED_MIX)
}

/// Lower bound on the per-cycle speed multiplier so a cycle can always finish.
pub const MIN_SPEED_FACTOR: f64 = 0.05;

/// Bisection rounds used to find when an easing speed carries the phase onto a boundary.
pub const BOUNDARY_SEARCH_STEPS: usize = 64;
