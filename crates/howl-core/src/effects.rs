// Helpers that turn a single modulation value into two channel levels.

/// Maps a signed velocity onto [0, 1): 0 at rest, approaching 1 as `|velocity|` outgrows
/// `sensitivity`.
pub fn scale_velocity(velocity: f64, sensitivity: f64) -> f64 {
    if velocity == 0.0 {
        return 0.0;
    }
    velocity.abs() / (velocity.abs() + sensitivity)
}

#[inline]
fn effective_position(position: f64, strength: f64) -> f64 {
    (0.5 * (1.0 - strength) + position * strength).clamp(0.0, 1.0)
}

/// Constant-power pan of `amplitude` between channel A (position 0) and B (position 1).
///
/// `strength` blends the position towards the centre: 0 always splits evenly. The blended
/// position is clamped to [0, 1].
pub fn positional_effect(amplitude: f64, position: f64, strength: f64) -> (f64, f64) {
    let p = effective_position(position, strength);
    (amplitude * (1.0 - p).sqrt(), amplitude * p.sqrt())
}

/// Linear pan, otherwise as [`positional_effect`].
pub fn positional_effect_linear(amplitude: f64, position: f64, strength: f64) -> (f64, f64) {
    let p = effective_position(position, strength);
    (amplitude * (1.0 - p), amplitude * p)
}

const ENGULF_FALLOFF: f64 = 0.8;

/// Channel levels for something sliding over both electrodes: each channel swells until
/// `position` reaches its engulf point, then fades as the position moves past it.
pub fn engulf_effect(amplitude: f64, position: f64, engulf_a: f64, engulf_b: f64) -> (f64, f64) {
    let level = |engulf: f64| {
        if position <= engulf {
            if engulf == 0.0 {
                1.0
            } else {
                (position / engulf).max(0.0).sqrt()
            }
        } else {
            (1.0 - (position - engulf).abs() * ENGULF_FALLOFF).max(0.0).sqrt()
        }
    };
    (level(engulf_a) * amplitude, level(engulf_b) * amplitude)
}

/// Bends a normalized frequency by `frequency^(1/exponent)`, clamped to [0, 1].
pub fn feel_adjustment(frequency: f64, exponent: f64) -> f64 {
    frequency.max(0.0).powf(1.0 / exponent).clamp(0.0, 1.0)
}
