// Ranged random draws shared by activities.

use std::ops::RangeInclusive;

use rand::Rng;

/// Uniform draw from `range`, skewed by `bias`.
///
/// A bias above 1 makes low values more likely, below 1 high values; 1 is uniform. The bounds
/// may be given in either order.
pub fn random_in_range<R: Rng + ?Sized>(rng: &mut R, range: RangeInclusive<f64>, bias: f64) -> f64 {
    assert!(bias > 0.0, "bias must be positive (got {bias})");
    let (a, b) = range.into_inner();
    let (min, max) = (a.min(b), a.max(b));
    if min == max {
        return min;
    }
    let u: f64 = rng.gen();
    min + u.powf(bias) * (max - min)
}

/// Unbiased [`random_in_range`].
#[inline]
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, range: RangeInclusive<f64>) -> f64 {
    random_in_range(rng, range, 1.0)
}
