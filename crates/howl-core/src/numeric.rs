//! Scalar helpers shared by the waveform, easing and mixing code.
//!
//! Everything here works in `f64`; callers narrow to `f32` only when building a [`crate::Pulse`].

/// Tolerance used by [`roughly_equal`].
pub const EPSILON: f64 = 1e-6;

#[inline]
pub fn lerp(start: f64, end: f64, fraction: f64) -> f64 {
    start + (end - start) * fraction
}

/// Cubic ease `t²(3 − 2t)` with zero slope at both ends. Input is clamped to [0, 1].
#[inline]
pub fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Area under [`smoothstep`] from 0 to `t`: `t³ − t⁴/2`. Input is clamped to [0, 1].
#[inline]
pub fn smoothstep_integral(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * t * (1.0 - 0.5 * t)
}

#[inline]
pub fn roughly_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Maps `t` from [0, 1] onto the span between `a` and `b`, clamping to that span.
///
/// `a` may be greater than `b`; the result then decreases as `t` grows.
pub fn scale_between(t: f64, a: f64, b: f64) -> f64 {
    lerp(a, b, t).clamp(a.min(b), a.max(b))
}

/// Straight-line interpolation between `(t0, p0)` and `(t1, p1)`.
pub fn linear_interpolate(t: f64, t0: f64, p0: f64, t1: f64, p1: f64) -> f64 {
    linear_interpolate_with_velocity(t, t0, p0, t1, p1).0
}

/// As [`linear_interpolate`], also returning the constant slope of the segment.
pub fn linear_interpolate_with_velocity(
    t: f64,
    t0: f64,
    p0: f64,
    t1: f64,
    p1: f64,
) -> (f64, f64) {
    if t0 >= t1 {
        return (p0, 0.0);
    }
    let h = (t - t0) / (t1 - t0);
    let velocity = (p1 - p0) / (t1 - t0);
    (p0 + h * (p1 - p0), velocity)
}

/// Hermite basis weights `(h00, h10, h01, h11)` at normalised segment time `h`.
#[inline]
fn hermite_basis(h: f64) -> (f64, f64, f64, f64) {
    let h2 = h * h;
    let h3 = h2 * h;
    (
        2.0 * h3 - 3.0 * h2 + 1.0,
        h3 - 2.0 * h2 + h,
        -2.0 * h3 + 3.0 * h2,
        h3 - h2,
    )
}

/// Derivatives of [`hermite_basis`] with respect to `h`.
#[inline]
fn hermite_basis_derivative(h: f64) -> (f64, f64, f64, f64) {
    let h2 = h * h;
    (
        6.0 * h2 - 6.0 * h,
        3.0 * h2 - 4.0 * h + 1.0,
        -6.0 * h2 + 6.0 * h,
        3.0 * h2 - 2.0 * h,
    )
}

/// Cubic Hermite interpolation between `(t0, p0)` and `(t1, p1)` with tangents `m0`/`m1`
/// expressed per unit of `t`.
pub fn hermite_interpolate(t: f64, t0: f64, p0: f64, m0: f64, t1: f64, p1: f64, m1: f64) -> f64 {
    hermite_interpolate_with_velocity(t, t0, p0, m0, t1, p1, m1).0
}

/// As [`hermite_interpolate`], also returning the analytic derivative with respect to `t`.
pub fn hermite_interpolate_with_velocity(
    t: f64,
    t0: f64,
    p0: f64,
    m0: f64,
    t1: f64,
    p1: f64,
    m1: f64,
) -> (f64, f64) {
    if t0 >= t1 {
        return (p0, 0.0);
    }
    let width = t1 - t0;
    let h = (t - t0) / width;

    let (h00, h10, h01, h11) = hermite_basis(h);
    let position = p0 * h00 + m0 * h10 * width + p1 * h01 + m1 * h11 * width;

    let (d00, d10, d01, d11) = hermite_basis_derivative(h);
    let dp_dh = p0 * d00 + m0 * d10 * width + p1 * d01 + m1 * d11 * width;

    (position, dp_dh / width)
}
