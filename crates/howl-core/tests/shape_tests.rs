// Waveform construction, evaluation and tiling.

use howl_core::constants::TMAX;
use howl_core::{CyclicalWave, InterpolationType, ShapeError, WavePoint, WaveShape};
use proptest::prelude::*;

fn up_down() -> WaveShape {
    WaveShape::new(
        "upDown",
        [
            WavePoint::with_slope(0.0, 0.0, 0.0),
            WavePoint::with_slope(0.5, 1.0, 0.0),
        ],
        InterpolationType::Hermite,
    )
    .expect("valid shape")
}

#[test]
fn hermite_quarter_phase_is_exactly_half() {
    let (position, _) = up_down().evaluate(0.25);
    assert_eq!(position, 0.5);
}

#[test]
fn hermite_hits_control_points_with_given_slopes() {
    let shape = up_down();
    let (at_start, v_start) = shape.evaluate(0.0);
    let (at_peak, v_peak) = shape.evaluate(0.5);
    assert!(at_start.abs() < 1e-12, "start was {at_start}");
    assert!((at_peak - 1.0).abs() < 1e-12, "peak was {at_peak}");
    assert!(v_start.abs() < 1e-12 && v_peak.abs() < 1e-12, "turning points must be flat");
}

#[test]
fn wrap_segment_returns_to_first_point() {
    let shape = up_down();
    let (start, _) = shape.evaluate(0.0);
    let (near_end, _) = shape.evaluate(1.0 - 1e-9);
    assert!((start - near_end).abs() < 1e-6, "{start} vs {near_end}");
    let (three_quarters, velocity) = shape.evaluate(0.75);
    assert!((three_quarters - 0.5).abs() < 1e-12);
    assert!(velocity < 0.0, "falling half should have negative velocity");
}

#[test]
fn phases_outside_unit_cycle_wrap() {
    let shape = up_down();
    for phase in [0.1, 0.3, 0.62, 0.9] {
        let base = shape.evaluate(phase).0;
        assert!((shape.evaluate(phase + 3.0).0 - base).abs() < 1e-9);
        assert!((shape.evaluate(phase - 1.0).0 - base).abs() < 1e-9);
    }
}

#[test]
fn phase_before_first_point_uses_wrap_segment() {
    let shape = WaveShape::new(
        "late",
        [
            WavePoint::with_slope(0.2, 0.0, 0.0),
            WavePoint::with_slope(0.6, 1.0, 0.0),
        ],
        InterpolationType::Hermite,
    )
    .expect("valid shape");
    // Wrap segment runs from 0.6 to 1.2; phase 0.1 sits five sixths of the way along it.
    let (position, _) = shape.evaluate(0.1);
    let (same, _) = shape.evaluate(1.1);
    assert!((position - same).abs() < 1e-12);
    assert!(position > 0.0 && position < 0.5, "position was {position}");
}

#[test]
fn linear_velocity_is_segment_slope() {
    let shape = WaveShape::new(
        "saw",
        [WavePoint::new(0.0, 0.0), WavePoint::new(TMAX, 0.9)],
        InterpolationType::Linear,
    )
    .expect("valid shape");
    let (position, velocity) = shape.evaluate(0.5);
    assert!((position - 0.45 / TMAX).abs() < 1e-9);
    assert!((velocity - 0.9 / TMAX).abs() < 1e-9);
}

#[test]
fn points_are_sorted_and_duplicates_dropped() {
    let shape = WaveShape::new(
        "messy",
        [
            WavePoint::new(0.5, 1.0),
            WavePoint::new(0.0, 0.0),
            WavePoint::new(0.5, 0.2),
        ],
        InterpolationType::Linear,
    )
    .expect("valid shape");
    let times: Vec<f64> = shape.points().iter().map(|p| p.time).collect();
    assert_eq!(times, vec![0.0, 0.5]);
    assert_eq!(shape.points()[1].position, 1.0, "first point given for a time wins");
}

#[test]
fn missing_slope_recomputes_every_slope() {
    let shape = WaveShape::new(
        "partial",
        [
            WavePoint::with_slope(0.0, 0.0, 5.0),
            WavePoint::new(0.5, 1.0),
        ],
        InterpolationType::Hermite,
    )
    .expect("valid shape");
    // Both points are extrema of the loop, so monotone slopes are flat.
    assert!(shape.points().iter().all(|p| p.slope == Some(0.0)));
}

#[test]
fn rejects_bad_point_sets() {
    let out_of_range = WaveShape::new(
        "bad",
        [WavePoint::new(0.0, 0.0), WavePoint::new(1.0, 1.0)],
        InterpolationType::Linear,
    );
    assert_eq!(out_of_range, Err(ShapeError::TimeOutOfRange { time: 1.0 }));

    let negative = WaveShape::new(
        "bad",
        [WavePoint::new(-0.1, 0.0), WavePoint::new(0.5, 1.0)],
        InterpolationType::Linear,
    );
    assert!(matches!(negative, Err(ShapeError::TimeOutOfRange { .. })));

    let collapsed = WaveShape::new(
        "bad",
        [WavePoint::new(0.3, 0.0), WavePoint::new(0.3, 1.0)],
        InterpolationType::Hermite,
    );
    assert_eq!(collapsed, Err(ShapeError::TooFewPoints { count: 1 }));
}

#[test]
fn repeated_wave_tiles_the_cycle() {
    let wave = CyclicalWave::new(up_down());
    let tripled = wave.create_repeated_wave(3, "short").expect("valid repeat");
    assert_eq!(tripled.name(), "short");
    assert_eq!(tripled.shape().points().len(), 6);
    for phase in [0.05, 0.2, 0.31, 0.5, 0.77] {
        let expected = wave.position(phase * 3.0);
        let actual = tripled.position(phase);
        assert!((expected - actual).abs() < 1e-9, "phase {phase}: {expected} vs {actual}");
    }
    assert_eq!(
        wave.create_repeated_wave(0, "none").err(),
        Some(ShapeError::ZeroRepeats)
    );
}

#[test]
fn repeated_wave_scales_explicit_slopes() {
    let shape = WaveShape::new(
        "sloped",
        [
            WavePoint::with_slope(0.0, 0.0, 1.0),
            WavePoint::with_slope(0.5, 1.0, -1.0),
        ],
        InterpolationType::Hermite,
    )
    .expect("valid shape");
    let doubled = shape.repeated(2, "doubled").expect("valid repeat");
    let slopes: Vec<Option<f64>> = doubled.points().iter().map(|p| p.slope).collect();
    assert_eq!(slopes, vec![Some(2.0), Some(-2.0), Some(2.0), Some(-2.0)]);
    let (velocity_single, velocity_doubled) = (shape.evaluate(0.1).1, doubled.evaluate(0.05).1);
    assert!((velocity_doubled - 2.0 * velocity_single).abs() < 1e-9);
}

fn random_points() -> impl Strategy<Value = Vec<WavePoint>> {
    prop::collection::btree_set(0u32..1000, 2..7).prop_flat_map(|times| {
        let count = times.len();
        prop::collection::vec(-2.0f64..2.0, count).prop_map(move |positions| {
            times
                .iter()
                .zip(positions)
                .map(|(&t, p)| WavePoint::new(f64::from(t) / 1000.0, p))
                .collect()
        })
    })
}

proptest! {
    #[test]
    fn monotone_slopes_never_overshoot(points in random_points()) {
        let shape = WaveShape::new("random", points, InterpolationType::Hermite).unwrap();
        let pts = shape.points();
        for i in 0..pts.len() {
            let start = pts[i];
            let (end, end_time) = match pts.get(i + 1) {
                Some(next) => (*next, next.time),
                None => (pts[0], 1.0 + pts[0].time),
            };
            let lo = start.position.min(end.position) - 1e-9;
            let hi = start.position.max(end.position) + 1e-9;
            for step in 1..40 {
                let phase = start.time + (end_time - start.time) * f64::from(step) / 40.0;
                let (position, _) = shape.evaluate(phase);
                prop_assert!(
                    position >= lo && position <= hi,
                    "segment {} at {}: {} outside [{}, {}]", i, phase, position, lo, hi
                );
            }
        }
    }

    #[test]
    fn evaluation_is_periodic(points in random_points(), phase in 0.0f64..1.0) {
        let shape = WaveShape::new("random", points, InterpolationType::Hermite).unwrap();
        let (a, _) = shape.evaluate(phase);
        let (b, _) = shape.evaluate(phase + 1.0);
        prop_assert!((a - b).abs() < 1e-9);
        let (start, _) = shape.evaluate(0.0);
        let (end, _) = shape.evaluate(1.0 - 1e-12);
        prop_assert!((start - end).abs() < 1e-6, "{} vs {}", start, end);
    }
}
