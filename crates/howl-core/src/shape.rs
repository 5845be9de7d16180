//! Cyclic waveform definitions.
//!
//! A [`WaveShape`] is a closed loop of control points over one unit cycle. Time 1.0 aliases
//! time 0.0 of the next cycle, so the segment after the last point always runs back to the
//! first one. [`CyclicalWave`] is the cheap, shareable handle the rest of the crate evaluates.

use std::sync::Arc;

use thiserror::Error;

use crate::numeric::{hermite_interpolate_with_velocity, linear_interpolate_with_velocity};

/// Rejected point sets. These come from literal shape definitions, so hitting one is a bug in
/// the caller rather than a runtime condition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("wave point time {time} is outside [0.0, 1.0)")]
    TimeOutOfRange { time: f64 },
    #[error("shape needs at least two points with distinct times, got {count}")]
    TooFewPoints { count: usize },
    #[error("a shape must be repeated at least once")]
    ZeroRepeats,
}

/// One control point of a cyclic waveform.
///
/// Fields:
/// - `time`: position in the cycle, in [0, 1)
/// - `position`: output value at that time
/// - `slope`: tangent per unit of cycle time; `None` asks the shape to derive it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WavePoint {
    pub time: f64,
    pub position: f64,
    pub slope: Option<f64>,
}

impl WavePoint {
    pub fn new(time: f64, position: f64) -> Self {
        Self {
            time,
            position,
            slope: None,
        }
    }

    pub fn with_slope(time: f64, position: f64, slope: f64) -> Self {
        Self {
            time,
            position,
            slope: Some(slope),
        }
    }

    #[inline]
    fn tangent(&self) -> f64 {
        self.slope.unwrap_or(0.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InterpolationType {
    #[default]
    Hermite,
    Linear,
}

/// Immutable, named cyclic waveform.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveShape {
    name: String,
    points: Vec<WavePoint>,
    interpolation: InterpolationType,
}

impl WaveShape {
    /// Builds a shape from unordered points.
    ///
    /// Points are sorted by time and duplicates by time dropped (the first one given wins).
    /// For Hermite shapes, if any point lacks a slope every slope is recomputed with monotone
    /// cyclic tangents.
    pub fn new(
        name: impl Into<String>,
        points: impl IntoIterator<Item = WavePoint>,
        interpolation: InterpolationType,
    ) -> Result<Self, ShapeError> {
        let mut points: Vec<WavePoint> = points.into_iter().collect();
        if let Some(bad) = points.iter().find(|p| !(0.0..1.0).contains(&p.time)) {
            return Err(ShapeError::TimeOutOfRange { time: bad.time });
        }
        points.sort_by(|a, b| a.time.total_cmp(&b.time));
        points.dedup_by(|later, earlier| later.time == earlier.time);
        if points.len() < 2 {
            return Err(ShapeError::TooFewPoints {
                count: points.len(),
            });
        }

        let name = name.into();
        if interpolation == InterpolationType::Hermite && points.iter().any(|p| p.slope.is_none())
        {
            let slopes = monotone_slopes(&points);
            for (point, slope) in points.iter_mut().zip(slopes) {
                point.slope = Some(slope);
            }
            log::debug!("shape '{name}': derived monotone slopes for {} points", points.len());
        }

        Ok(Self {
            name,
            points,
            interpolation,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> &[WavePoint] {
        &self.points
    }

    pub fn interpolation(&self) -> InterpolationType {
        self.interpolation
    }

    /// Position and velocity (per unit of phase) at `phase`. Phases outside [0, 1) wrap.
    pub fn evaluate(&self, phase: f64) -> (f64, f64) {
        let phase = wrap_phase(phase);
        let points = &self.points;
        let last = points.len() - 1;
        let next = points.partition_point(|p| p.time <= phase);

        let (start, end, t, t1) = match next {
            // Before the first point: still on the wrap segment that began last cycle.
            0 => (&points[last], &points[0], phase + 1.0, 1.0 + points[0].time),
            n if n > last => (&points[last], &points[0], phase, 1.0 + points[0].time),
            n => (&points[n - 1], &points[n], phase, points[n].time),
        };

        match self.interpolation {
            InterpolationType::Hermite => hermite_interpolate_with_velocity(
                t,
                start.time,
                start.position,
                start.tangent(),
                t1,
                end.position,
                end.tangent(),
            ),
            InterpolationType::Linear => {
                linear_interpolate_with_velocity(t, start.time, start.position, t1, end.position)
            }
        }
    }

    /// Tiles this cycle `repeats` times into one unit cycle.
    ///
    /// Slopes are scaled by `repeats` so each copy keeps the steepness of the source curve.
    pub fn repeated(&self, repeats: usize, name: impl Into<String>) -> Result<Self, ShapeError> {
        if repeats == 0 {
            return Err(ShapeError::ZeroRepeats);
        }
        let n = repeats as f64;
        let tiled = (0..repeats).flat_map(|k| {
            self.points.iter().map(move |p| WavePoint {
                time: (p.time + k as f64) / n,
                position: p.position,
                slope: p.slope.map(|s| s * n),
            })
        });
        Self::new(name, tiled, self.interpolation)
    }
}

/// Reduces `phase` into [0, 1), guarding against `rem_euclid` rounding up to 1.0.
#[inline]
pub(crate) fn wrap_phase(phase: f64) -> f64 {
    let wrapped = phase.rem_euclid(1.0);
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

/// Monotone cubic tangents for a closed loop of points (Fritsch–Carlson).
fn monotone_slopes(points: &[WavePoint]) -> Vec<f64> {
    let n = points.len();
    let next = |i: usize| (i + 1) % n;

    let secants: Vec<f64> = (0..n)
        .map(|i| {
            let j = next(i);
            let width = if j == 0 {
                (1.0 + points[0].time) - points[i].time
            } else {
                points[j].time - points[i].time
            };
            (points[j].position - points[i].position) / width
        })
        .collect();

    let mut slopes: Vec<f64> = (0..n)
        .map(|i| {
            let before = secants[(i + n - 1) % n];
            let after = secants[i];
            if before * after <= 0.0 {
                0.0
            } else {
                (before + after) / 2.0
            }
        })
        .collect();

    for (i, &d) in secants.iter().enumerate() {
        let j = next(i);
        if d == 0.0 {
            slopes[i] = 0.0;
            slopes[j] = 0.0;
            continue;
        }
        let a = slopes[i] / d;
        let b = slopes[j] / d;
        let norm = a.hypot(b);
        if norm > 3.0 {
            let t = 3.0 / norm;
            slopes[i] = t * a * d;
            slopes[j] = t * b * d;
        }
    }
    slopes
}

/// Shareable evaluator over a [`WaveShape`]. Cloning is cheap.
#[derive(Clone, Debug)]
pub struct CyclicalWave {
    shape: Arc<WaveShape>,
}

impl CyclicalWave {
    pub fn new(shape: WaveShape) -> Self {
        Self {
            shape: Arc::new(shape),
        }
    }

    /// Convenience constructor for the common point-list case.
    pub fn from_points(
        name: impl Into<String>,
        points: impl IntoIterator<Item = WavePoint>,
        interpolation: InterpolationType,
    ) -> Result<Self, ShapeError> {
        WaveShape::new(name, points, interpolation).map(Self::new)
    }

    pub fn name(&self) -> &str {
        self.shape.name()
    }

    pub fn shape(&self) -> &WaveShape {
        &self.shape
    }

    #[inline]
    pub fn position(&self, phase: f64) -> f64 {
        self.shape.evaluate(phase).0
    }

    #[inline]
    pub fn position_and_velocity(&self, phase: f64) -> (f64, f64) {
        self.shape.evaluate(phase)
    }

    pub fn create_repeated_wave(
        &self,
        repeats: usize,
        name: impl Into<String>,
    ) -> Result<Self, ShapeError> {
        self.shape.repeated(repeats, name).map(Self::new)
    }
}

impl From<WaveShape> for CyclicalWave {
    fn from(shape: WaveShape) -> Self {
        Self::new(shape)
    }
}
