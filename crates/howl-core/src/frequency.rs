//! Piecewise position-to-frequency maps.

use thiserror::Error;

use crate::numeric::{linear_interpolate, smoothstep};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrequencyMapError {
    #[error("a frequency map needs at least one point")]
    Empty,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrequencyInterpolation {
    #[default]
    Smoothstep,
    Linear,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrequencyPoint {
    pub position: f64,
    pub frequency: f64,
}

impl FrequencyPoint {
    pub const fn new(position: f64, frequency: f64) -> Self {
        Self {
            position,
            frequency,
        }
    }
}

/// Maps a position onto a frequency through sorted control points. Positions outside the
/// covered range take the nearest end value.
#[derive(Clone, Debug)]
pub struct FrequencyConverter {
    points: Vec<FrequencyPoint>,
    interpolation: FrequencyInterpolation,
}

impl FrequencyConverter {
    pub fn new(
        points: impl IntoIterator<Item = FrequencyPoint>,
        interpolation: FrequencyInterpolation,
    ) -> Result<Self, FrequencyMapError> {
        let mut points: Vec<FrequencyPoint> = points.into_iter().collect();
        if points.is_empty() {
            return Err(FrequencyMapError::Empty);
        }
        points.sort_by(|a, b| a.position.total_cmp(&b.position));
        Ok(Self {
            points,
            interpolation,
        })
    }

    pub fn frequency(&self, position: f64) -> f64 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };
        if position <= first.position {
            return first.frequency;
        }
        if position >= last.position {
            return last.frequency;
        }

        let upper = self.points.partition_point(|p| p.position < position);
        let (lo, hi) = (&self.points[upper - 1], &self.points[upper]);
        match self.interpolation {
            FrequencyInterpolation::Linear => {
                linear_interpolate(position, lo.position, lo.frequency, hi.position, hi.frequency)
            }
            FrequencyInterpolation::Smoothstep => {
                let h = (position - lo.position) / (hi.position - lo.position);
                lo.frequency + smoothstep(h) * (hi.frequency - lo.frequency)
            }
        }
    }
}
