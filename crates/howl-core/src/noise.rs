//! Coherent two-channel noise.
//!
//! [`NoiseGenerator::get_noise`] samples a 3D simplex field at two points a quarter turn apart
//! on a circle that drifts along one field axis as `time` grows. The two samples vary smoothly
//! and slowly, but only loosely track each other.

use std::f64::consts::FRAC_PI_2;

use glam::DVec3;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::constants::{
    DEFAULT_NOISE_SEED, NOISE_AXIS_OFFSET, NOISE_CIRCLE_RADIUS, NOISE_FIELD_SCALE,
};

const F3: f64 = 1.0 / 3.0;
const G3: f64 = 1.0 / 6.0;

const GRAD3: [[f64; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

/// Stateless sampler over a fixed, seeded simplex field.
#[derive(Clone)]
pub struct NoiseGenerator {
    perm: [u8; 512],
}

impl Default for NoiseGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_NOISE_SEED)
    }
}

impl NoiseGenerator {
    pub fn new(seed: u64) -> Self {
        let mut table: Vec<u8> = (0..=255).collect();
        table.shuffle(&mut StdRng::seed_from_u64(seed));
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }
        Self { perm }
    }

    /// Samples the field for two channels.
    ///
    /// `time` moves the sampling circle along the field axis selected by `axis` (taken modulo
    /// 3); `rotation` (radians) is the angle of channel A on that circle, channel B sits a
    /// quarter turn ahead. Values lie in `[-radius, radius]`; with `shift_result` they are
    /// moved up by 0.5 and clamped to [0, 1]. The shift only keeps every value distinct for a
    /// radius of at most 0.5; beyond that, the extremes pin at 0 or 1.
    pub fn get_noise(
        &self,
        time: f64,
        rotation: f64,
        radius: f64,
        axis: usize,
        shift_result: bool,
    ) -> (f64, f64) {
        let axis = axis % 3;
        let sample = |angle: f64| {
            let value = self.simplex3(circle_point(time, angle, axis)) * radius;
            if shift_result {
                (value + 0.5).clamp(0.0, 1.0)
            } else {
                value
            }
        };
        (sample(rotation), sample(rotation + FRAC_PI_2))
    }

    #[inline]
    fn hash(&self, i: usize, j: usize, k: usize) -> usize {
        let perm = &self.perm;
        perm[i + perm[j + perm[k] as usize] as usize] as usize % 12
    }

    /// 3D simplex noise in [-1, 1].
    fn simplex3(&self, p: DVec3) -> f64 {
        let skew = (p.x + p.y + p.z) * F3;
        let cell = (p + DVec3::splat(skew)).floor();
        let unskew = (cell.x + cell.y + cell.z) * G3;
        let d0 = p - (cell - DVec3::splat(unskew));

        // Which of the six tetrahedra of the skewed cube we are in.
        let (o1, o2) = if d0.x >= d0.y {
            if d0.y >= d0.z {
                (DVec3::X, DVec3::new(1.0, 1.0, 0.0))
            } else if d0.x >= d0.z {
                (DVec3::X, DVec3::new(1.0, 0.0, 1.0))
            } else {
                (DVec3::Z, DVec3::new(1.0, 0.0, 1.0))
            }
        } else if d0.y < d0.z {
            (DVec3::Z, DVec3::new(0.0, 1.0, 1.0))
        } else if d0.x < d0.z {
            (DVec3::Y, DVec3::new(0.0, 1.0, 1.0))
        } else {
            (DVec3::Y, DVec3::new(1.0, 1.0, 0.0))
        };

        let d1 = d0 - o1 + DVec3::splat(G3);
        let d2 = d0 - o2 + DVec3::splat(2.0 * G3);
        let d3 = d0 - DVec3::ONE + DVec3::splat(3.0 * G3);

        let i = (cell.x as i64 & 255) as usize;
        let j = (cell.y as i64 & 255) as usize;
        let k = (cell.z as i64 & 255) as usize;
        let corners = [
            (d0, self.hash(i, j, k)),
            (
                d1,
                self.hash(i + o1.x as usize, j + o1.y as usize, k + o1.z as usize),
            ),
            (
                d2,
                self.hash(i + o2.x as usize, j + o2.y as usize, k + o2.z as usize),
            ),
            (d3, self.hash(i + 1, j + 1, k + 1)),
        ];

        let total: f64 = corners
            .iter()
            .map(|(d, g)| {
                // Kernel radius² of 0.5 keeps every contribution zero at the simplex edges,
                // which is what makes the field continuous.
                let t = 0.5 - d.length_squared();
                if t <= 0.0 {
                    0.0
                } else {
                    let t2 = t * t;
                    t2 * t2 * DVec3::from_array(GRAD3[*g]).dot(*d)
                }
            })
            .sum();

        (total * NOISE_FIELD_SCALE).clamp(-1.0, 1.0)
    }
}

fn circle_point(time: f64, angle: f64, axis: usize) -> DVec3 {
    let (sin, cos) = angle.sin_cos();
    let u = cos * NOISE_CIRCLE_RADIUS;
    let v = sin * NOISE_CIRCLE_RADIUS;
    let point = match axis {
        0 => DVec3::new(time, u, v),
        1 => DVec3::new(u, time, v),
        _ => DVec3::new(u, v, time),
    };
    point + DVec3::splat(NOISE_AXIS_OFFSET * (axis + 1) as f64)
}
