//! Background star shell: points scattered over a large sphere.

use glam::Vec3;
use rand::prelude::*;

/// Orbit view shell.
pub const ORBIT_STAR_COUNT: usize = 20_000;
pub const ORBIT_STAR_RADIUS: f32 = 4000.0;

/// Surface view shell (a little sparser, a little farther).
pub const SURFACE_STAR_COUNT: usize = 15_000;
pub const SURFACE_STAR_RADIUS: f32 = 5000.0;

/// Generated star positions.
#[derive(Debug, Clone)]
pub struct Starfield {
    pub positions: Vec<[f32; 3]>,
    pub radius: f32,
}

impl Starfield {
    /// Scatter `count` stars on a sphere of `radius`, deterministically from `seed`.
    ///
    /// Directions come from normalizing a uniform sample of the unit cube, so
    /// the corners are slightly over-represented. That clumping is part of the look.
    pub fn generate(count: usize, radius: f32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut positions = Vec::with_capacity(count);
        while positions.len() < count {
            let v = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            // Reject the (vanishingly rare) near-origin sample rather than emit NaN.
            if let Some(dir) = v.try_normalize() {
                positions.push((dir * radius).to_array());
            }
        }
        Self { positions, radius }
    }
}
