//! # Terrain Height
//!
//! Chunks only need a height per integer lattice point. [`HeightFn`] is
//! that contract; [`NoiseTerrain`] is the default implementation built on
//! two noise layers: a slow continental height and a faster local variance
//! that is strongest far from mid-height.

use crate::noise::SimplexNoise;

/// Pure, deterministic terrain height at an integer lattice point.
pub trait HeightFn {
    /// Height of the lattice point `(x, z)`.
    fn height(&self, x: i32, z: i32) -> f32;
}

impl<F: Fn(i32, i32) -> f32> HeightFn for F {
    #[inline]
    fn height(&self, x: i32, z: i32) -> f32 {
        self(x, z)
    }
}

/// Noise-driven rolling hills with lakes below y = 0.
#[derive(Clone)]
pub struct NoiseTerrain {
    noise: SimplexNoise,
}

impl NoiseTerrain {
    /// Continental layer frequency.
    pub const HEIGHT_SCALE: f32 = 0.0005;
    /// Local roughness layer frequency.
    pub const VARIANCE_SCALE: f32 = 0.0075;

    /// Creates the terrain for `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            noise: SimplexNoise::new(seed),
        }
    }

    /// Continental height, in `[-0.4, 2.22]` and mostly near `[0, 1]`.
    #[must_use]
    pub fn base_height(&self, x: i32, z: i32) -> f32 {
        let unit = self.noise.pixel(x, z, Self::HEIGHT_SCALE) / 255.0 * 1.2;
        let shaped = 0.5 * (2.0 * unit - 1.0).powi(3) + 0.5;
        shaped * 1.4 - 0.4
    }

    /// Local roughness, zero at mid-height.
    #[must_use]
    pub fn variance(&self, x: i32, z: i32) -> f32 {
        let local = (self.noise.pixel(x, z, Self::VARIANCE_SCALE) / 255.0 - 0.5).abs() * 2.0;
        local * (self.base_height(x, z) - 0.5).abs()
    }
}

impl HeightFn for NoiseTerrain {
    fn height(&self, x: i32, z: i32) -> f32 {
        self.variance(x, z) * 12.0 + self.base_height(x, z) * 40.0 - 6.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_height_fn() {
        let flat = |_: i32, _: i32| 3.5_f32;
        assert!((flat.height(10, -4) - 3.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_noise_terrain_deterministic() {
        let a = NoiseTerrain::new(11);
        let b = NoiseTerrain::new(11);
        for i in -50..50 {
            assert_eq!(a.height(i * 31, i * 17).to_bits(), b.height(i * 31, i * 17).to_bits());
        }
    }

    #[test]
    fn test_noise_terrain_bounds() {
        let terrain = NoiseTerrain::new(5);
        for i in -100..100 {
            let h = terrain.height(i * 97, i * -53);
            // base in [-0.4, 2.22], variance in [0, 1.72]
            assert!((-22.5..=105.0).contains(&h), "height {h} out of range");
        }
    }
}
