//! # Simplex Noise
//!
//! Seeded 2D simplex noise. The permutation table is shuffled with a
//! ChaCha stream, so a seed yields the same values on every platform.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Unit gradients the corners pick from.
const GRADIENTS: [(f64, f64); 8] = [
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
    (std::f64::consts::FRAC_1_SQRT_2, std::f64::consts::FRAC_1_SQRT_2),
    (-std::f64::consts::FRAC_1_SQRT_2, std::f64::consts::FRAC_1_SQRT_2),
    (std::f64::consts::FRAC_1_SQRT_2, -std::f64::consts::FRAC_1_SQRT_2),
    (-std::f64::consts::FRAC_1_SQRT_2, -std::f64::consts::FRAC_1_SQRT_2),
];

/// (sqrt(3) - 1) / 2
const SKEW: f64 = 0.366_025_403_784_438_6;
/// (3 - sqrt(3)) / 6
const UNSKEW: f64 = 0.211_324_865_405_187_1;

/// 2D simplex noise generator.
///
/// # Example
///
/// ```rust,ignore
/// let noise = SimplexNoise::new(42);
/// let value = noise.sample(100.5, 200.3);
/// assert!((-1.0..=1.0).contains(&value));
/// ```
#[derive(Clone)]
pub struct SimplexNoise {
    perm: [u8; 512],
}

impl SimplexNoise {
    /// Builds the permutation table for `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut table: [u8; 256] = std::array::from_fn(|i| i as u8);
        for i in (1..table.len()).rev() {
            let j = rng.gen_range(0..=i);
            table.swap(i, j);
        }
        Self {
            perm: std::array::from_fn(|i| table[i & 255]),
        }
    }

    #[inline]
    fn gradient(&self, i: i32, j: i32) -> (f64, f64) {
        let a = usize::from(self.perm[(i & 255) as usize]);
        GRADIENTS[usize::from(self.perm[a + (j & 255) as usize]) & 7]
    }

    #[inline]
    fn corner(&self, i: i32, j: i32, x: f64, y: f64) -> f64 {
        let falloff = 0.5 - x * x - y * y;
        if falloff <= 0.0 {
            return 0.0;
        }
        let (gx, gy) = self.gradient(i, j);
        let f2 = falloff * falloff;
        f2 * f2 * (gx * x + gy * y)
    }

    /// Samples the noise field. Output is in `[-1, 1]`.
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let skew = (x + y) * SKEW;
        let cell_x = (x + skew).floor();
        let cell_y = (y + skew).floor();

        let unskew = (cell_x + cell_y) * UNSKEW;
        let x0 = x - (cell_x - unskew);
        let y0 = y - (cell_y - unskew);

        // Lower or upper triangle of the skewed cell.
        let (step_x, step_y) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - f64::from(step_x) + UNSKEW;
        let y1 = y0 - f64::from(step_y) + UNSKEW;
        let x2 = x0 - 1.0 + 2.0 * UNSKEW;
        let y2 = y0 - 1.0 + 2.0 * UNSKEW;

        let i = cell_x as i32;
        let j = cell_y as i32;
        let sum = self.corner(i, j, x0, y0)
            + self.corner(i + step_x, j + step_y, x1, y1)
            + self.corner(i + 1, j + 1, x2, y2);

        (70.0 * sum).clamp(-1.0, 1.0)
    }

    /// Samples at integer coordinates scaled by `scale`, mapped to `[0, 255]`.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32, scale: f32) -> f32 {
        let scale = f64::from(scale);
        let value = self.sample(f64::from(x) * scale, f64::from(y) * scale);
        ((value + 1.0) * 127.5) as f32
    }
}
