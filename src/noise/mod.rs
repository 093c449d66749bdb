//! 2D gradient (Perlin-style) noise, per the fixed permutation-table design:
//! the table is built once from the master PRNG via Fisher-Yates, then every
//! subsequent noise query is a pure function of `(x, y)`.

use crate::prng::Prng;

const GRADIENTS: [(f32, f32); 8] = [
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
    (std::f32::consts::FRAC_1_SQRT_2, std::f32::consts::FRAC_1_SQRT_2),
    (-std::f32::consts::FRAC_1_SQRT_2, std::f32::consts::FRAC_1_SQRT_2),
    (std::f32::consts::FRAC_1_SQRT_2, -std::f32::consts::FRAC_1_SQRT_2),
    (-std::f32::consts::FRAC_1_SQRT_2, -std::f32::consts::FRAC_1_SQRT_2),
];

fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) - 10.0)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

/// A 256-entry permutation table, duplicated to 512 entries so lookups
/// never need to wrap with a modulo on the hot path.
#[derive(Debug, Clone)]
pub struct Noise {
    perm: [u8; 512],
}

impl Noise {
    /// Builds the permutation table by Fisher-Yates shuffling `0..256` with
    /// the given PRNG. This is the only place noise generation touches the
    /// shared random stream; every query after this is pure.
    pub fn new(prng: &mut Prng) -> Self {
        let mut table: Vec<u8> = (0..=255u8).collect();
        prng.shuffle(&mut table);
        let mut perm = [0u8; 512];
        for i in 0..512 {
            perm[i] = table[i % 256];
        }
        Self { perm }
    }

    fn gradient(&self, ix: i32, iy: i32) -> (f32, f32) {
        let h = self.perm[((self.perm[(ix & 255) as usize] as i32 + iy) & 255) as usize];
        GRADIENTS[(h & 7) as usize]
    }

    /// Gradient noise in roughly `[-1, 1]`.
    pub fn noise2d(&self, x: f32, y: f32) -> f32 {
        let x0 = x.floor() as i32;
        let y0 = y.floor() as i32;
        let x1 = x0 + 1;
        let y1 = y0 + 1;

        let sx = fade(x - x0 as f32);
        let sy = fade(y - y0 as f32);

        let dot = |ix: i32, iy: i32| -> f32 {
            let (gx, gy) = self.gradient(ix, iy);
            gx * (x - ix as f32) + gy * (y - iy as f32)
        };

        let n00 = dot(x0, y0);
        let n10 = dot(x1, y0);
        let n01 = dot(x0, y1);
        let n11 = dot(x1, y1);

        let ix0 = lerp(n00, n10, sx);
        let ix1 = lerp(n01, n11, sx);
        lerp(ix0, ix1, sy) * std::f32::consts::SQRT_2
    }

    /// Fractal Brownian motion: `octaves` layers of `noise2d`, each doubled
    /// in frequency (`lacunarity`) and halved in amplitude (`persistence`)
    /// from the last, summed and normalized by the total amplitude. When
    /// `warp > 0`, `(x, y)` is first displaced by a low-frequency noise
    /// field scaled by `warp`, producing the coastline/mountain distortion
    /// the world generator relies on.
    #[allow(clippy::too_many_arguments)]
    pub fn fbm(&self, x: f32, y: f32, octaves: u32, persistence: f32, lacunarity: f32, warp: f32) -> f32 {
        let (x, y) = if warp > 0.0 {
            let wx = x + self.noise2d(x * 0.5 + 100.0, y * 0.5 + 100.0) * warp;
            let wy = y + self.noise2d(x * 0.5 - 100.0, y * 0.5 - 100.0) * warp;
            (wx, wy)
        } else {
            (x, y)
        };

        let mut total = 0.0f32;
        let mut amplitude = 1.0f32;
        let mut frequency = 1.0f32;
        let mut amplitude_sum = 0.0f32;

        for _ in 0..octaves {
            total += self.noise2d(x * frequency, y * frequency) * amplitude;
            amplitude_sum += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }

        if amplitude_sum > 0.0 {
            total / amplitude_sum
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_same_seed() {
        let mut p1 = Prng::new(5);
        let mut p2 = Prng::new(5);
        let n1 = Noise::new(&mut p1);
        let n2 = Noise::new(&mut p2);
        for i in 0..50 {
            let x = i as f32 * 0.37;
            let y = i as f32 * 0.61;
            assert_eq!(n1.noise2d(x, y), n2.noise2d(x, y));
        }
    }

    #[test]
    fn stays_roughly_bounded() {
        let mut p = Prng::new(123);
        let n = Noise::new(&mut p);
        for i in 0..500 {
            let v = n.noise2d(i as f32 * 0.1, (i * 3) as f32 * 0.1);
            assert!(v.abs() <= 1.5, "noise escaped expected range: {v}");
        }
    }

    #[test]
    fn fbm_is_normalized() {
        let mut p = Prng::new(8);
        let n = Noise::new(&mut p);
        for i in 0..200 {
            let v = n.fbm(i as f32 * 0.05, i as f32 * 0.03, 5, 0.5, 2.0, 0.0);
            assert!(v.abs() <= 1.5, "fbm escaped expected range: {v}");
        }
    }
}
