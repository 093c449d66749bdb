//! Steps 4-5 of world generation: temperature and moisture fields.

use rayon::prelude::*;

use crate::core::types::{MAP_H, MAP_W};
use crate::noise::Noise;

fn latitude(y: usize) -> f32 {
    (y as f32 / (MAP_H - 1) as f32) * 2.0 - 1.0
}

/// Step 4. A latitude-driven base temperature, cooled by elevation on land,
/// warmed slightly over ocean (thermal inertia), plus high-frequency jitter.
pub fn temperature(elevation: &[f32], noise: &Noise) -> Vec<f32> {
    let mut field = vec![0.0f32; MAP_W * MAP_H];
    field.par_chunks_mut(MAP_W).enumerate().for_each(|(y, row)| {
        let lat = latitude(y);
        let base = 1.0 - 1.3 * lat.abs();
        for (x, cell) in row.iter_mut().enumerate() {
            let e = elevation[y * MAP_W + x];
            let mut t = base;
            if e > 0.0 {
                t -= 0.45 * e;
            } else {
                t += 0.12;
            }
            let nx = x as f32 / MAP_W as f32;
            let ny = y as f32 / MAP_H as f32;
            t += 0.08 * noise.noise2d(nx * 8.0, ny * 8.0);
            *cell = t.clamp(-1.0, 1.0);
        }
    });
    field
}

/// Step 5. Precipitation from fBm, scaled down toward the poles, lifted
/// near the coast, cast in a rain shadow by high elevation, and forced to
/// a constant over open ocean.
pub fn moisture(elevation: &[f32], noise: &Noise) -> Vec<f32> {
    let mut field = vec![0.0f32; MAP_W * MAP_H];
    field.par_chunks_mut(MAP_W).enumerate().for_each(|(y, row)| {
        let lat = latitude(y);
        for (x, cell) in row.iter_mut().enumerate() {
            let e = elevation[y * MAP_W + x];
            let nx = x as f32 / MAP_W as f32;
            let ny = y as f32 / MAP_H as f32;
            let mut precip = ((noise.fbm(nx * 5.0, ny * 5.0, 5, 0.55, 2.1, 0.0) + 1.0) / 2.0)
                * (1.2 - 0.6 * lat.abs());

            if e > 0.0 && e < 0.15 {
                precip += 0.25;
            }
            if e > 0.5 {
                precip *= 0.5;
            }
            if e <= 0.0 {
                precip = 0.6;
            }
            *cell = precip.clamp(0.0, 1.2);
        }
    });
    field
}
