//! Steps 1-3 of world generation: base elevation, sea-level normalization,
//! and ridged mountains.

use rayon::prelude::*;

use crate::core::types::{MAP_H, MAP_W};
use crate::noise::Noise;

fn latitude(y: usize) -> f32 {
    (y as f32 / (MAP_H - 1) as f32) * 2.0 - 1.0
}

/// Step 1. Each pixel's raw elevation is a blend of three fBm octave
/// groups at different scales, latitude-weighted so high latitudes trend
/// toward ocean and a narrow equatorial band gets an extra landmass boost.
pub fn base_elevation(noise: &Noise) -> Vec<f32> {
    let mut field = vec![0.0f32; MAP_W * MAP_H];
    field.par_chunks_mut(MAP_W).enumerate().for_each(|(y, row)| {
        let lat = latitude(y);
        let lat_weight = 1.0 - lat.abs().powf(1.5) * 0.3;
        for (x, cell) in row.iter_mut().enumerate() {
            let nx = x as f32 / MAP_W as f32;
            let ny = y as f32 / MAP_H as f32;

            let continental = noise.fbm(nx * 2.2, ny * 2.2, 5, 0.55, 2.1, 0.5);
            let terrain = noise.fbm(nx * 7.0, ny * 7.0, 5, 0.6, 2.0, 0.0);
            let detail = noise.fbm(nx * 20.0, ny * 20.0, 4, 0.5, 2.0, 0.0);

            let mut e = (0.60 * continental + 0.28 * terrain + 0.12 * detail) * lat_weight;
            if lat.abs() < 0.35 {
                e += 0.08 * (1.0 - lat.abs() / 0.35);
            }
            *cell = e;
        }
    });
    field
}

/// Step 2. Picks the 60th-percentile elevation as sea level, subtracts it,
/// and scales the result so land/ocean sign and magnitude both become
/// meaningful.
pub fn normalize_sea_level(elevation: &mut [f32]) {
    let mut sorted: Vec<f32> = elevation.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let idx = ((sorted.len() as f64) * 0.60) as usize;
    let sea_level = sorted[idx.min(sorted.len() - 1)];
    for e in elevation.iter_mut() {
        *e = (*e - sea_level) * 2.8;
    }
}

/// Step 3. Adds ridged-noise mountain ranges on top of existing land,
/// gated by a low-frequency continental mask so ranges cluster inland
/// rather than speckling every landmass edge.
pub fn apply_mountains(elevation: &mut [f32], noise: &Noise) {
    elevation.par_chunks_mut(MAP_W).enumerate().for_each(|(y, row)| {
        for (x, cell) in row.iter_mut().enumerate() {
            if *cell <= 0.08 {
                continue;
            }
            let nx = x as f32 / MAP_W as f32;
            let ny = y as f32 / MAP_H as f32;
            let ridge = noise.fbm(nx * 5.0, ny * 5.0, 4, 0.5, 2.2, 0.0);
            let mountain = 1.0 - ridge.abs();
            if mountain > 0.35 {
                let continental_mask = ((noise.fbm(nx * 0.6, ny * 0.6, 2, 0.6, 2.0, 0.0) + 1.0) * 0.5).clamp(0.0, 1.0);
                *cell += ((mountain - 0.35) / 0.65).powf(1.6) * 0.18 * continental_mask;
            }
        }
    });
}
