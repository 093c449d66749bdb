//! Steps 7-8 of world generation: aggregate dense pixel fields into the
//! coarse tile grid, then compute each land tile's coastal distance.
//!
//! The pixel fields only specify elevation/temperature/moisture/rivers;
//! the derived resource and habitability numbers below (fertility, wood,
//! stone, metals, habitability, populationCapacity, diseaseRisk,
//! movementCost) are this implementation's own composition of those
//! fields, kept in one place so balance passes touch only this file.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::types::{Biome, ClimateZone, RiverPresence, MAP_H, MAP_W, TILE_H, TILE_W};

const STRIDE: usize = 2;
const PIXELS_PER_TILE_X: usize = MAP_W / TILE_W;
const PIXELS_PER_TILE_Y: usize = MAP_H / TILE_H;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub elevation: f32,
    pub temperature: f32,
    pub rainfall: f32,
    pub roughness: f32,
    pub is_land: bool,
    pub biome: Biome,
    pub climate_zone: ClimateZone,
    pub river_presence: RiverPresence,
    pub distance_to_coast: f32,
    pub fertility: f32,
    pub food_potential: f32,
    pub wood: f32,
    pub stone: f32,
    pub metals: f32,
    pub habitability: f32,
    pub population_capacity: f32,
    pub disease_risk: f32,
    pub movement_cost: f32,
}

fn biome_of(elevation: f32, temperature: f32, rainfall: f32) -> Biome {
    if elevation <= 0.0 {
        return Biome::Ocean;
    }
    if temperature < -0.5 {
        return Biome::Ice;
    }
    if temperature < -0.2 {
        return Biome::Tundra;
    }
    if elevation > 0.7 {
        return Biome::Alpine;
    }
    if rainfall < 0.2 {
        return Biome::Desert;
    }
    if rainfall < 0.4 {
        return if temperature > 0.3 { Biome::Savanna } else { Biome::Grassland };
    }
    if rainfall < 0.7 {
        return if temperature > 0.4 { Biome::Jungle } else { Biome::Forest };
    }
    if temperature > 0.5 {
        Biome::Jungle
    } else {
        Biome::Forest
    }
}

fn climate_zone_of(temperature: f32) -> ClimateZone {
    if temperature < -0.2 {
        ClimateZone::Polar
    } else if temperature > 0.35 {
        ClimateZone::Tropical
    } else {
        ClimateZone::Temperate
    }
}

fn fertility_of(biome: Biome, rainfall: f32) -> f32 {
    let base = match biome {
        Biome::Grassland => 0.9,
        Biome::Savanna => 0.7,
        Biome::Forest => 0.6,
        Biome::Jungle => 0.55,
        Biome::Tundra => 0.15,
        Biome::Desert => 0.05,
        Biome::Ocean | Biome::Ice | Biome::Alpine => 0.0,
    };
    (base * (rainfall / 1.2).clamp(0.0, 1.0)).clamp(0.0, 1.0)
}

fn resources_of(biome: Biome, elevation: f32, roughness: f32) -> (f32, f32, f32) {
    if matches!(biome, Biome::Ocean) {
        return (0.0, 0.0, 0.0);
    }
    let wood = match biome {
        Biome::Forest => 0.8,
        Biome::Jungle => 0.7,
        Biome::Savanna => 0.2,
        Biome::Grassland => 0.15,
        _ => 0.0,
    };
    let stone = (roughness * 1.5 + (elevation - 0.3).max(0.0)).clamp(0.0, 1.0);
    let metals = ((roughness + (elevation * 0.5).max(0.0)) * 0.8).clamp(0.0, 1.0);
    (wood, stone, metals)
}

#[allow(clippy::too_many_arguments)]
fn aggregate_one(
    elevation: &[f32],
    temperature: &[f32],
    moisture: &[f32],
    river_strength: &[f32],
    tx: usize,
    ty: usize,
) -> Tile {
    let x0 = tx * PIXELS_PER_TILE_X;
    let y0 = ty * PIXELS_PER_TILE_Y;

    let mut sum_e = 0.0f32;
    let mut sum_t = 0.0f32;
    let mut sum_m = 0.0f32;
    let mut min_e = f32::MAX;
    let mut max_e = f32::MIN;
    let mut count = 0usize;
    let mut max_river_strength = 0.0f32;

    let mut py = 0;
    while py < PIXELS_PER_TILE_Y {
        let mut px = 0;
        while px < PIXELS_PER_TILE_X {
            let x = x0 + px;
            let y = y0 + py;
            let idx = y * MAP_W + x;
            let e = elevation[idx];
            sum_e += e;
            sum_t += temperature[idx];
            sum_m += moisture[idx];
            min_e = min_e.min(e);
            max_e = max_e.max(e);
            count += 1;
            max_river_strength = max_river_strength.max(river_strength[idx]);
            px += STRIDE;
        }
        py += STRIDE;
    }

    let elevation_avg = sum_e / count as f32;
    let temperature_avg = sum_t / count as f32;
    let rainfall_avg = sum_m / count as f32;
    let roughness = max_e - min_e;
    let is_land = elevation_avg > 0.0;
    let biome = biome_of(elevation_avg, temperature_avg, rainfall_avg);

    let river_presence = if max_river_strength >= 0.5 {
        RiverPresence::Major
    } else if max_river_strength >= 0.2 {
        RiverPresence::Minor
    } else {
        RiverPresence::None
    };

    let fertility = fertility_of(biome, rainfall_avg);
    let (wood, stone, metals) = resources_of(biome, elevation_avg, roughness);

    let climate_comfort = (1.0 - temperature_avg.abs() * 0.5).clamp(0.0, 1.0);
    let food_potential = if is_land {
        (fertility * 0.7 + climate_comfort * 0.3).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let disease_risk = if is_land {
        (rainfall_avg * 0.4 + (1.0 - temperature_avg.abs()).max(0.0) * 0.25).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let habitability = if is_land && !biome.is_unclaimable() {
        (food_potential * 0.6 + climate_comfort * 0.25 + (1.0 - roughness).clamp(0.0, 1.0) * 0.15
            - disease_risk * 0.2)
            .clamp(0.0, 1.0)
    } else {
        0.0
    };

    let population_capacity = (habitability * 0.6 + food_potential * 0.4).clamp(0.0, 1.0);

    let movement_cost = 1.0
        + roughness * 3.0
        + match biome {
            Biome::Jungle => 0.5,
            Biome::Forest => 0.3,
            Biome::Alpine => 3.0,
            _ => 0.0,
        };

    Tile {
        elevation: elevation_avg,
        temperature: temperature_avg,
        rainfall: rainfall_avg,
        roughness,
        is_land,
        biome,
        climate_zone: climate_zone_of(temperature_avg),
        river_presence,
        distance_to_coast: 0.0,
        fertility,
        food_potential,
        wood,
        stone,
        metals,
        habitability,
        population_capacity,
        disease_risk,
        movement_cost,
    }
}

/// Step 7.
pub fn build_tiles(elevation: &[f32], temperature: &[f32], moisture: &[f32], river_strength: &[f32]) -> Vec<Tile> {
    (0..TILE_H * TILE_W)
        .into_par_iter()
        .map(|i| {
            let tx = i % TILE_W;
            let ty = i / TILE_W;
            aggregate_one(elevation, temperature, moisture, river_strength, tx, ty)
        })
        .collect()
}

/// Rasterizes each river's path at its strength into a dense per-pixel
/// field, taking the max where rivers share a pixel (confluences).
pub fn river_strength_field(rivers: &[super::rivers::River]) -> Vec<f32> {
    let mut field = vec![0.0f32; MAP_W * MAP_H];
    for river in rivers {
        for &(x, y) in &river.path {
            let idx = y as usize * MAP_W + x as usize;
            field[idx] = field[idx].max(river.strength);
        }
    }
    field
}

/// Step 8. For each land tile, the smallest Chebyshev ring (radius 1..=20)
/// containing a non-land tile, then the Euclidean distance to the nearest
/// such tile within that ring. X wraps (torus), Y does not extend past the
/// grid edge.
pub fn distance_to_coast(tiles: &mut [Tile]) {
    let snapshot: Vec<bool> = tiles.iter().map(|t| t.is_land).collect();

    let updates: Vec<(usize, f32)> = (0..TILE_H * TILE_W)
        .into_par_iter()
        .filter_map(|i| {
            if !snapshot[i] {
                return None;
            }
            let cx = (i % TILE_W) as i32;
            let cy = (i / TILE_W) as i32;

            for r in 1..=20i32 {
                let mut best: Option<f32> = None;
                for dy in -r..=r {
                    let y = cy + dy;
                    if y < 0 || y >= TILE_H as i32 {
                        continue;
                    }
                    for dx in -r..=r {
                        if dx.abs().max(dy.abs()) != r {
                            continue;
                        }
                        let x = (cx + dx).rem_euclid(TILE_W as i32);
                        let idx = y as usize * TILE_W + x as usize;
                        if !snapshot[idx] {
                            let dist = ((dx * dx + dy * dy) as f32).sqrt();
                            best = Some(best.map_or(dist, |b: f32| b.min(dist)));
                        }
                    }
                }
                if let Some(d) = best {
                    return Some((i, d));
                }
            }
            Some((i, 20.0))
        })
        .collect();

    for (i, d) in updates {
        tiles[i].distance_to_coast = d;
    }
}
