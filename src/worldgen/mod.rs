//! World generation pipeline (spec §4.3): elevation, climate, rivers, and
//! the coarse tile index, run in strict sequence — each step reads only
//! fields a prior step has already written.

mod climate;
mod elevation;
mod rivers;
mod tiles;

use serde::{Deserialize, Serialize};
use tracing::info_span;

use crate::core::types::{MAP_H, MAP_W, TILE_H, TILE_W};
use crate::noise::Noise;
use crate::prng::Prng;

pub use rivers::River;
pub use tiles::Tile;

/// The generated world. Immutable once built; `Simulation` and the AI only
/// ever read from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub seed: u32,
    pub elevation: Vec<f32>,
    pub temperature: Vec<f32>,
    pub moisture: Vec<f32>,
    pub river_mark: Vec<u8>,
    pub rivers: Vec<River>,
    pub tiles: Vec<Tile>,
}

impl World {
    pub fn tile(&self, x: u16, y: u16) -> &Tile {
        &self.tiles[y as usize * TILE_W + x as usize]
    }

    pub fn tile_at(&self, coord: crate::core::types::TileCoord) -> &Tile {
        &self.tiles[coord.index()]
    }
}

/// Runs the full generation pipeline for `seed`, consuming the master PRNG
/// for the permutation table and river source sampling. Every other step
/// is a pure function of `(x, y)` and runs over a `rayon` parallel
/// iterator; determinism survives because the only PRNG-touching phases
/// (permutation table, river tracing) stay strictly sequential.
pub fn generate(seed: u32, prng: &mut Prng) -> World {
    let noise = Noise::new(prng);

    let mut elevation = {
        let _span = info_span!("worldgen", phase = "base_elevation").entered();
        elevation::base_elevation(&noise)
    };
    {
        let _span = info_span!("worldgen", phase = "sea_level").entered();
        elevation::normalize_sea_level(&mut elevation);
    }
    {
        let _span = info_span!("worldgen", phase = "mountains").entered();
        elevation::apply_mountains(&mut elevation, &noise);
    }

    let temperature = {
        let _span = info_span!("worldgen", phase = "temperature").entered();
        climate::temperature(&elevation, &noise)
    };
    let moisture = {
        let _span = info_span!("worldgen", phase = "moisture").entered();
        climate::moisture(&elevation, &noise)
    };

    let (rivers, river_mark) = {
        let _span = info_span!("worldgen", phase = "rivers").entered();
        rivers::trace_rivers(&elevation, &moisture, prng)
    };

    let mut world_tiles = {
        let _span = info_span!("worldgen", phase = "tile_index").entered();
        let river_strength = tiles::river_strength_field(&rivers);
        tiles::build_tiles(&elevation, &temperature, &moisture, &river_strength)
    };
    {
        let _span = info_span!("worldgen", phase = "distance_to_coast").entered();
        tiles::distance_to_coast(&mut world_tiles);
    }

    debug_assert_eq!(elevation.len(), MAP_W * MAP_H);
    debug_assert_eq!(world_tiles.len(), TILE_W * TILE_H);

    World {
        seed,
        elevation,
        temperature,
        moisture,
        river_mark,
        rivers,
        tiles: world_tiles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_same_seed() {
        let mut p1 = Prng::new(1);
        let mut p2 = Prng::new(1);
        let w1 = generate(1, &mut p1);
        let w2 = generate(1, &mut p2);
        assert_eq!(w1.elevation, w2.elevation);
        assert_eq!(w1.temperature, w2.temperature);
        assert_eq!(w1.moisture, w2.moisture);
        assert_eq!(w1.tiles.len(), w2.tiles.len());
    }

    #[test]
    fn produces_some_land_and_ocean() {
        let mut p = Prng::new(0x1234_5678);
        let w = generate(0x1234_5678, &mut p);
        let land = w.tiles.iter().filter(|t| t.is_land).count();
        assert!(land > 0, "expected at least some land tiles");
        assert!(land < w.tiles.len(), "expected at least some ocean tiles");
    }

    #[test]
    fn tile_grid_has_expected_dimensions() {
        let mut p = Prng::new(7);
        let w = generate(7, &mut p);
        assert_eq!(w.tiles.len(), TILE_W * TILE_H);
        assert_eq!(w.elevation.len(), MAP_W * MAP_H);
    }
}
