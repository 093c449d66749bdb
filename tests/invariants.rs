//! Property tests for the universally-quantified invariants (spec §8).

use std::collections::HashSet;

use pangaea::aggregate::Simulation;
use pangaea::core::types::{Biome, TileCoord, MAP_H, MAP_W, TILE_H, TILE_W};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// For every tick sampled, no tile is claimed by more than one entity,
    /// and every claimed tile is land and not ocean/ice/alpine.
    #[test]
    fn ownership_stays_disjoint_and_land_only(seed in any::<u32>(), years in 0u32..60) {
        let mut sim = Simulation::new(seed);
        if sim.initialize().is_err() {
            return Ok(()); // uninhabitable seeds are outside this property's domain
        }
        for _ in 0..years {
            sim.tick();
        }

        let mut seen: HashSet<TileCoord> = HashSet::new();
        for t in sim.tribes.iter().flat_map(|t| t.territories.iter()).chain(sim.countries.iter().flat_map(|c| c.territories.iter())) {
            prop_assert!(seen.insert(*t), "tile {:?} claimed by more than one entity", t);
            let tile = sim.world.tile_at(*t);
            prop_assert!(tile.is_land, "claimed tile {:?} is not land", t);
            prop_assert!(!matches!(tile.biome, Biome::Ocean | Biome::Ice | Biome::Alpine), "claimed tile {:?} has unclaimable biome", t);
        }
    }

    /// Every surviving tribe/country clears its population floor; anything
    /// that dropped below it was removed in the same tick.
    #[test]
    fn population_floors_hold_at_end_of_tick(seed in any::<u32>(), years in 0u32..60) {
        let mut sim = Simulation::new(seed);
        if sim.initialize().is_err() {
            return Ok(());
        }
        for _ in 0..years {
            sim.tick();
        }
        for t in &sim.tribes {
            prop_assert!(t.population >= sim.config.tribe_death_population);
        }
        for c in &sim.countries {
            prop_assert!(c.population >= sim.config.country_collapse_population);
        }
    }

    /// `year` and every live entity's `age` only ever increase.
    #[test]
    fn year_and_ages_never_decrease(seed in any::<u32>()) {
        let mut sim = Simulation::new(seed);
        if sim.initialize().is_err() {
            return Ok(());
        }
        let mut last_year = sim.year;
        for _ in 0..30 {
            let ages_before: Vec<(_, u32)> = sim.tribes.iter().map(|t| (t.id, t.age)).collect();
            sim.tick();
            prop_assert!(sim.year > last_year);
            last_year = sim.year;
            for (id, age_before) in ages_before {
                if let Some(t) = sim.tribes.iter().find(|t| t.id == id) {
                    prop_assert!(t.age > age_before);
                }
            }
        }
    }

    /// Every id ever minted is unique and, per entity kind, strictly
    /// increasing in creation order.
    #[test]
    fn entity_ids_are_monotone_and_unique(seed in any::<u32>(), years in 0u32..60) {
        let mut sim = Simulation::new(seed);
        if sim.initialize().is_err() {
            return Ok(());
        }
        for _ in 0..years {
            sim.tick();
        }
        let mut tribe_ids: Vec<u64> = sim.tribes.iter().map(|t| t.id.0).collect();
        tribe_ids.sort_unstable();
        let before_dedup = tribe_ids.len();
        tribe_ids.dedup();
        prop_assert_eq!(tribe_ids.len(), before_dedup);

        let mut country_ids: Vec<u64> = sim.countries.iter().map(|c| c.id.0).collect();
        country_ids.sort_unstable();
        let before_dedup = country_ids.len();
        country_ids.dedup();
        prop_assert_eq!(country_ids.len(), before_dedup);
    }
}

#[test]
fn neighbor_lookups_wrap_x_and_clamp_y() {
    let origin = TileCoord::new(0, 0);
    for dx in -3i32..=3 {
        for dy in -3i32..=3 {
            let n = origin.neighbor(dx, dy);
            assert!((n.x as usize) < TILE_W);
            assert!((n.y as usize) < TILE_H);
        }
    }

    // X wraps (torus): stepping left from x=0 lands on the far edge.
    assert_eq!(origin.neighbor(-1, 0).x as usize, TILE_W - 1);

    // Y clamps rather than wraps.
    assert_eq!(origin.neighbor(0, -5).y, 0);
    let bottom = TileCoord::new(0, (TILE_H - 1) as u16);
    assert_eq!(bottom.neighbor(0, 5).y, (TILE_H - 1) as u16);
}

#[test]
fn pixel_grid_dimensions_match_tile_grid_ratio() {
    assert_eq!(MAP_W / TILE_W, MAP_H / TILE_H);
}
