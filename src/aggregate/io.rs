//! Persistence (spec §6). The dense world fields are never serialized —
//! they regenerate deterministically from `seed` — but everything that
//! feeds future randomness (the PRNG stream, the id counters) rides along
//! with the entity state, so a restored `Simulation` ticks forward on
//! exactly the same trajectory as the one that was saved.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::{IdGen, TileCoord};
use crate::prng::Prng;

use super::country::Country;
use super::simulation::{Simulation, Stats};
use super::tribe::Tribe;
use super::war::War;

const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveFile {
    pub version: u32,
    pub seed: u32,
    pub year: u32,
    pub tech_level: u32,
    pub tribes: Vec<Tribe>,
    pub countries: Vec<Country>,
    pub wars: Vec<War>,
    pub stats: Stats,
    pub ids: IdGen,
    pub prng: Prng,
    pub timestamp: u64,
}

/// Builds a `SaveFile` from the live simulation. `now_ms` is supplied by
/// the caller — the core never reads a wall clock, so this value is the
/// only place real time enters a save.
pub fn save(sim: &Simulation, now_ms: u64) -> SaveFile {
    SaveFile {
        version: SAVE_VERSION,
        seed: sim.world.seed,
        year: sim.year,
        tech_level: sim.tech_level,
        tribes: sim.tribes.clone(),
        countries: sim.countries.clone(),
        wars: sim.wars.clone(),
        stats: sim.stats,
        ids: sim.ids.clone(),
        prng: sim.prng.clone(),
        timestamp: now_ms,
    }
}

/// Validated entity state extracted from a `SaveFile`, ready to be spliced
/// into a freshly-regenerated `Simulation` for the same seed via
/// `Simulation::restore`.
pub struct LoadedState {
    pub year: u32,
    pub tech_level: u32,
    pub tribes: Vec<Tribe>,
    pub countries: Vec<Country>,
    pub wars: Vec<War>,
    pub stats: Stats,
    pub ids: IdGen,
    pub prng: Prng,
}

/// Validates ownership disjointness and that every id referenced by an
/// ally/enemy list or an active war resolves to a known country before
/// accepting the save. On any failure, returns `SimError::SaveCorrupt` and
/// touches nothing.
pub fn load(file: &SaveFile) -> Result<LoadedState> {
    if file.version != SAVE_VERSION {
        return Err(SimError::SaveCorrupt(format!("unsupported save version {}", file.version)));
    }

    let mut seen: HashSet<TileCoord> = HashSet::new();
    for t in &file.tribes {
        for &coord in &t.territories {
            if !seen.insert(coord) {
                return Err(SimError::SaveCorrupt(format!("tile {coord:?} owned by more than one entity")));
            }
        }
    }
    for c in &file.countries {
        for &coord in &c.territories {
            if !seen.insert(coord) {
                return Err(SimError::SaveCorrupt(format!("tile {coord:?} owned by more than one entity")));
            }
        }
    }

    let known_ids: HashSet<_> = file.countries.iter().map(|c| c.id).collect();
    for c in &file.countries {
        for ally in &c.allies {
            if !known_ids.contains(ally) {
                return Err(SimError::SaveCorrupt(format!("country {:?} references unknown ally {:?}", c.id, ally)));
            }
        }
        for enemy in &c.enemies {
            if !known_ids.contains(enemy) {
                return Err(SimError::SaveCorrupt(format!("country {:?} references unknown enemy {:?}", c.id, enemy)));
            }
        }
    }
    for w in &file.wars {
        if !known_ids.contains(&w.attacker) {
            return Err(SimError::SaveCorrupt(format!("war {:?} references unknown attacker {:?}", w.id, w.attacker)));
        }
        if !known_ids.contains(&w.defender) {
            return Err(SimError::SaveCorrupt(format!("war {:?} references unknown defender {:?}", w.id, w.defender)));
        }
    }

    Ok(LoadedState {
        year: file.year,
        tech_level: file.tech_level,
        tribes: file.tribes.clone(),
        countries: file.countries.clone(),
        wars: file.wars.clone(),
        stats: file.stats,
        ids: file.ids.clone(),
        prng: file.prng.clone(),
    })
}
