//! Tribes: the unsettled/settled population unit (spec §3, §4.4).

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::{Color, LeaderId, TileCoord, TribeId};
use crate::prng::Prng;
use crate::worldgen::World;

use super::leader::Leader;
use super::territory::TerritoryIndex;

const CULTURE_NAMES: &[&str] = &[
    "Varesh", "Tollan", "Keshari", "Ombor", "Nuvella", "Drask", "Ithaven", "Solmere", "Branhollow",
    "Ysgaroth",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tribe {
    pub id: TribeId,
    pub culture: String,
    pub color: Color,
    pub x: u16,
    pub y: u16,
    pub population: u32,
    pub age: u32,
    pub tech_level: u32,
    pub settled: bool,
    pub settlement_years: u32,
    pub migration_cooldown: u32,
    /// Ordered set of owned tiles. While unsettled, capped at 8 entries
    /// (oldest truncated) — settling "locks in" the cap.
    pub territories: Vec<TileCoord>,
    pub leader: Leader,
}

impl Tribe {
    pub fn new_random(id: TribeId, leader_id: LeaderId, center: TileCoord, prng: &mut Prng) -> Self {
        Self {
            id,
            culture: prng.choice(CULTURE_NAMES).cloned().unwrap_or("Unnamed").to_string(),
            color: Color::from_prng(prng),
            x: center.x,
            y: center.y,
            population: prng.next_int(20, 60) as u32,
            age: 0,
            tech_level: 0,
            settled: false,
            settlement_years: 0,
            migration_cooldown: 0,
            territories: vec![center],
            leader: Leader::new_random(leader_id, prng),
        }
    }

    pub fn center(&self) -> TileCoord {
        TileCoord::new(self.x, self.y)
    }

    fn current_tile_food_potential(&self, world: &World) -> f32 {
        world.tile(self.x, self.y).food_potential
    }

    /// Age, growth, and the disease/famine roll. Returns `(dead, diseased)`:
    /// `dead` is `true` if the tribe should be removed (population dropped
    /// below the floor), `diseased` is `true` if the disease/famine roll hit
    /// this tick, so the caller can emit an event for it.
    pub fn age_and_grow(&mut self, world: &World, config: &SimulationConfig, prng: &mut Prng) -> (bool, bool) {
        self.age += 1;
        let growth = (self.population as f32 * config.tribe_growth_rate * self.current_tile_food_potential(world)).round();
        self.population = (self.population as i64 + growth as i64).max(0) as u32;

        let diseased = prng.next_bool(config.tribe_disease_probability);
        if diseased {
            let drop = (self.population as f32 * config.tribe_disease_severity).round() as u32;
            self.population = self.population.saturating_sub(drop);
        }

        (self.population < config.tribe_death_population, diseased)
    }

    /// While resting at the current site (`migrationCooldown > 0`),
    /// decrements the cooldown and accrues settlement years; once the
    /// settle conditions are met it settles. Returns `true` if it newly
    /// settled this tick (caller emits the event), and separately whether
    /// it should immediately civilize into a Country. Call only when
    /// `migration_cooldown > 0`; otherwise the caller should `migrate`.
    pub fn try_settle(&mut self, world: &World, config: &SimulationConfig, prng: &mut Prng) -> (bool, bool) {
        debug_assert!(!self.settled);
        self.migration_cooldown = self.migration_cooldown.saturating_sub(1);
        self.settlement_years += 1;
        let habitability = world.tile(self.x, self.y).habitability;
        let threshold = config.tribe_settlement_years_base as f32 + 20.0 * self.leader.traits.caution;
        if self.settlement_years as f32 > threshold
            && habitability > config.tribe_settlement_min_habitability
            && self.population > config.tribe_settlement_min_population
        {
            self.settled = true;
            self.tech_level = self.tech_level.max(1);
            let civilize = self.leader.traits.ambition > config.tribe_settlement_civilize_ambition
                && prng.next_bool(config.tribe_settlement_civilize_probability);
            return (true, civilize);
        }
        (false, false)
    }

    /// Scans a radius-2 neighborhood, scores candidates per §4.4.1, and
    /// moves the tribe to one. Territories collapse to the single chosen
    /// tile; the migration cooldown and settlement clock reset.
    pub fn migrate(&mut self, world: &World, territories: &TerritoryIndex, config: &SimulationConfig, prng: &mut Prng) {
        let center = self.center();
        let mut candidates: Vec<(TileCoord, f32)> = Vec::new();
        let r = config.migration_scan_radius;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let coord = center.neighbor(dx, dy);
                if territories.is_claimed(coord) {
                    continue;
                }
                let tile = world.tile_at(coord);
                if !tile.is_land || tile.biome.is_unclaimable() {
                    continue;
                }
                let mut score = 100.0 * tile.habitability;
                score += match tile.river_presence {
                    crate::core::types::RiverPresence::Major => 50.0,
                    crate::core::types::RiverPresence::Minor => 25.0,
                    crate::core::types::RiverPresence::None => 0.0,
                };
                if tile.distance_to_coast < 2.0 {
                    score += 30.0;
                }
                if matches!(tile.biome, crate::core::types::Biome::Desert) {
                    score -= 40.0;
                }
                if matches!(tile.biome, crate::core::types::Biome::Ice | crate::core::types::Biome::Tundra) {
                    score -= 60.0;
                }
                if tile.roughness > 0.5 {
                    score -= 30.0;
                }
                candidates.push((coord, score));
            }
        }

        if candidates.is_empty() {
            return;
        }
        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());

        let chosen = if prng.next_bool(0.02 * if self.leader.traits.rationality < 0.3 { 1.0 } else { 0.0 }) {
            let worst_n = candidates.len().min(3);
            let idx = candidates.len() - prng.next_int(1, worst_n as i64 + 1) as usize;
            candidates[idx.min(candidates.len() - 1)].0
        } else {
            let top_n = (((1.0 - self.leader.traits.rationality) * 5.0).floor() as usize + 1).max(1).min(candidates.len());
            let idx = prng.next_int(0, top_n as i64) as usize;
            candidates[idx].0
        };

        self.x = chosen.x;
        self.y = chosen.y;
        self.territories = vec![chosen];
        self.migration_cooldown = prng.next_int(
            config.migration_cooldown_range.0 as i64,
            config.migration_cooldown_range.1 as i64 + 1,
        ) as u32;
        self.settlement_years = 0;
    }

    /// Per §4.4, every `tribe_expansion_interval_years` years once settled
    /// and populous enough, attempt one territorial expansion.
    pub fn try_expand(&mut self, world: &World, territories: &mut TerritoryIndex, config: &SimulationConfig, prng: &mut Prng) {
        if !self.settled || self.age % config.tribe_expansion_interval_years != 0 {
            return;
        }
        if self.population <= config.tribe_expansion_min_population {
            return;
        }

        let food = world.tile(self.x, self.y).food_potential;
        let wood = world.tile(self.x, self.y).wood;
        let fertility = world.tile(self.x, self.y).fertility;
        let resource_score = (food + wood + fertility) / 3.0;
        let pop_score = (self.population as f32 / 500.0).min(1.0);
        let probability = 0.5 * resource_score as f64 + 0.3 * pop_score as f64 + 0.2 * self.leader.traits.ambition as f64;

        if !prng.next_bool(probability) {
            return;
        }

        let mut order: Vec<TileCoord> = self
            .territories
            .iter()
            .flat_map(|&t| (-1i32..=1).flat_map(move |dy| (-1i32..=1).map(move |dx| (dx, dy))).map(move |(dx, dy)| t.neighbor(dx, dy)))
            .filter(|c| !territories.is_claimed(*c) && world.tile_at(*c).is_land && !world.tile_at(*c).biome.is_unclaimable())
            .collect();
        prng.shuffle(&mut order);

        if let Some(&pick) = order.first() {
            self.territories.push(pick);
            territories.claim_tribe(pick, self.id);
        }
    }

    /// `true` once the territory/population/age gates from §4.4's civilize
    /// check are met, rolled by the caller against
    /// `tribe_civilize_probability_factor * ambition`.
    pub fn civilize_eligible(&self, config: &SimulationConfig) -> bool {
        self.settled
            && self.territories.len() > config.tribe_civilize_min_territories
            && self.population > config.tribe_civilize_min_population
            && self.age > config.tribe_civilize_min_age
    }

    pub fn should_split(&self, config: &SimulationConfig) -> bool {
        self.population > config.tribe_split_min_population
    }

    /// Splits off half the population into a new tribe at the same
    /// location, same culture and tech level, migration-ready.
    pub fn split(&mut self, new_id: TribeId, new_leader_id: LeaderId, prng: &mut Prng) -> Tribe {
        let half = self.population / 2;
        self.population -= half;
        Tribe {
            id: new_id,
            culture: self.culture.clone(),
            color: self.color,
            x: self.x,
            y: self.y,
            population: half,
            age: 0,
            tech_level: self.tech_level,
            settled: false,
            settlement_years: 0,
            migration_cooldown: 0,
            territories: vec![self.center()],
            leader: Leader::new_random(new_leader_id, prng),
        }
    }
}
