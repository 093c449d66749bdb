//! Countries and cities (spec §3, §4.5).

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::{CityId, Color, CountryId, TileCoord};
use crate::prng::Prng;
use crate::worldgen::World;

use super::leader::Leader;
use super::territory::TerritoryIndex;
use super::tribe::Tribe;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub name: String,
    pub x: u16,
    pub y: u16,
    pub population: u32,
    pub is_capital: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
    pub color: Color,
    pub capital_x: u16,
    pub capital_y: u16,
    pub population: u32,
    pub age: u32,
    pub territories: Vec<TileCoord>,
    pub cities: Vec<City>,
    pub government: String,
    pub tech_level: u32,
    pub unrest: f32,
    pub at_war: bool,
    pub allies: Vec<CountryId>,
    pub enemies: Vec<CountryId>,
    pub leader: Leader,
}

impl Country {
    /// Formation copies tribe state and adds civilization scaffolding: a
    /// generated name, the initial government label, a capital at the
    /// tribe's former center, and zeroed unrest/relations.
    pub fn from_tribe(id: CountryId, first_city_id: CityId, tribe: &Tribe) -> Self {
        let capital = City {
            id: first_city_id,
            name: format!("{} City", tribe.culture),
            x: tribe.x,
            y: tribe.y,
            population: tribe.population,
            is_capital: true,
        };
        Self {
            id,
            name: format!("{} Civilization", tribe.culture),
            color: tribe.color,
            capital_x: tribe.x,
            capital_y: tribe.y,
            population: tribe.population,
            age: 0,
            territories: tribe.territories.clone(),
            cities: vec![capital],
            government: "tribal_confederation".to_string(),
            tech_level: tribe.tech_level,
            unrest: 0.0,
            at_war: false,
            allies: Vec::new(),
            enemies: Vec::new(),
            leader: tribe.leader.clone(),
        }
    }

    /// Ages the country and its leader, recomputes population from
    /// territory yield, and rolls the tech-advancement chance. Returns
    /// `true` if tech level advanced this tick (caller emits the event).
    pub fn age_grow_and_tech(&mut self, world: &World, config: &SimulationConfig, prng: &mut Prng) -> bool {
        self.age += 1;
        self.leader.age += 1;
        self.leader.years_in_power += 1;

        self.population = self
            .territories
            .iter()
            .map(|&t| {
                let tile = world.tile_at(t);
                (tile.population_capacity * 1000.0 * config.country_population_factor * tile.food_potential
                    * (1.0 + 0.1 * self.tech_level as f32))
                    .floor() as u32
            })
            .sum();

        if self.age % config.country_tech_interval_years == 0 && prng.next_bool(config.country_tech_probability) {
            self.tech_level += 1;
            return true;
        }
        false
    }

    /// `true` if the leader dies this tick. The caller performs
    /// succession (it needs a fresh `LeaderId`, which this type doesn't
    /// mint) using `self.unrest` to decide revolutionary traits.
    pub fn leader_death_roll(&self, config: &SimulationConfig, prng: &mut Prng) -> bool {
        self.leader.age > config.country_leader_death_age && prng.next_bool(config.country_leader_death_probability)
    }

    pub fn is_revolutionary_succession(&self, config: &SimulationConfig) -> bool {
        self.unrest > config.country_revolutionary_unrest
    }

    /// Every `country_expansion_interval_years` years, behaves like tribe
    /// expansion but without an ambition gate: each adjacent unclaimed
    /// land candidate is independently annexed with fixed probability.
    pub fn try_expand(&mut self, world: &World, territories: &mut TerritoryIndex, config: &SimulationConfig, prng: &mut Prng) {
        if self.age % config.country_expansion_interval_years != 0 {
            return;
        }
        let mut candidates: Vec<TileCoord> = self
            .territories
            .iter()
            .flat_map(|&t| (-1i32..=1).flat_map(move |dy| (-1i32..=1).map(move |dx| (dx, dy))).map(move |(dx, dy)| t.neighbor(dx, dy)))
            .filter(|c| !territories.is_claimed(*c) && world.tile_at(*c).is_land && !world.tile_at(*c).biome.is_unclaimable())
            .collect();
        candidates.sort_by_key(|c| (c.y, c.x));
        candidates.dedup();
        prng.shuffle(&mut candidates);

        for c in candidates {
            if prng.next_bool(config.country_expansion_probability) {
                self.territories.push(c);
                territories.claim_country(c, self.id);
            }
        }
    }

    /// `true` if this country should declare war on a bordering rival this
    /// tick, per the direct per-tick warfare roll (distinct from
    /// `CountryAI`'s weighted `declareWar` action).
    pub fn direct_war_roll(&self, target_territory_len: usize, config: &SimulationConfig, prng: &mut Prng) -> bool {
        self.age > config.country_war_min_age
            && !self.at_war
            && prng.next_bool(config.country_war_probability)
            && (self.leader.traits.aggression > config.country_war_aggression_threshold
                || (self.territories.len() as f32) < config.country_war_territory_ratio * target_territory_len as f32)
    }

    pub fn should_collapse(&self, config: &SimulationConfig) -> bool {
        self.population < config.country_collapse_population || self.territories.is_empty()
    }

    /// Tiles bordering (8-adjacent, X-wrapping) any tile another country
    /// owns, restricted to `other`'s own territory — used by `WarManager`
    /// annexation and by `CountryAI`'s `expand`/`declareWar` neighbor
    /// scans.
    pub fn is_adjacent_to(&self, other: &Country) -> bool {
        self.territories.iter().any(|t| other.territories.iter().any(|o| t.chebyshev(o) == 1))
    }
}
