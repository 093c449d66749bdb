//! Per-country decision policy, weighted by leader traits (spec §4.7).

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::{CityId, CountryId, TileCoord};
use crate::prng::Prng;
use crate::worldgen::World;

use super::country::{City, Country};
use super::territory::TerritoryIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiAction {
    Expand,
    BuildCity,
    SeekAlliance,
    DeclareWar,
    ImproveStability,
}

/// Tracks the AI layer's shared, cross-country mood. Decays every
/// simulation tick regardless of how many countries acted.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CountryAi {
    pub global_tension: f32,
}

impl CountryAi {
    pub fn decay(&mut self, config: &SimulationConfig) {
        self.global_tension = (self.global_tension - config.ai_global_tension_decay).max(0.0);
    }

    /// Picks one action for `country` by a weighted roll over neighbor
    /// summaries (`neighbors`: each bordering country's id, whether
    /// allied/at-war, and whether it is population-weaker).
    pub fn pick_action(
        &self,
        country: &Country,
        world: &World,
        territories: &TerritoryIndex,
        neighbors: &[(CountryId, bool, bool, bool)],
        config: &SimulationConfig,
        prng: &mut Prng,
    ) -> AiAction {
        let has_unclaimed_adjacent = country.territories.iter().any(|&t| {
            (-1i32..=1)
                .flat_map(|dy| (-1i32..=1).map(move |dx| (dx, dy)))
                .any(|(dx, dy)| {
                    let c = t.neighbor(dx, dy);
                    !territories.is_claimed(c) && world.tile_at(c).is_land && !world.tile_at(c).biome.is_unclaimable()
                })
        });

        let w_expand = if has_unclaimed_adjacent {
            0.5
        } else if country.territories.len() > config.ai_expansion_saturation_territories {
            0.0
        } else {
            0.1
        } * (1.0 + country.leader.traits.ambition);

        let w_city = if country.cities.len() < country.territories.len() / 10 {
            0.2
        } else {
            0.0
        };

        let has_non_allied_non_warring = neighbors.iter().any(|&(_, allied, at_war, _)| !allied && !at_war);
        let w_alliance = if country.allies.len() > config.ai_max_allies {
            0.0
        } else if has_non_allied_non_warring {
            0.15
        } else {
            0.05
        } * (1.0 + country.leader.traits.diplomacy);

        let weaker_neighbors = neighbors.iter().filter(|&&(_, _, _, weaker)| weaker).count();
        let w_war = if country.at_war || country.population < 500 || neighbors.is_empty() {
            0.0
        } else {
            (0.1 + 0.3 * self.global_tension + 0.2 * weaker_neighbors as f32)
                * (1.0 + country.leader.traits.aggression)
                * (1.0 - country.leader.traits.caution)
        };

        let w_stability = if country.unrest > config.ai_high_unrest_threshold { 0.4 } else { 0.05 };

        let weights = [
            (AiAction::Expand, w_expand),
            (AiAction::BuildCity, w_city),
            (AiAction::SeekAlliance, w_alliance),
            (AiAction::DeclareWar, w_war),
            (AiAction::ImproveStability, w_stability),
        ];
        let total: f32 = weights.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return AiAction::ImproveStability;
        }
        let roll = prng.next_f32() * total;
        let mut acc = 0.0;
        for (action, w) in weights {
            acc += w;
            if roll < acc {
                return action;
            }
        }
        AiAction::ImproveStability
    }

    pub fn expand(&self, country: &mut Country, world: &World, territories: &mut TerritoryIndex, prng: &mut Prng) {
        let mut candidates: Vec<TileCoord> = country
            .territories
            .iter()
            .flat_map(|&t| (-1i32..=1).flat_map(move |dy| (-1i32..=1).map(move |dx| (dx, dy))).map(move |(dx, dy)| t.neighbor(dx, dy)))
            .filter(|c| !territories.is_claimed(*c) && world.tile_at(*c).is_land && !world.tile_at(*c).biome.is_unclaimable())
            .collect();
        candidates.sort_by_key(|c| (c.y, c.x));
        candidates.dedup();
        if let Some(&pick) = prng.choice(&candidates) {
            country.territories.push(pick);
            territories.claim_country(pick, country.id);
        }
    }

    /// Returns the founding site if a city was actually added, so the
    /// caller can emit a `CityFounded` event there.
    pub fn build_city(&self, country: &mut Country, world: &World, next_city_id: CityId, prng: &mut Prng) -> Option<TileCoord> {
        let mut preferred: Vec<TileCoord> = country
            .territories
            .iter()
            .copied()
            .filter(|&t| {
                let tile = world.tile_at(t);
                tile.river_presence != crate::core::types::RiverPresence::None || tile.fertility > 0.5
            })
            .collect();
        if preferred.is_empty() {
            preferred = country.territories.clone();
        }
        if let Some(&site) = prng.choice(&preferred) {
            country.cities.push(City {
                id: next_city_id,
                name: format!("{} Outpost {}", country.name, country.cities.len() + 1),
                x: site.x,
                y: site.y,
                population: 0,
                is_capital: false,
            });
            return Some(site);
        }
        None
    }

    pub fn seek_alliance(&mut self, country_id: CountryId, ally_id: CountryId, countries: &mut [Country]) {
        if let Some(a) = countries.iter_mut().find(|c| c.id == country_id) {
            if !a.allies.contains(&ally_id) {
                a.allies.push(ally_id);
            }
        }
        if let Some(b) = countries.iter_mut().find(|c| c.id == ally_id) {
            if !b.allies.contains(&country_id) {
                b.allies.push(country_id);
            }
        }
    }

    pub fn mark_war_declared(&mut self) {
        self.global_tension = (self.global_tension + 0.1).min(1.0);
    }

    pub fn improve_stability(&self, country: &mut Country, config: &SimulationConfig) {
        country.unrest = (country.unrest - config.ai_stability_unrest_reduction).max(0.0);
    }
}
