//! Active wars and their per-tick resolution (spec §4.6).

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::{CountryId, TileCoord, WarId};
use crate::prng::Prng;

use super::country::Country;
use super::territory::TerritoryIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    AttackerWin,
    DefenderWin,
    Stalemate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarWinner {
    Attacker,
    Defender,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct War {
    pub id: WarId,
    pub attacker: CountryId,
    pub defender: CountryId,
    pub attacker_exhaustion: f32,
    pub defender_exhaustion: f32,
    pub attacker_casualties: u32,
    pub defender_casualties: u32,
}

impl War {
    pub fn new(id: WarId, attacker: CountryId, defender: CountryId) -> Self {
        Self {
            id,
            attacker,
            defender,
            attacker_exhaustion: 0.0,
            defender_exhaustion: 0.0,
            attacker_casualties: 0,
            defender_casualties: 0,
        }
    }
}

fn strength(country: &Country, is_defender: bool) -> f32 {
    let mut s = country.population as f32 * (1.0 + 0.1 * country.tech_level as f32) * (1.0 - country.unrest / 100.0);
    s *= if is_defender { 1.2 } else { 1.0 };
    s *= if is_defender {
        1.0 + 0.2 * country.leader.traits.caution
    } else {
        1.0 + 0.2 * country.leader.traits.aggression
    };
    s.max(1.0)
}

pub struct TickResult {
    pub battle: BattleOutcome,
    pub annexed: Option<TileCoord>,
    pub ended: Option<WarWinner>,
}

/// Advances one war by one year: combat roll, casualties, a possible
/// annexation on an attacker win, exhaustion accrual, then the ordered
/// termination check. Takes `attacker`/`defender` by mutable reference
/// directly — the caller is responsible for locating them in the
/// `Vec<Country>` roster (they may live at arbitrary indices).
pub fn tick_war(
    war: &mut War,
    attacker: &mut Country,
    defender: &mut Country,
    territories: &mut TerritoryIndex,
    config: &SimulationConfig,
    prng: &mut Prng,
) -> TickResult {
    let s_a = strength(attacker, false);
    let s_d = strength(defender, true);
    let advantage = s_a / (s_a + s_d);

    let roll = prng.next_f32();
    let battle = if roll < config.war_attacker_win_roll_scale * advantage {
        BattleOutcome::AttackerWin
    } else if roll > config.war_defender_win_roll {
        BattleOutcome::DefenderWin
    } else {
        BattleOutcome::Stalemate
    };

    let attacker_losses = (attacker.population as f32 * prng.next_range(config.war_casualty_range.0, config.war_casualty_range.1)) as u32;
    let defender_losses = (defender.population as f32 * prng.next_range(config.war_casualty_range.0, config.war_casualty_range.1)) as u32;
    attacker.population = attacker.population.saturating_sub(attacker_losses);
    defender.population = defender.population.saturating_sub(defender_losses);
    war.attacker_casualties += attacker_losses;
    war.defender_casualties += defender_losses;

    let mut annexed = None;
    if battle == BattleOutcome::AttackerWin && prng.next_bool(config.war_annexation_probability) {
        let mut border_tiles: Vec<TileCoord> = defender
            .territories
            .iter()
            .copied()
            .filter(|d| attacker.territories.iter().any(|a| d.chebyshev(a) == 1))
            .collect();
        border_tiles.sort_by_key(|c| (c.y, c.x));
        if let Some(&tile) = prng.choice(&border_tiles) {
            defender.territories.retain(|&t| t != tile);
            attacker.territories.push(tile);
            territories.release(tile);
            territories.claim_country(tile, attacker.id);
            annexed = Some(tile);
        }
    }

    war.attacker_exhaustion += config.war_attacker_exhaustion_rate;
    war.defender_exhaustion += config.war_defender_exhaustion_rate;

    let ended = if defender.population < config.war_defender_collapse_population
        || defender.territories.len() < config.war_defender_collapse_territories
    {
        Some(WarWinner::Attacker)
    } else if attacker.population < config.war_attacker_collapse_population {
        Some(WarWinner::Defender)
    } else if war.attacker_exhaustion > config.war_exhaustion_limit || war.defender_exhaustion > config.war_exhaustion_limit {
        Some(if war.attacker_exhaustion < war.defender_exhaustion {
            WarWinner::Attacker
        } else {
            WarWinner::Defender
        })
    } else {
        None
    };

    if let Some(winner) = ended {
        if winner == WarWinner::Attacker {
            let count = config.war_max_territory_transfer.min((0.3 * defender.territories.len() as f32).floor() as usize);
            let mut transferable: Vec<TileCoord> = defender.territories.clone();
            transferable.sort_by_key(|c| (c.y, c.x));
            for &tile in transferable.iter().take(count) {
                defender.territories.retain(|&t| t != tile);
                attacker.territories.push(tile);
                territories.release(tile);
                territories.claim_country(tile, attacker.id);
            }
        }
        attacker.at_war = false;
        defender.at_war = false;
    }

    TickResult { battle, annexed, ended }
}
