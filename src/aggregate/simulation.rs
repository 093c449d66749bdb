//! The tick loop (spec §4.8): owns every mutable collection and advances
//! the whole simulation one year at a time, in the mandatory phase order
//! tribes -> countries -> wars -> AI decay -> tech check.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{CountryId, IdGen, TileCoord, TribeId};
use crate::prng::Prng;
use crate::worldgen::{self, World};

use super::ai::{AiAction, CountryAi};
use super::country::Country;
use super::events::{EventKind, EventLog};
use super::io::LoadedState;
use super::territory::TerritoryIndex;
use super::tribe::Tribe;
use super::war::{tick_war, War, WarWinner};

/// Discrete playback speed: the interval a driver should wait between
/// ticks, in milliseconds. `Paused` never ticks on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speed {
    Paused,
    Speed1,
    Speed2,
    Speed3,
    Speed4,
}

impl Speed {
    pub fn tick_interval_ms(self) -> Option<u64> {
        match self {
            Speed::Paused => None,
            Speed::Speed1 => Some(2000),
            Speed::Speed2 => Some(600),
            Speed::Speed3 => Some(200),
            Speed::Speed4 => Some(50),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Stats {
    pub total_deaths: u32,
    pub total_wars: u32,
    pub total_civilizations: u32,
}

/// A compact summary for drivers that don't want the full entity lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    pub year: u32,
    pub tech_level: u32,
    pub tribe_count: usize,
    pub country_count: usize,
    pub war_count: usize,
    pub total_population: u64,
}

pub struct Simulation {
    pub world: World,
    pub year: u32,
    pub tribes: Vec<Tribe>,
    pub countries: Vec<Country>,
    pub wars: Vec<War>,
    pub tech_level: u32,
    pub territories: TerritoryIndex,
    pub ids: IdGen,
    pub prng: Prng,
    pub ai: CountryAi,
    pub events: EventLog,
    pub stats: Stats,
    pub config: SimulationConfig,
    speed: Speed,
}

/// Placement attempts budgeted per tribe during `initialize`.
const ATTEMPTS_PER_TRIBE: u32 = 100;
/// Minimum number of tribes `initialize` must place before giving up.
const MIN_TRIBES: u32 = 10;

/// Borrows two distinct elements of a slice mutably at once. Used wherever
/// a conflict, absorption, or war tick needs both sides by `&mut` — the
/// two indices are always known to differ before this is called.
fn get_two_mut<T>(v: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    assert_ne!(a, b);
    if a < b {
        let (left, right) = v.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = v.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

fn is_at_war_with(wars: &[War], a: CountryId, b: CountryId) -> bool {
    wars.iter().any(|w| (w.attacker == a && w.defender == b) || (w.attacker == b && w.defender == a))
}

impl Simulation {
    /// Runs world generation for `seed` and returns an uninitialized
    /// simulation (no tribes yet). Call `initialize` before ticking.
    pub fn new(seed: u32) -> Self {
        let mut prng = Prng::new(seed);
        let world = worldgen::generate(seed, &mut prng);
        Self {
            world,
            year: 0,
            tribes: Vec::new(),
            countries: Vec::new(),
            wars: Vec::new(),
            tech_level: 0,
            territories: TerritoryIndex::new(),
            ids: IdGen::new(),
            prng,
            ai: CountryAi::default(),
            events: EventLog::new(),
            stats: Stats::default(),
            config: SimulationConfig::default(),
            speed: Speed::Paused,
        }
    }

    /// Spawns `int(10..16)` tribes at habitable tiles, each placed by
    /// rejection sampling with a budget of `ATTEMPTS_PER_TRIBE` tries. If
    /// fewer than `MIN_TRIBES` could be placed the world is declared
    /// uninhabitable rather than silently starting understocked.
    pub fn initialize(&mut self) -> Result<()> {
        let target = self.prng.next_int(10, 16) as u32;
        let mut attempts = 0u32;
        let mut placed = 0u32;
        let budget = target * ATTEMPTS_PER_TRIBE;

        while placed < target && attempts < budget {
            attempts += 1;
            let x = self.prng.next_int(0, crate::core::types::TILE_W as i64) as u16;
            let y = self.prng.next_int(0, crate::core::types::TILE_H as i64) as u16;
            let coord = TileCoord::new(x, y);
            let tile = self.world.tile_at(coord);
            if !tile.is_land || tile.biome.is_unclaimable() || tile.habitability <= 0.0 || self.territories.is_claimed(coord) {
                continue;
            }

            let tribe_id = self.ids.next_tribe();
            let leader_id = self.ids.next_leader();
            let tribe = Tribe::new_random(tribe_id, leader_id, coord, &mut self.prng);
            self.territories.claim_tribe(coord, tribe_id);
            let event_id = self.ids.next_event();
            self.events.push(event_id, self.year, EventKind::TribeFormed, format!("{} emerges", tribe.culture), Some(coord));
            self.tribes.push(tribe);
            placed += 1;
        }

        if placed < MIN_TRIBES {
            return Err(SimError::WorldUninhabitable { seed: self.world.seed, attempts });
        }
        Ok(())
    }

    /// Regenerates the world for `seed` and splices in previously loaded
    /// entity state. The `TerritoryIndex` isn't persisted — it's rebuilt
    /// here from every tribe's and country's own `territories` list, which
    /// `io::load` already validated as disjoint.
    pub fn restore(seed: u32, state: LoadedState) -> Self {
        let mut sim = Self::new(seed);
        sim.year = state.year;
        sim.tech_level = state.tech_level;
        sim.stats = state.stats;
        sim.ids = state.ids;
        sim.prng = state.prng;
        sim.wars = state.wars;

        for t in &state.tribes {
            for &coord in &t.territories {
                sim.territories.claim_tribe(coord, t.id);
            }
        }
        for c in &state.countries {
            for &coord in &c.territories {
                sim.territories.claim_country(coord, c.id);
            }
        }
        sim.tribes = state.tribes;
        sim.countries = state.countries;
        sim
    }

    pub fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn should_tick(&self, elapsed_ms_since_last_tick: u64) -> bool {
        match self.speed.tick_interval_ms() {
            None => false,
            Some(interval) => elapsed_ms_since_last_tick >= interval,
        }
    }

    pub fn get_state(&self) -> SimulationState {
        let total_population = self.tribes.iter().map(|t| t.population as u64).sum::<u64>()
            + self.countries.iter().map(|c| c.population as u64).sum::<u64>();
        SimulationState {
            year: self.year,
            tech_level: self.tech_level,
            tribe_count: self.tribes.len(),
            country_count: self.countries.len(),
            war_count: self.wars.len(),
            total_population,
        }
    }

    /// Advances the simulation by one year, running every phase in the
    /// mandatory order: tribes, countries, wars, AI global state, and
    /// (every 100 years) the tech-advancement check.
    pub fn tick(&mut self) {
        self.year += 1;
        self.tick_tribes();
        self.tick_countries();
        self.tick_wars();
        self.ai.decay(&self.config);
        if self.year % 100 == 0 {
            self.tick_tech_check();
        }
    }

    fn tick_tribes(&mut self) {
        let year = self.year;
        let original_len = self.tribes.len();
        let mut to_remove: HashSet<TribeId> = HashSet::new();
        let mut births: Vec<Tribe> = Vec::new();
        let mut to_civilize: Vec<TribeId> = Vec::new();

        for i in (0..original_len).rev() {
            let id = self.tribes[i].id;
            if to_remove.contains(&id) {
                continue;
            }

            let (dead, diseased) = self.tribes[i].age_and_grow(&self.world, &self.config, &mut self.prng);
            if diseased {
                let center = self.tribes[i].center();
                let culture = self.tribes[i].culture.clone();
                let eid = self.ids.next_event();
                self.events.push(eid, year, EventKind::PandemicStarted, format!("disease and famine strike the {culture} tribe"), Some(center));
            }
            if dead {
                to_remove.insert(id);
                self.stats.total_deaths += 1;
                let center = self.tribes[i].center();
                let culture = self.tribes[i].culture.clone();
                let eid = self.ids.next_event();
                self.events.push(eid, year, EventKind::Extinction, format!("the {culture} tribe dies out"), Some(center));
                continue;
            }

            if self.tribes[i].settled {
                self.tribes[i].try_expand(&self.world, &mut self.territories, &self.config, &mut self.prng);

                let ambition = self.tribes[i].leader.traits.ambition as f64;
                if self.tribes[i].civilize_eligible(&self.config)
                    && self.prng.next_bool(self.config.tribe_civilize_probability_factor * ambition)
                {
                    to_civilize.push(id);
                } else if self.tribes[i].should_split(&self.config) && self.prng.next_bool(self.config.tribe_split_probability) {
                    let new_id = self.ids.next_tribe();
                    let new_leader = self.ids.next_leader();
                    let child = self.tribes[i].split(new_id, new_leader, &mut self.prng);
                    let eid = self.ids.next_event();
                    self.events.push(eid, year, EventKind::TribeSplit, format!("{} splits off a new band", child.culture), Some(child.center()));
                    births.push(child);
                } else if self.prng.next_bool(self.config.tribe_conflict_probability) {
                    self.try_tribe_conflict(i, &mut to_remove);
                }
            } else if self.tribes[i].migration_cooldown > 0 {
                let (settled_now, civilize) = self.tribes[i].try_settle(&self.world, &self.config, &mut self.prng);
                if settled_now {
                    let center = self.tribes[i].center();
                    let culture = self.tribes[i].culture.clone();
                    let eid = self.ids.next_event();
                    self.events.push(eid, year, EventKind::Settlement, format!("{culture} settles permanently"), Some(center));
                    if civilize {
                        to_civilize.push(id);
                    }
                }
            } else {
                self.tribes[i].migrate(&self.world, &self.territories, &self.config, &mut self.prng);
            }
        }

        for id in to_civilize {
            if to_remove.contains(&id) {
                continue;
            }
            if let Some(idx) = self.tribes.iter().position(|t| t.id == id) {
                let tribe = &self.tribes[idx];
                let country_id = self.ids.next_country();
                let city_id = self.ids.next_city();
                let country = Country::from_tribe(country_id, city_id, tribe);
                self.territories.retag_tribe_to_country(&tribe.territories, country_id);
                let eid = self.ids.next_event();
                self.events.push(eid, year, EventKind::CivilizationFormed, format!("{} rises as a civilization", country.name), Some(tribe.center()));
                self.countries.push(country);
                self.stats.total_civilizations += 1;
                to_remove.insert(id);
            }
        }

        if !to_remove.is_empty() {
            self.tribes.retain(|t| !to_remove.contains(&t.id));
        }
        self.tribes.extend(births);

        if self.tribes.len() > self.config.tribe_max_count {
            self.tribes.truncate(self.config.tribe_max_count);
        }
    }

    /// Looks for a weaker settled tribe within `tribe_conflict_radius` and,
    /// if found, absorbs half its population and all of its territory.
    /// Marks the victim in `to_remove` rather than deleting it in place —
    /// the caller's loop is still iterating over a fixed original index
    /// range, and id-based deferred removal keeps that safe regardless of
    /// whether the victim sits before or after `i`.
    fn try_tribe_conflict(&mut self, i: usize, to_remove: &mut HashSet<TribeId>) {
        let id = self.tribes[i].id;
        let center = self.tribes[i].center();
        let population = self.tribes[i].population;
        let radius = self.config.tribe_conflict_radius;
        let ratio = self.config.tribe_conflict_population_ratio;

        let victim_idx = self.tribes.iter().position(|o| {
            o.id != id
                && !to_remove.contains(&o.id)
                && o.settled
                && center.manhattan(&o.center()) <= radius
                && population as f32 > o.population as f32 * ratio
        });

        let Some(j) = victim_idx else { return };
        let (attacker, victim) = get_two_mut(&mut self.tribes, i, j);
        let gained = victim.population / 2;
        attacker.population += gained;
        for &tile in &victim.territories {
            self.territories.release(tile);
            if !self.territories.is_claimed(tile) {
                self.territories.claim_tribe(tile, attacker.id);
                attacker.territories.push(tile);
            }
        }
        let victim_id = victim.id;
        let victim_culture = victim.culture.clone();
        to_remove.insert(victim_id);

        let eid = self.ids.next_event();
        self.events.push(eid, self.year, EventKind::Conquest, format!("{} absorbs the {victim_culture} tribe", self.tribes[i].culture), Some(center));
    }

    fn tick_countries(&mut self) {
        let year = self.year;
        let original_len = self.countries.len();
        let mut to_remove: HashSet<CountryId> = HashSet::new();

        for i in (0..original_len).rev() {
            let id = self.countries[i].id;
            if to_remove.contains(&id) {
                continue;
            }

            let advanced = self.countries[i].age_grow_and_tech(&self.world, &self.config, &mut self.prng);
            if advanced {
                let eid = self.ids.next_event();
                let name = self.countries[i].name.clone();
                self.events.push(eid, year, EventKind::TechAdvancement, format!("{name} advances its technology"), None);
            }

            if self.countries[i].should_collapse(&self.config) {
                to_remove.insert(id);
                let center = TileCoord::new(self.countries[i].capital_x, self.countries[i].capital_y);
                let name = self.countries[i].name.clone();
                self.territories.release_all(&self.countries[i].territories);
                let eid = self.ids.next_event();
                self.events.push(eid, year, EventKind::Collapse, format!("{name} collapses"), Some(center));
                continue;
            }

            if self.countries[i].leader_death_roll(&self.config, &mut self.prng) {
                let revolutionary = self.countries[i].is_revolutionary_succession(&self.config);
                let new_leader_id = self.ids.next_leader();
                let new_leader = self.countries[i].leader.succeed(new_leader_id, revolutionary, &mut self.prng);
                let name = self.countries[i].name.clone();
                self.countries[i].leader = new_leader;
                let eid = self.ids.next_event();
                self.events.push(eid, year, EventKind::LeaderDied, format!("{name} crowns a new leader"), None);
            }

            self.countries[i].try_expand(&self.world, &mut self.territories, &self.config, &mut self.prng);

            self.handle_country_actions(i, year);
        }

        if !to_remove.is_empty() {
            self.countries.retain(|c| !to_remove.contains(&c.id));
        }
    }

    /// One country's per-tick warfare/AI decision: the direct war roll
    /// (spec §4.5, distinct from the AI's weighted `declareWar` action)
    /// takes priority; otherwise, on an AI-interval year, the weighted
    /// action from `CountryAI::pick_action` runs.
    fn handle_country_actions(&mut self, i: usize, year: u32) {
        let id = self.countries[i].id;
        if self.countries[i].at_war {
            return;
        }

        let mut neighbor_ids: Vec<CountryId> = Vec::new();
        for (j, other) in self.countries.iter().enumerate() {
            if j != i && self.countries[i].is_adjacent_to(other) {
                neighbor_ids.push(other.id);
            }
        }

        if !neighbor_ids.is_empty() {
            let target_len = self.countries[i].territories.len();
            if self.countries[i].direct_war_roll(target_len, &self.config, &mut self.prng) {
                if let Some(&target) = self.prng.choice(&neighbor_ids) {
                    self.start_war(id, target, year);
                    return;
                }
            }
        }

        if self.countries[i].age % self.config.ai_action_interval_years != 0 {
            return;
        }

        let neighbors: Vec<(CountryId, bool, bool, bool)> = neighbor_ids
            .iter()
            .map(|&nid| {
                let other = self.countries.iter().find(|c| c.id == nid).unwrap();
                let allied = self.countries[i].allies.contains(&nid);
                let at_war = is_at_war_with(&self.wars, id, nid);
                let weaker = other.population < self.countries[i].population;
                (nid, allied, at_war, weaker)
            })
            .collect();

        let action = self.ai.pick_action(&self.countries[i], &self.world, &self.territories, &neighbors, &self.config, &mut self.prng);
        match action {
            AiAction::Expand => self.ai.expand(&mut self.countries[i], &self.world, &mut self.territories, &mut self.prng),
            AiAction::BuildCity => {
                let city_id = self.ids.next_city();
                if let Some(site) = self.ai.build_city(&mut self.countries[i], &self.world, city_id, &mut self.prng) {
                    let name = self.countries[i].name.clone();
                    let eid = self.ids.next_event();
                    self.events.push(eid, year, EventKind::CityFounded, format!("{name} founds a new city"), Some(site));
                }
            }
            AiAction::SeekAlliance => {
                if let Some(&ally) = self.prng.choice(&neighbor_ids) {
                    self.ai.seek_alliance(id, ally, &mut self.countries);
                    let eid = self.ids.next_event();
                    let name = self.countries.iter().find(|c| c.id == id).map(|c| c.name.clone()).unwrap_or_default();
                    self.events.push(eid, year, EventKind::AllianceFormed, format!("{name} forges an alliance"), None);
                }
            }
            AiAction::DeclareWar => {
                let target = neighbor_ids.iter().copied().find(|n| !self.countries[i].allies.contains(n));
                if let Some(target) = target {
                    self.start_war(id, target, year);
                }
            }
            AiAction::ImproveStability => self.ai.improve_stability(&mut self.countries[i], &self.config),
        }
    }

    fn start_war(&mut self, attacker: CountryId, defender: CountryId, year: u32) {
        let war_id = self.ids.next_war();
        self.wars.push(War::new(war_id, attacker, defender));
        self.stats.total_wars += 1;
        self.ai.mark_war_declared();

        let attacker_name = self.countries.iter().find(|c| c.id == attacker).map(|c| c.name.clone()).unwrap_or_default();
        let defender_name = self.countries.iter().find(|c| c.id == defender).map(|c| c.name.clone()).unwrap_or_default();
        for c in self.countries.iter_mut() {
            if c.id == attacker || c.id == defender {
                c.at_war = true;
            }
        }
        let eid = self.ids.next_event();
        self.events.push(eid, year, EventKind::WarDeclared, format!("{attacker_name} declares war on {defender_name}"), None);
    }

    fn tick_wars(&mut self) {
        let year = self.year;
        let mut ended: Vec<(usize, WarWinner)> = Vec::new();

        for wi in (0..self.wars.len()).rev() {
            let attacker_id = self.wars[wi].attacker;
            let defender_id = self.wars[wi].defender;
            let Some(ai) = self.countries.iter().position(|c| c.id == attacker_id) else {
                ended.push((wi, WarWinner::Defender));
                continue;
            };
            let Some(di) = self.countries.iter().position(|c| c.id == defender_id) else {
                ended.push((wi, WarWinner::Attacker));
                continue;
            };

            let (attacker, defender) = get_two_mut(&mut self.countries, ai, di);
            let result = tick_war(&mut self.wars[wi], attacker, defender, &mut self.territories, &self.config, &mut self.prng);

            if let Some(tile) = result.annexed {
                let attacker_name = attacker.name.clone();
                let eid = self.ids.next_event();
                self.events.push(eid, year, EventKind::TerritoryConquered, format!("{attacker_name} annexes a border tile"), Some(tile));
            }
            if let Some(winner) = result.ended {
                ended.push((wi, winner));
            }
        }

        // `ended` is already in descending `wi` order since the scan above
        // visits wars in reverse index order; removing highest-index-first
        // keeps every remaining index in `ended` valid as we go.
        for (wi, winner) in ended {
            let war = self.wars.remove(wi);
            let winner_name = match winner {
                WarWinner::Attacker => self.countries.iter().find(|c| c.id == war.attacker).map(|c| c.name.clone()),
                WarWinner::Defender => self.countries.iter().find(|c| c.id == war.defender).map(|c| c.name.clone()),
            }
            .unwrap_or_default();
            let eid = self.ids.next_event();
            self.events.push(eid, year, EventKind::WarEnded, format!("{winner_name} prevails"), None);
        }
    }

    /// Every 100 years, a global tech-advancement check (spec §4.8): if the
    /// aggregate civilization score clears the current tier's bar, the tech
    /// level rises and every living country is notified.
    fn tick_tech_check(&mut self) {
        let total_pop: u64 = self.tribes.iter().map(|t| t.population as u64).sum::<u64>()
            + self.countries.iter().map(|c| c.population as u64).sum::<u64>();
        let score = total_pop as f64 / 10_000.0
            + 10.0 * self.countries.len() as f64
            + 5.0 * self.stats.total_wars as f64;

        if score > self.tech_level as f64 * 1000.0 && self.tech_level < 10 && self.prng.next_bool(0.1) {
            self.tech_level += 1;
            for c in self.countries.iter_mut() {
                c.tech_level += 1;
            }
            let eid = self.ids.next_event();
            self.events.push(eid, self.year, EventKind::TechAdvancement, format!("the world enters tech tier {}", self.tech_level), None);
        }
    }
}
