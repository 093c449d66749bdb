//! Simulation configuration with documented constants.
//!
//! Map and tile-grid dimensions are design-fixed (see `core::types`); the
//! rates and thresholds collected here are the tunables from the tribe,
//! country, war and AI behaviors. Defaults reproduce the documented
//! behavior exactly; the struct exists so a driver (or a future balance
//! pass) can override them without touching the simulation code.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    // === TRIBE ===
    /// Per-year population growth factor, multiplied by `foodPotential`.
    pub tribe_growth_rate: f32,
    /// Per-year probability of a disease/famine event (10% population drop).
    pub tribe_disease_probability: f64,
    /// Population drop fraction on a disease/famine event.
    pub tribe_disease_severity: f32,
    /// Population floor below which a tribe is marked dead.
    pub tribe_death_population: u32,
    /// Base settlement-years threshold; actual threshold adds `20 * caution`.
    pub tribe_settlement_years_base: u32,
    /// Minimum habitability to settle.
    pub tribe_settlement_min_habitability: f32,
    /// Minimum population to settle.
    pub tribe_settlement_min_population: u32,
    /// Probability of immediate Country conversion on settling, when
    /// `ambition > 0.7`.
    pub tribe_settlement_civilize_probability: f64,
    /// Ambition threshold gating immediate civilize-on-settle.
    pub tribe_settlement_civilize_ambition: f32,
    /// Tick interval between territorial expansion attempts.
    pub tribe_expansion_interval_years: u32,
    /// Minimum population for a settled tribe to attempt expansion.
    pub tribe_expansion_min_population: u32,
    /// Territory count above which a settled tribe may roll to civilize.
    pub tribe_civilize_min_territories: usize,
    /// Population above which a settled tribe may roll to civilize.
    pub tribe_civilize_min_population: u32,
    /// Age above which a settled tribe may roll to civilize.
    pub tribe_civilize_min_age: u32,
    /// Per-year probability weight (multiplied by ambition) of civilizing
    /// once the territory/population/age gates are met.
    pub tribe_civilize_probability_factor: f64,
    /// Population above which a tribe may split.
    pub tribe_split_min_population: u32,
    /// Per-year probability of a split once eligible.
    pub tribe_split_probability: f64,
    /// Hard cap on the number of live tribes.
    pub tribe_max_count: usize,
    /// Per-year probability of a conflict roll for a settled tribe.
    pub tribe_conflict_probability: f64,
    /// Manhattan radius within which a conflict roll can find a victim.
    pub tribe_conflict_radius: u32,
    /// Population ratio required to absorb a weaker neighbor tribe.
    pub tribe_conflict_population_ratio: f32,
    /// Migration scan radius in tiles.
    pub migration_scan_radius: i32,
    /// Inclusive lower/upper bounds for the post-migration cooldown (years).
    pub migration_cooldown_range: (u32, u32),

    // === COUNTRY ===
    /// Population-capacity-to-population conversion factor.
    pub country_population_factor: f32,
    /// Per-year probability of a tech-level increase, rolled every
    /// `country_tech_interval_years` years.
    pub country_tech_probability: f64,
    /// Year interval between tech-increase rolls.
    pub country_tech_interval_years: u32,
    /// Leader age above which a death roll is attempted.
    pub country_leader_death_age: u32,
    /// Per-year probability of leader death once age-eligible.
    pub country_leader_death_probability: f64,
    /// Unrest threshold above which a new leader is revolutionary.
    pub country_revolutionary_unrest: f32,
    /// Year interval between country expansion attempts.
    pub country_expansion_interval_years: u32,
    /// Per-candidate-tile probability of annexing it during expansion.
    pub country_expansion_probability: f64,
    /// Minimum age before a country may declare war.
    pub country_war_min_age: u32,
    /// Per-year probability of a war-declaration roll once eligible.
    pub country_war_probability: f64,
    /// Aggression threshold that alone justifies declaring war.
    pub country_war_aggression_threshold: f32,
    /// Territory ratio below which a weaker country is a war target.
    pub country_war_territory_ratio: f32,
    /// Population floor below which a country collapses.
    pub country_collapse_population: u32,

    // === WAR ===
    /// Combat-roll threshold below which the attacker wins the tick's battle,
    /// scaled by attacker advantage.
    pub war_attacker_win_roll_scale: f32,
    /// Combat-roll threshold above which the defender wins the tick's battle.
    pub war_defender_win_roll: f32,
    /// Inclusive lower/upper bounds on per-tick casualty fraction.
    pub war_casualty_range: (f32, f32),
    /// Probability of an annexation attempt on an attacker battle win.
    pub war_annexation_probability: f64,
    /// Exhaustion gained by the attacker each tick a war is active.
    pub war_attacker_exhaustion_rate: f32,
    /// Exhaustion gained by the defender each tick a war is active.
    pub war_defender_exhaustion_rate: f32,
    /// Defender population floor below which the attacker wins the war.
    pub war_defender_collapse_population: u32,
    /// Defender territory-count floor below which the attacker wins the war.
    pub war_defender_collapse_territories: usize,
    /// Attacker population floor below which the defender wins the war.
    pub war_attacker_collapse_population: u32,
    /// Exhaustion level at which the less-exhausted side wins.
    pub war_exhaustion_limit: f32,
    /// Maximum tiles transferred to the victor at war's end.
    pub war_max_territory_transfer: usize,

    // === AI ===
    /// Year interval between AI action rolls for each country.
    pub ai_action_interval_years: u32,
    /// Per-tick decay applied to the AI's global tension scalar.
    pub ai_global_tension_decay: f32,
    /// Ally-count ceiling above which `seekAlliance` gets zero weight.
    pub ai_max_allies: usize,
    /// Unrest threshold above which `improveStability` is strongly weighted.
    pub ai_high_unrest_threshold: f32,
    /// Unrest reduction applied by `improveStability`.
    pub ai_stability_unrest_reduction: f32,
    /// Territory count above which `expand`'s weight floors to zero instead
    /// of 0.1 when no adjacent unclaimed tile exists.
    pub ai_expansion_saturation_territories: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tribe_growth_rate: 0.02,
            tribe_disease_probability: 0.01,
            tribe_disease_severity: 0.1,
            tribe_death_population: 10,
            tribe_settlement_years_base: 20,
            tribe_settlement_min_habitability: 0.4,
            tribe_settlement_min_population: 100,
            tribe_settlement_civilize_probability: 0.4,
            tribe_settlement_civilize_ambition: 0.7,
            tribe_expansion_interval_years: 5,
            tribe_expansion_min_population: 150,
            tribe_civilize_min_territories: 5,
            tribe_civilize_min_population: 400,
            tribe_civilize_min_age: 50,
            tribe_civilize_probability_factor: 0.03,
            tribe_split_min_population: 500,
            tribe_split_probability: 0.05,
            tribe_max_count: 600,
            tribe_conflict_probability: 0.02,
            tribe_conflict_radius: 2,
            tribe_conflict_population_ratio: 1.3,
            migration_scan_radius: 2,
            migration_cooldown_range: (15, 35),

            country_population_factor: 0.03,
            country_tech_probability: 0.4,
            country_tech_interval_years: 50,
            country_leader_death_age: 65,
            country_leader_death_probability: 0.05,
            country_revolutionary_unrest: 70.0,
            country_expansion_interval_years: 15,
            country_expansion_probability: 0.3,
            country_war_min_age: 30,
            country_war_probability: 0.03,
            country_war_aggression_threshold: 0.6,
            country_war_territory_ratio: 0.5,
            country_collapse_population: 50,

            war_attacker_win_roll_scale: 0.6,
            war_defender_win_roll: 0.7,
            war_casualty_range: (0.001, 0.005),
            war_annexation_probability: 0.3,
            war_attacker_exhaustion_rate: 0.05,
            war_defender_exhaustion_rate: 0.03,
            war_defender_collapse_population: 100,
            war_defender_collapse_territories: 2,
            war_attacker_collapse_population: 200,
            war_exhaustion_limit: 1.0,
            war_max_territory_transfer: 3,

            ai_action_interval_years: 5,
            ai_global_tension_decay: 0.01,
            ai_max_allies: 3,
            ai_high_unrest_threshold: 50.0,
            ai_stability_unrest_reduction: 10.0,
            ai_expansion_saturation_territories: 50,
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate internal consistency. Rejects rate/probability fields
    /// outside their documented ranges and orderings that would make the
    /// termination/collapse logic contradictory.
    pub fn validate(&self) -> Result<(), String> {
        if self.war_defender_collapse_population >= self.war_attacker_collapse_population {
            return Err(format!(
                "war_defender_collapse_population ({}) should be < war_attacker_collapse_population ({})",
                self.war_defender_collapse_population, self.war_attacker_collapse_population
            ));
        }
        if self.migration_cooldown_range.0 > self.migration_cooldown_range.1 {
            return Err("migration_cooldown_range must be (low <= high)".into());
        }
        if self.war_casualty_range.0 > self.war_casualty_range.1 {
            return Err("war_casualty_range must be (low <= high)".into());
        }
        for (name, p) in [
            ("tribe_disease_probability", self.tribe_disease_probability),
            ("tribe_split_probability", self.tribe_split_probability),
            ("tribe_conflict_probability", self.tribe_conflict_probability),
            ("country_tech_probability", self.country_tech_probability),
            ("country_leader_death_probability", self.country_leader_death_probability),
            ("country_expansion_probability", self.country_expansion_probability),
            ("country_war_probability", self.country_war_probability),
            ("war_annexation_probability", self.war_annexation_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(format!("{name} ({p}) must be within [0, 1]"));
            }
        }
        Ok(())
    }
}
