//! Tuning parameters for simulation, progression and betting
//!
//! Every field has a serde default, so partially specified YAML files only
//! override what they name.

use super::{check_non_negative, check_unit};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

// ========== Simulation ==========

/// Incident model for hazard segments.
///
/// Chance grows linearly with the combined stamina + temperament deficit
/// below the segment threshold:
/// `p = clamp(base_chance + deficit_slope × deficit, 0, max_chance)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentModel {
    #[serde(default = "default_base_chance")]
    pub base_chance: f64,
    /// Added chance per point of deficit
    #[serde(default = "default_deficit_slope")]
    pub deficit_slope: f64,
    #[serde(default = "default_max_chance")]
    pub max_chance: f64,
    /// Flat score penalty for an incident
    #[serde(default = "default_penalty")]
    pub penalty: f64,
    /// Extra penalty per point of deficit
    #[serde(default = "default_penalty_per_deficit")]
    pub penalty_per_deficit: f64,
}

fn default_base_chance() -> f64 {
    0.02
}
fn default_deficit_slope() -> f64 {
    0.006
}
fn default_max_chance() -> f64 {
    0.5
}
fn default_penalty() -> f64 {
    10.0
}
fn default_penalty_per_deficit() -> f64 {
    0.1
}

impl Default for IncidentModel {
    fn default() -> Self {
        Self {
            base_chance: default_base_chance(),
            deficit_slope: default_deficit_slope(),
            max_chance: default_max_chance(),
            penalty: default_penalty(),
            penalty_per_deficit: default_penalty_per_deficit(),
        }
    }
}

impl IncidentModel {
    /// Combined stamina + temperament shortfall below `threshold`.
    pub fn deficits(stamina: u8, temperament: u8, threshold: u8) -> (u8, u8) {
        (
            threshold.saturating_sub(stamina),
            threshold.saturating_sub(temperament),
        )
    }

    pub fn probability(&self, stamina: u8, temperament: u8, threshold: u8) -> f64 {
        let (ds, dt) = Self::deficits(stamina, temperament, threshold);
        let deficit = ds as f64 + dt as f64;
        (self.base_chance + self.deficit_slope * deficit).clamp(0.0, self.max_chance)
    }

    pub fn penalty_for(&self, stamina_deficit: u8, temperament_deficit: u8) -> f64 {
        self.penalty + self.penalty_per_deficit * (stamina_deficit as f64 + temperament_deficit as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Relative random perturbation on each segment delta (0.15 = ±15%)
    #[serde(default = "default_perturbation")]
    pub perturbation: f64,
    /// Performance scale per unit of morale (0.1 = ±10% at the morale bounds)
    #[serde(default = "default_morale_weight")]
    pub morale_weight: f64,
    /// Late-race slowdown for low-stamina racers
    #[serde(default = "default_fatigue_weight")]
    pub fatigue_weight: f64,
    #[serde(default)]
    pub incident: IncidentModel,
    /// Largest field drawn for a single race
    #[serde(default = "default_max_field")]
    pub max_field: usize,
}

fn default_max_field() -> usize {
    8
}
fn default_perturbation() -> f64 {
    0.15
}
fn default_morale_weight() -> f64 {
    0.1
}
fn default_fatigue_weight() -> f64 {
    0.2
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            perturbation: default_perturbation(),
            morale_weight: default_morale_weight(),
            fatigue_weight: default_fatigue_weight(),
            incident: IncidentModel::default(),
            max_field: default_max_field(),
        }
    }
}

impl SimulationParams {
    /// Bounds check; the simulator runs this before drawing any randomness.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit("simulation.perturbation", self.perturbation)?;
        check_unit("simulation.morale_weight", self.morale_weight)?;
        check_unit("simulation.fatigue_weight", self.fatigue_weight)?;
        check_unit("simulation.incident.base_chance", self.incident.base_chance)?;
        check_unit("simulation.incident.max_chance", self.incident.max_chance)?;
        check_non_negative("simulation.incident.deficit_slope", self.incident.deficit_slope)?;
        check_non_negative("simulation.incident.penalty", self.incident.penalty)?;
        check_non_negative(
            "simulation.incident.penalty_per_deficit",
            self.incident.penalty_per_deficit,
        )?;
        if self.max_field < 2 {
            return Err(ConfigError::Validation(format!(
                "simulation.max_field must be >= 2, got {}",
                self.max_field
            )));
        }
        Ok(())
    }
}

// ========== Progression ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoraleParams {
    #[serde(default = "default_win_boost")]
    pub win_boost: f32,
    #[serde(default = "default_place_boost")]
    pub place_boost: f32,
    /// Applied to finishes in the bottom half of the field
    #[serde(default = "default_poor_finish_penalty")]
    pub poor_finish_penalty: f32,
    /// Fraction of morale lost toward neutral each tick
    #[serde(default = "default_morale_decay")]
    pub decay: f32,
}

fn default_win_boost() -> f32 {
    0.3
}
fn default_place_boost() -> f32 {
    0.1
}
fn default_poor_finish_penalty() -> f32 {
    0.2
}
fn default_morale_decay() -> f32 {
    0.25
}

impl Default for MoraleParams {
    fn default() -> Self {
        Self {
            win_boost: default_win_boost(),
            place_boost: default_place_boost(),
            poor_finish_penalty: default_poor_finish_penalty(),
            decay: default_morale_decay(),
        }
    }
}

/// Newcomer attribute distribution: Normal(mean, spread) clamped to [min, max].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewcomerParams {
    #[serde(default = "default_newcomer_mean")]
    pub mean: f64,
    #[serde(default = "default_newcomer_spread")]
    pub spread: f64,
    #[serde(default = "default_newcomer_min")]
    pub min: u8,
    #[serde(default = "default_newcomer_max")]
    pub max: u8,
    /// Pull of the league average on the mean (0 = ignore league, 1 = league average)
    #[serde(default = "default_league_bias")]
    pub league_bias: f64,
}

fn default_newcomer_mean() -> f64 {
    50.0
}
fn default_newcomer_spread() -> f64 {
    12.0
}
fn default_newcomer_min() -> u8 {
    20
}
fn default_newcomer_max() -> u8 {
    80
}
fn default_league_bias() -> f64 {
    0.5
}

impl Default for NewcomerParams {
    fn default() -> Self {
        Self {
            mean: default_newcomer_mean(),
            spread: default_newcomer_spread(),
            min: default_newcomer_min(),
            max: default_newcomer_max(),
            league_bias: default_league_bias(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionPolicy {
    /// Racers older than this (in ticks) retire
    #[serde(default = "default_max_age")]
    pub max_age: u32,
    /// Smallest roster that can still field a race
    #[serde(default = "default_min_roster_size")]
    pub min_roster_size: usize,
    /// Number of recent finishes kept for the performance review
    #[serde(default = "default_review_window")]
    pub review_window: usize,
    /// Races needed in the window before the performance review applies
    #[serde(default = "default_min_races_for_review")]
    pub min_races_for_review: usize,
    /// Placement rate below which a reviewed racer retires
    #[serde(default = "default_placement_floor")]
    pub placement_floor: f32,
    #[serde(default = "default_place_positions")]
    pub place_positions: u16,
    /// Per-tick chance an active racer retires regardless of record
    #[serde(default)]
    pub retirement_chance: f64,
    #[serde(default)]
    pub morale: MoraleParams,
    #[serde(default)]
    pub newcomer: NewcomerParams,
}

fn default_max_age() -> u32 {
    20
}
fn default_min_roster_size() -> usize {
    2
}
fn default_review_window() -> usize {
    10
}
fn default_min_races_for_review() -> usize {
    5
}
fn default_placement_floor() -> f32 {
    0.1
}
fn default_place_positions() -> u16 {
    3
}

impl Default for ProgressionPolicy {
    fn default() -> Self {
        Self {
            max_age: default_max_age(),
            min_roster_size: default_min_roster_size(),
            review_window: default_review_window(),
            min_races_for_review: default_min_races_for_review(),
            placement_floor: default_placement_floor(),
            place_positions: default_place_positions(),
            retirement_chance: 0.0,
            morale: MoraleParams::default(),
            newcomer: NewcomerParams::default(),
        }
    }
}

// ========== Betting ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BettingParams {
    /// Share of the pool the house keeps when quoting odds
    #[serde(default = "default_house_edge")]
    pub house_edge: f64,
    #[serde(default = "default_place_positions")]
    pub place_positions: u16,
    /// Opening balance for a bettor with no wallet yet
    #[serde(default = "default_wallet")]
    pub default_wallet: u64,
}

fn default_house_edge() -> f64 {
    0.1
}
fn default_wallet() -> u64 {
    100
}

impl Default for BettingParams {
    fn default() -> Self {
        Self {
            house_edge: default_house_edge(),
            place_positions: default_place_positions(),
            default_wallet: default_wallet(),
        }
    }
}
