//! Racer record: identity, attributes, morale, lifecycle status and career.

use super::attributes::{Archetype, Attributes};
use super::ids::RacerId;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const MORALE_MIN: f32 = -1.0;
pub const MORALE_MAX: f32 = 1.0;

/// Short-term form modifier in `MORALE_MIN..=MORALE_MAX`, neutral at 0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize, JsonSchema)]
#[serde(from = "f32", into = "f32")]
pub struct Morale(f32);

impl From<f32> for Morale {
    fn from(v: f32) -> Self {
        Morale::new(v)
    }
}

impl From<Morale> for f32 {
    fn from(m: Morale) -> Self {
        m.0
    }
}

impl Morale {
    pub const NEUTRAL: Morale = Morale(0.0);

    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::NEUTRAL;
        }
        Morale(value.clamp(MORALE_MIN, MORALE_MAX))
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    pub fn nudge(&mut self, delta: f32) {
        *self = Morale::new(self.0 + delta);
    }

    /// Move toward neutral by `rate` (0.0 = no decay, 1.0 = reset).
    pub fn decay(&mut self, rate: f32) {
        *self = Morale::new(self.0 * (1.0 - rate.clamp(0.0, 1.0)));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RetirementReason {
    /// Exceeded the league's maximum age
    Age,
    /// Placement rate stayed under the floor across the review window
    Performance,
    /// Random retirement roll
    Chance,
}

/// Lifecycle state. `Retired` is terminal and only reachable through league progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RacerStatus {
    #[default]
    Active,
    Retired { reason: RetirementReason },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct CareerRecord {
    pub races_run: u32,
    pub wins: u32,
    /// Finishes inside the place positions (wins included)
    pub placements: u32,
    /// Most recent finishing positions (1-based), oldest first
    #[serde(default)]
    pub recent_finishes: VecDeque<u16>,
}

impl CareerRecord {
    /// Record a finish. `window` bounds how many recent finishes are kept.
    pub fn record(&mut self, position: u16, place_positions: u16, window: usize) {
        self.races_run += 1;
        if position == 1 {
            self.wins += 1;
        }
        if position <= place_positions {
            self.placements += 1;
        }
        self.recent_finishes.push_back(position);
        while self.recent_finishes.len() > window {
            self.recent_finishes.pop_front();
        }
    }

    /// Share of recent finishes inside `place_positions`, or `None` with no history.
    pub fn recent_placement_rate(&self, place_positions: u16) -> Option<f32> {
        if self.recent_finishes.is_empty() {
            return None;
        }
        let placed = self
            .recent_finishes
            .iter()
            .filter(|p| **p <= place_positions)
            .count();
        Some(placed as f32 / self.recent_finishes.len() as f32)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Racer {
    pub id: RacerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<u64>,
    pub attributes: Attributes,
    #[serde(default)]
    pub archetype: Archetype,
    /// Elapsed progression ticks
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub morale: Morale,
    #[serde(default)]
    status: RacerStatus,
    #[serde(default)]
    pub career: CareerRecord,
}

impl Racer {
    pub fn new(id: RacerId, name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            id,
            name: name.into(),
            owner_id: None,
            attributes,
            archetype: Archetype::default(),
            age: 0,
            morale: Morale::NEUTRAL,
            status: RacerStatus::Active,
            career: CareerRecord::default(),
        }
    }

    pub fn with_archetype(mut self, archetype: Archetype) -> Self {
        self.archetype = archetype;
        self
    }

    pub fn with_owner(mut self, owner_id: u64) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn with_morale(mut self, morale: f32) -> Self {
        self.morale = Morale::new(morale);
        self
    }

    pub fn status(&self) -> RacerStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, RacerStatus::Active)
    }

    /// Attributes after the archetype modifier; what the simulator races on.
    pub fn effective_attributes(&self) -> Attributes {
        self.archetype.apply(&self.attributes)
    }

    /// Active -> Retired. Returns false if the racer was already retired.
    pub(crate) fn retire(&mut self, reason: RetirementReason) -> bool {
        if !self.is_active() {
            return false;
        }
        self.status = RacerStatus::Retired { reason };
        true
    }
}
