use super::ids::{BettorId, RaceId, RacerId, WagerId};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payout multiplier stored in hundredths, so `amount × odds` stays in integer coins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(from = "f64", into = "f64")]
pub struct Odds(u32);

impl Odds {
    pub const EVEN: Odds = Odds(100);

    pub fn from_hundredths(hundredths: u32) -> Self {
        Odds(hundredths)
    }

    /// Round a decimal multiplier (e.g. 2.7) to the nearest hundredth.
    pub fn from_multiplier(multiplier: f64) -> Self {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Odds(0);
        }
        Odds((multiplier * 100.0).round().min(u32::MAX as f64) as u32)
    }

    pub fn hundredths(&self) -> u32 {
        self.0
    }

    pub fn multiplier(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// `amount × odds`, floored to whole coins.
    pub fn apply(&self, amount: u64) -> u64 {
        let raw = amount as u128 * self.0 as u128 / 100;
        raw.min(u64::MAX as u128) as u64
    }
}

impl From<f64> for Odds {
    fn from(v: f64) -> Self {
        Odds::from_multiplier(v)
    }
}

impl From<Odds> for f64 {
    fn from(o: Odds) -> Self {
        o.multiplier()
    }
}

impl fmt::Display for Odds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}x", self.multiplier())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WagerKind {
    /// Pays only if the racer wins
    #[default]
    Win,
    /// Pays if the racer finishes within the top `top` positions
    Place { top: u16 },
}

impl WagerKind {
    pub fn pays_at(&self, position: u16) -> bool {
        match self {
            WagerKind::Win => position == 1,
            WagerKind::Place { top } => position >= 1 && position <= *top,
        }
    }
}

/// A bettor's stake on one racer. Immutable once placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Wager {
    pub id: WagerId,
    pub bettor: BettorId,
    pub race_id: RaceId,
    pub racer_id: RacerId,
    pub amount: u64,
    /// Odds snapshot at placement time
    pub odds: Odds,
    #[serde(default)]
    pub kind: WagerKind,
}

impl Wager {
    pub fn win(
        id: WagerId,
        bettor: BettorId,
        race_id: RaceId,
        racer_id: RacerId,
        amount: u64,
        odds: Odds,
    ) -> Self {
        Self {
            id,
            bettor,
            race_id,
            racer_id,
            amount,
            odds,
            kind: WagerKind::Win,
        }
    }

    pub fn place(mut self, top: u16) -> Self {
        self.kind = WagerKind::Place { top };
        self
    }
}

/// Resolution of one wager. `amount` is 0 for a losing wager; the stake is the ledger's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Payout {
    pub wager_id: WagerId,
    pub bettor: BettorId,
    pub race_id: RaceId,
    pub racer_id: RacerId,
    pub won: bool,
    pub amount: u64,
}
