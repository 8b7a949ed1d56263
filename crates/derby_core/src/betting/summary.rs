use crate::models::{Payout, RaceId, RaceOutcome, RacerId, Wager};
use serde::{Deserialize, Serialize};

/// Race history entry written after settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceSummary {
    pub race_id: RaceId,
    pub winner: Option<RacerId>,
    pub participants: usize,
    pub wagers: usize,
    pub winning_wagers: usize,
    pub total_staked: u64,
    pub total_paid: u64,
}

impl RaceSummary {
    pub fn from_resolution(outcome: &RaceOutcome, wagers: &[Wager], payouts: &[Payout]) -> Self {
        Self {
            race_id: outcome.race_id.clone(),
            winner: outcome.winner(),
            participants: outcome.finish_order.len(),
            wagers: wagers.len(),
            winning_wagers: payouts.iter().filter(|p| p.won).count(),
            total_staked: wagers.iter().map(|w| w.amount).sum(),
            total_paid: payouts.iter().map(|p| p.amount).sum(),
        }
    }

    /// Stakes kept minus winnings paid. Negative when the house lost.
    pub fn house_net(&self) -> i64 {
        self.total_staked as i64 - self.total_paid as i64
    }
}
