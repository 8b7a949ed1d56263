use crate::error::{DerbyError, Result};
use crate::models::{Payout, RaceOutcome, Wager};
use rayon::prelude::*;
use std::collections::HashSet;

/// Below this many wagers, settle sequentially.
const PARALLEL_THRESHOLD: usize = 64;

/// Settle every wager against `outcome`.
///
/// The whole call fails, and nothing is settled, if any wager belongs to a
/// different race or a wager id appears twice. Payouts come back in the
/// order of `wagers`.
pub fn resolve(outcome: &RaceOutcome, wagers: &[Wager]) -> Result<Vec<Payout>> {
    let mut seen = HashSet::with_capacity(wagers.len());
    for wager in wagers {
        if wager.race_id != outcome.race_id {
            return Err(DerbyError::OutcomeMismatch {
                wager: wager.id,
                wager_race: wager.race_id.clone(),
                outcome_race: outcome.race_id.clone(),
            });
        }
        if !seen.insert(wager.id) {
            return Err(DerbyError::DuplicateWager(wager.id));
        }
    }

    let payouts: Vec<Payout> = if wagers.len() > PARALLEL_THRESHOLD {
        wagers.par_iter().map(|w| settle(outcome, w)).collect()
    } else {
        wagers.iter().map(|w| settle(outcome, w)).collect()
    };

    tracing::debug!(
        race_id = %outcome.race_id,
        wagers = payouts.len(),
        winners = payouts.iter().filter(|p| p.won).count(),
        paid = payouts.iter().map(|p| p.amount).sum::<u64>(),
        "wagers resolved"
    );

    Ok(payouts)
}

/// Settle one wager. Assumes the race ids already match.
pub fn settle(outcome: &RaceOutcome, wager: &Wager) -> Payout {
    let won = match outcome.position_of(wager.racer_id) {
        Some(position) => wager.kind.pays_at(position),
        None => {
            tracing::warn!(
                wager_id = %wager.id,
                racer_id = %wager.racer_id,
                race_id = %outcome.race_id,
                "wager on racer who did not run, paying 0"
            );
            false
        }
    };

    Payout {
        wager_id: wager.id,
        bettor: wager.bettor,
        race_id: wager.race_id.clone(),
        racer_id: wager.racer_id,
        won,
        amount: if won { wager.odds.apply(wager.amount) } else { 0 },
    }
}
