//! Progression tick: apply results, age, retire, replace.

use super::{morale, newcomer, retirement};
use crate::config::ProgressionPolicy;
use crate::error::{DerbyError, Result};
use crate::models::{RaceOutcome, Racer, RacerId, RetirementReason};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of one `advance` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionReport {
    /// Active roster after the tick, sorted by id (newcomers included)
    pub updated_roster: Vec<Racer>,
    /// Racers retired this tick, in their final state
    pub retirements: Vec<Racer>,
    pub newcomers: Vec<Racer>,
}

impl ProgressionReport {
    pub fn retired_ids(&self) -> Vec<RacerId> {
        self.retirements.iter().map(|r| r.id).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct LeagueManager {
    policy: ProgressionPolicy,
}

impl LeagueManager {
    pub fn new(policy: ProgressionPolicy) -> Self {
        Self { policy }
    }

    /// Run one progression tick over `roster`.
    ///
    /// Outcomes are applied in the order given. Retired racers in `roster`
    /// are skipped. Fails with `RosterUnderflow` before touching anything
    /// if the active roster is already under `min_roster_size`.
    pub fn advance(
        &self,
        roster: &[Racer],
        outcomes: &[RaceOutcome],
        seed: u64,
    ) -> Result<ProgressionReport> {
        let mut active: BTreeMap<RacerId, Racer> = BTreeMap::new();
        for racer in roster {
            if !racer.is_active() {
                tracing::warn!(racer_id = %racer.id, "retired racer passed to advance, ignoring");
                continue;
            }
            if active.insert(racer.id, racer.clone()).is_some() {
                tracing::warn!(racer_id = %racer.id, "duplicate racer passed to advance, keeping last");
            }
        }

        if active.len() < self.policy.min_roster_size {
            return Err(DerbyError::RosterUnderflow {
                available: active.len(),
                required: self.policy.min_roster_size,
            });
        }

        for outcome in outcomes {
            let field_size = outcome.results.len();
            for result in &outcome.results {
                match active.get_mut(&result.racer_id) {
                    Some(racer) => {
                        morale::apply_finish(racer, result.position, field_size, &self.policy)
                    }
                    None => tracing::warn!(
                        race_id = %outcome.race_id,
                        racer_id = %result.racer_id,
                        "result for racer outside the active roster, ignoring"
                    ),
                }
            }
        }

        for racer in active.values_mut() {
            morale::decay(racer, &self.policy);
            racer.age += 1;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        // one roll per racer in id order, whether or not it is used
        let mut retiring: Vec<(RacerId, RetirementReason)> = Vec::new();
        for racer in active.values() {
            let roll: f64 = rng.gen();
            if let Some(reason) = retirement::review(racer, &self.policy, roll) {
                retiring.push((racer.id, reason));
            }
        }

        let mut retirements = Vec::with_capacity(retiring.len());
        for (id, reason) in retiring {
            if let Some(mut racer) = active.remove(&id) {
                racer.retire(reason);
                tracing::info!(
                    racer_id = %racer.id,
                    name = %racer.name,
                    age = racer.age,
                    reason = ?reason,
                    "racer retired"
                );
                retirements.push(racer);
            }
        }

        let remaining: Vec<Racer> = active.values().cloned().collect();
        let average = newcomer::league_average(&remaining);
        let mut next_id = next_racer_id(roster);

        let mut newcomers = Vec::with_capacity(retirements.len());
        for retiree in &retirements {
            let racer = newcomer::generate(
                next_id,
                newcomer::successor_name(&retiree.name),
                retiree.owner_id,
                &self.policy.newcomer,
                average,
                &mut rng,
            );
            tracing::info!(
                racer_id = %racer.id,
                name = %racer.name,
                replaces = %retiree.id,
                "newcomer joined"
            );
            next_id = next_id.next();
            newcomers.push(racer);
        }

        let mut updated_roster = remaining;
        updated_roster.extend(newcomers.iter().cloned());
        updated_roster.sort_by_key(|r| r.id);

        Ok(ProgressionReport {
            updated_roster,
            retirements,
            newcomers,
        })
    }

    /// Generate `count` fresh racers to top up a short roster.
    ///
    /// Ids continue after the highest id in `roster`. The returned racers are
    /// not merged into anything; the caller persists them.
    pub fn recruit(&self, roster: &[Racer], count: usize, seed: u64) -> Vec<Racer> {
        let active: Vec<Racer> = roster.iter().filter(|r| r.is_active()).cloned().collect();
        let average = newcomer::league_average(&active);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut next_id = next_racer_id(roster);

        let mut recruits = Vec::with_capacity(count);
        for _ in 0..count {
            let racer = newcomer::generate(
                next_id,
                format!("Rookie {}", next_id),
                None,
                &self.policy.newcomer,
                average,
                &mut rng,
            );
            tracing::info!(racer_id = %racer.id, "racer recruited");
            next_id = next_id.next();
            recruits.push(racer);
        }
        recruits
    }
}

/// Ids are never reused, so retired racers count too.
fn next_racer_id(roster: &[Racer]) -> RacerId {
    roster
        .iter()
        .map(|r| r.id)
        .max()
        .map(|id| id.next())
        .unwrap_or(RacerId(1))
}

/// `LeagueManager::default().advance(..)`
pub fn advance(roster: &[Racer], outcomes: &[RaceOutcome], seed: u64) -> Result<ProgressionReport> {
    LeagueManager::default().advance(roster, outcomes, seed)
}
