//! Race simulator
//!
//! Pure function of (roster, map, seed). Each segment is evaluated for every
//! racer in ascending id order, so the random stream consumed per racer is
//! fixed by id and never by how the caller ordered the roster.
//!
//! Per-segment delta:
//!
//! ```text
//! requirement = Σ weight(attr) × effective(attr) / Σ weight
//! delta       = length/100 × requirement
//!               × (1 + noise)                          noise ∈ [-perturbation, +perturbation]
//!               × (1 + morale × morale_weight)
//!               × (1 - fatigue_weight × progress × (1 - stamina/100))
//! ```
//!
//! Hazards then roll one incident check per racer; an incident subtracts a
//! penalty from that segment's delta.

use super::commentary::{detect_overtakes, order_segment_events};
use super::ranking::{rank, Standing};
use crate::config::SimulationParams;
use crate::error::{Result, SetupIssue};
use crate::models::{
    Attribute, Attributes, CommentaryEvent, EventPayload, Map, RaceId, RaceOutcome, Racer,
    RacerId, RacerResult, Segment,
};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::{HashMap, HashSet};

pub const MIN_FIELD_SIZE: usize = 2;
/// Finishing positions are `u16`.
pub const MAX_FIELD_SIZE: usize = u16::MAX as usize;

/// Per-racer state while a race is running.
#[derive(Debug, Clone)]
struct Runner {
    id: RacerId,
    attrs: Attributes,
    morale: f64,
    score: f64,
    incidents: u32,
    deltas: Vec<f64>,
}

impl Runner {
    fn standing(&self) -> Standing {
        Standing {
            id: self.id,
            score: self.score,
            stamina: self.attrs.stamina(),
            incidents: self.incidents,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RaceSimulator {
    params: SimulationParams,
}

impl RaceSimulator {
    pub fn new(params: SimulationParams) -> Self {
        Self { params }
    }

    /// Run one race to completion.
    ///
    /// Fails with `InvalidRaceSetup` before consuming any randomness if the
    /// parameters are out of bounds, the roster is too small or too large,
    /// contains a retired or duplicated racer, or the map is empty or malformed.
    pub fn simulate(
        &self,
        race_id: RaceId,
        roster: &[Racer],
        map: &Map,
        seed: u64,
    ) -> Result<RaceOutcome> {
        self.params
            .validate()
            .map_err(|e| SetupIssue::InvalidParams(e.to_string()))?;
        validate_setup(roster, map)?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut runners: Vec<Runner> = roster
            .iter()
            .map(|r| Runner {
                id: r.id,
                attrs: r.effective_attributes(),
                morale: r.morale.value() as f64,
                score: 0.0,
                incidents: 0,
                deltas: Vec::with_capacity(map.len()),
            })
            .collect();
        runners.sort_by_key(|r| r.id);

        let total_length = map.total_length() as f64;
        let mut covered = 0.0_f64;
        let mut order = rank(&standings(&runners));
        let mut events: Vec<CommentaryEvent> = Vec::new();

        for (index, segment) in map.segments.iter().enumerate() {
            let length = segment.length as f64;
            let progress = (covered + length / 2.0) / total_length;
            let scores_before = scores(&runners);

            let entry = CommentaryEvent {
                segment: index,
                racers: vec![order[0]],
                payload: EventPayload::SegmentEntered {
                    segment_kind: segment.kind,
                    length: segment.length,
                    leader: order[0],
                },
            };

            let mut segment_events = Vec::new();
            for runner in runners.iter_mut() {
                let mut delta = self.performance_delta(segment, runner, progress, &mut rng);

                if segment.is_hazard() {
                    if let Some(event) = self.roll_incident(index, segment, runner, &mut rng) {
                        if let EventPayload::Incident { penalty, .. } = event.payload {
                            delta -= penalty;
                        }
                        runner.incidents += 1;
                        segment_events.push(event);
                    }
                }

                runner.score += delta;
                runner.deltas.push(delta);
            }

            let next_order = rank(&standings(&runners));
            segment_events.extend(detect_overtakes(
                index,
                &order,
                &next_order,
                &scores_before,
                &scores(&runners),
            ));
            events.extend(order_segment_events(entry, segment_events));

            order = next_order;
            covered += length;
        }

        let last_segment = map.len() - 1;
        let by_id: HashMap<RacerId, &Runner> = runners.iter().map(|r| (r.id, r)).collect();
        let mut results = Vec::with_capacity(order.len());
        for (i, id) in order.iter().enumerate() {
            let runner = by_id[id];
            let position = i as u16 + 1;
            events.push(CommentaryEvent {
                segment: last_segment,
                racers: vec![*id],
                payload: EventPayload::Finish {
                    racer: *id,
                    position,
                    score: runner.score,
                },
            });
            results.push(RacerResult {
                racer_id: *id,
                position,
                score: runner.score,
                incidents: runner.incidents,
                segment_deltas: runner.deltas.clone(),
            });
        }

        tracing::debug!(
            race_id = %race_id,
            map_id = %map.id,
            seed,
            winner = %order[0],
            events = events.len(),
            "race simulated"
        );

        Ok(RaceOutcome {
            race_id,
            map_id: map.id.clone(),
            seed,
            finish_order: order,
            results,
            events,
        })
    }

    fn performance_delta(
        &self,
        segment: &Segment,
        runner: &Runner,
        progress: f64,
        rng: &mut ChaCha8Rng,
    ) -> f64 {
        let weights = &segment.difficulty;
        let total_weight = weights.total() as f64;
        let requirement: f64 = Attribute::ALL
            .iter()
            .map(|a| weights.weight(*a) as f64 * runner.attrs.get(*a) as f64)
            .sum::<f64>()
            / total_weight;

        let p = self.params.perturbation;
        let noise = rng.gen_range(-p..=p);
        let morale_factor = 1.0 + runner.morale * self.params.morale_weight;
        let stamina = runner.attrs.stamina() as f64 / 100.0;
        let fatigue = self.params.fatigue_weight * progress * (1.0 - stamina);

        segment.length as f64 / 100.0 * requirement * (1.0 + noise) * morale_factor * (1.0 - fatigue)
    }

    /// Always consumes exactly one draw, whatever the racer's attributes.
    fn roll_incident(
        &self,
        index: usize,
        segment: &Segment,
        runner: &Runner,
        rng: &mut ChaCha8Rng,
    ) -> Option<CommentaryEvent> {
        let model = &self.params.incident;
        let stamina = runner.attrs.stamina();
        let temperament = runner.attrs.temperament();
        let chance = model.probability(stamina, temperament, segment.threshold);
        let roll: f64 = rng.gen();
        if roll >= chance {
            return None;
        }

        let (stamina_deficit, temperament_deficit) =
            crate::config::IncidentModel::deficits(stamina, temperament, segment.threshold);
        Some(CommentaryEvent {
            segment: index,
            racers: vec![runner.id],
            payload: EventPayload::Incident {
                racer: runner.id,
                penalty: model.penalty_for(stamina_deficit, temperament_deficit),
                stamina_deficit,
                temperament_deficit,
            },
        })
    }
}

/// Simulate with default parameters.
pub fn simulate(race_id: RaceId, roster: &[Racer], map: &Map, seed: u64) -> Result<RaceOutcome> {
    RaceSimulator::default().simulate(race_id, roster, map, seed)
}

fn validate_setup(roster: &[Racer], map: &Map) -> std::result::Result<(), SetupIssue> {
    let mut seen = HashSet::with_capacity(roster.len());
    for racer in roster {
        if !racer.is_active() {
            return Err(SetupIssue::RetiredEntrant(racer.id));
        }
        if !seen.insert(racer.id) {
            return Err(SetupIssue::DuplicateEntrant(racer.id));
        }
    }
    if roster.len() > MAX_FIELD_SIZE {
        return Err(SetupIssue::TooManyRacers {
            found: roster.len(),
            max: MAX_FIELD_SIZE,
        });
    }
    if roster.len() < MIN_FIELD_SIZE {
        return Err(SetupIssue::TooFewRacers {
            found: roster.len(),
            required: MIN_FIELD_SIZE,
        });
    }
    map.validate()
}

fn standings(runners: &[Runner]) -> Vec<Standing> {
    runners.iter().map(Runner::standing).collect()
}

fn scores(runners: &[Runner]) -> HashMap<RacerId, f64> {
    runners.iter().map(|r| (r.id, r.score)).collect()
}
