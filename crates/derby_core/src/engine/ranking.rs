//! Running and final race order
//!
//! Ranking key, in priority order:
//! 1. cumulative score, descending
//! 2. stamina, descending
//! 3. incident count, ascending
//! 4. racer id, ascending
//!
//! The key is total, so the order never depends on roster insertion order.

use crate::models::RacerId;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Standing {
    pub id: RacerId,
    pub score: f64,
    pub stamina: u8,
    pub incidents: u32,
}

pub fn compare(a: &Standing, b: &Standing) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.stamina.cmp(&a.stamina))
        .then_with(|| a.incidents.cmp(&b.incidents))
        .then_with(|| a.id.cmp(&b.id))
}

/// Racer ids from first to last.
pub fn rank(standings: &[Standing]) -> Vec<RacerId> {
    let mut sorted: Vec<&Standing> = standings.iter().collect();
    sorted.sort_by(|a, b| compare(a, b));
    sorted.into_iter().map(|s| s.id).collect()
}
