//! Equal-chance odds with a house edge.

use crate::models::{Odds, RacerId};
use std::collections::{BTreeMap, BTreeSet};

fn field_size(entrants: &[RacerId]) -> usize {
    entrants.iter().collect::<BTreeSet<_>>().len()
}

/// Win odds for every entrant: `(1 - house_edge) × n`.
///
/// Every entrant is priced as if equally likely to win. Duplicate ids count once.
pub fn calculate_odds(entrants: &[RacerId], house_edge: f64) -> BTreeMap<RacerId, Odds> {
    let n = field_size(entrants);
    let odds = Odds::from_multiplier((1.0 - house_edge) * n as f64);
    entrants.iter().map(|id| (*id, odds)).collect()
}

/// Place odds: win odds spread over the paying positions, never below even money.
pub fn place_odds(
    entrants: &[RacerId],
    place_positions: u16,
    house_edge: f64,
) -> BTreeMap<RacerId, Odds> {
    let n = field_size(entrants);
    if n == 0 {
        return BTreeMap::new();
    }
    let paying = (place_positions.max(1) as usize).min(n);
    let multiplier = ((1.0 - house_edge) * n as f64 / paying as f64).max(1.0);
    let odds = Odds::from_multiplier(multiplier);
    entrants.iter().map(|id| (*id, odds)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: u32) -> Vec<RacerId> {
        (1..=n).map(RacerId).collect()
    }

    #[test]
    fn test_win_odds_scale_with_field() {
        let odds = calculate_odds(&ids(4), 0.1);
        assert_eq!(odds.len(), 4);
        assert!(odds.values().all(|o| o.hundredths() == 360));

        let odds = calculate_odds(&ids(8), 0.1);
        assert_eq!(odds[&RacerId(8)].hundredths(), 720);

        assert!(calculate_odds(&[], 0.1).is_empty());
    }

    #[test]
    fn test_duplicate_entrants_count_once() {
        let odds = calculate_odds(&[RacerId(1), RacerId(2), RacerId(1)], 0.0);
        assert_eq!(odds.len(), 2);
        assert_eq!(odds[&RacerId(1)], Odds::from_hundredths(200));
    }

    #[test]
    fn test_place_odds_floor_at_even() {
        let odds = place_odds(&ids(6), 3, 0.1);
        // 0.9 × 6 / 3
        assert_eq!(odds[&RacerId(1)].hundredths(), 180);

        let odds = place_odds(&ids(2), 3, 0.1);
        assert_eq!(odds[&RacerId(2)], Odds::EVEN);

        assert!(place_odds(&[], 3, 0.1).is_empty());
    }
}
