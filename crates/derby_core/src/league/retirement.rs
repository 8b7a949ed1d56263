//! Retirement review
//!
//! Checked in order, first match wins:
//! 1. Age: older than `max_age`
//! 2. Performance: at least `min_races_for_review` recent finishes and a
//!    placement rate under `placement_floor`
//! 3. Chance: `roll < retirement_chance`

use crate::config::ProgressionPolicy;
use crate::models::{Racer, RetirementReason};

/// `roll` is a uniform draw in [0, 1) supplied by the caller's seeded generator.
pub fn review(racer: &Racer, policy: &ProgressionPolicy, roll: f64) -> Option<RetirementReason> {
    if !racer.is_active() {
        return None;
    }

    if racer.age > policy.max_age {
        return Some(RetirementReason::Age);
    }

    let recent = racer.career.recent_finishes.len();
    if recent >= policy.min_races_for_review {
        if let Some(rate) = racer.career.recent_placement_rate(policy.place_positions) {
            if rate < policy.placement_floor {
                return Some(RetirementReason::Performance);
            }
        }
    }

    if roll < policy.retirement_chance {
        return Some(RetirementReason::Chance);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attributes, RacerId};

    fn racer_with_finishes(finishes: &[u16]) -> Racer {
        let mut racer = Racer::new(RacerId(1), "Pip", Attributes::default());
        for pos in finishes {
            racer.career.record(*pos, 3, 10);
        }
        racer
    }

    #[test]
    fn test_age_limit() {
        let policy = ProgressionPolicy::default();
        let mut racer = racer_with_finishes(&[]);
        racer.age = policy.max_age;
        assert_eq!(review(&racer, &policy, 0.9), None);
        racer.age = policy.max_age + 1;
        assert_eq!(review(&racer, &policy, 0.9), Some(RetirementReason::Age));
    }

    #[test]
    fn test_single_bad_race_is_not_enough() {
        let policy = ProgressionPolicy::default();
        let racer = racer_with_finishes(&[8]);
        assert_eq!(review(&racer, &policy, 0.9), None);
    }

    #[test]
    fn test_persistent_poor_form_retires() {
        let policy = ProgressionPolicy::default();
        let racer = racer_with_finishes(&[6, 7, 5, 8, 6]);
        assert_eq!(
            review(&racer, &policy, 0.9),
            Some(RetirementReason::Performance)
        );

        // one podium in five is 20%, above the 10% floor
        let racer = racer_with_finishes(&[6, 7, 2, 8, 6]);
        assert_eq!(review(&racer, &policy, 0.9), None);
    }

    #[test]
    fn test_chance_roll() {
        let policy = ProgressionPolicy {
            retirement_chance: 0.3,
            ..ProgressionPolicy::default()
        };
        let racer = racer_with_finishes(&[]);
        assert_eq!(review(&racer, &policy, 0.1), Some(RetirementReason::Chance));
        assert_eq!(review(&racer, &policy, 0.5), None);
    }

    #[test]
    fn test_zero_chance_never_rolls() {
        let policy = ProgressionPolicy::default();
        let racer = racer_with_finishes(&[]);
        assert_eq!(review(&racer, &policy, 0.0), None);
    }
}
