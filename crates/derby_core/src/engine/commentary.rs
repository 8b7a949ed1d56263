//! Commentary event construction and ordering.

use crate::models::{CommentaryEvent, EventPayload, RacerId};
use std::collections::HashMap;

/// Orders one segment's events: the entry marker first, then by descending
/// magnitude, with kind and racer ids as deterministic tie-breaks.
pub fn order_segment_events(
    entry: CommentaryEvent,
    mut rest: Vec<CommentaryEvent>,
) -> Vec<CommentaryEvent> {
    rest.sort_by(|a, b| {
        b.magnitude()
            .total_cmp(&a.magnitude())
            .then_with(|| a.kind().cmp(&b.kind()))
            .then_with(|| a.racers.cmp(&b.racers))
    });

    let mut ordered = Vec::with_capacity(rest.len() + 1);
    ordered.push(entry);
    ordered.extend(rest);
    ordered
}

/// One overtake per pair whose relative order flipped between `before` and `after`.
///
/// `swing` is how much the gap between the two racers moved this segment.
pub fn detect_overtakes(
    segment: usize,
    before: &[RacerId],
    after: &[RacerId],
    scores_before: &HashMap<RacerId, f64>,
    scores_after: &HashMap<RacerId, f64>,
) -> Vec<CommentaryEvent> {
    let rank_before: HashMap<RacerId, usize> =
        before.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    let mut events = Vec::new();
    for (i, overtaker) in after.iter().enumerate() {
        for overtaken in &after[i + 1..] {
            let (Some(rb_a), Some(rb_b)) = (rank_before.get(overtaker), rank_before.get(overtaken))
            else {
                continue;
            };
            if rb_a < rb_b {
                continue;
            }
            let gap_after = score(scores_after, *overtaker) - score(scores_after, *overtaken);
            let gap_before = score(scores_before, *overtaker) - score(scores_before, *overtaken);
            events.push(CommentaryEvent {
                segment,
                racers: vec![*overtaker, *overtaken],
                payload: EventPayload::Overtake {
                    overtaker: *overtaker,
                    overtaken: *overtaken,
                    swing: gap_after - gap_before,
                },
            });
        }
    }
    events
}

fn score(scores: &HashMap<RacerId, f64>, id: RacerId) -> f64 {
    scores.get(&id).copied().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventKind, SegmentKind};

    fn entry(segment: usize) -> CommentaryEvent {
        CommentaryEvent {
            segment,
            racers: vec![RacerId(1)],
            payload: EventPayload::SegmentEntered {
                segment_kind: SegmentKind::Straight,
                length: 100.0,
                leader: RacerId(1),
            },
        }
    }

    fn incident(racer: u32, penalty: f64) -> CommentaryEvent {
        CommentaryEvent {
            segment: 0,
            racers: vec![RacerId(racer)],
            payload: EventPayload::Incident {
                racer: RacerId(racer),
                penalty,
                stamina_deficit: 0,
                temperament_deficit: 0,
            },
        }
    }

    #[test]
    fn test_detects_single_pass() {
        let before = vec![RacerId(1), RacerId(2), RacerId(3)];
        let after = vec![RacerId(2), RacerId(1), RacerId(3)];
        let sb: HashMap<_, _> = [(RacerId(1), 10.0), (RacerId(2), 8.0), (RacerId(3), 5.0)].into();
        let sa: HashMap<_, _> = [(RacerId(1), 20.0), (RacerId(2), 23.0), (RacerId(3), 12.0)].into();

        let events = detect_overtakes(1, &before, &after, &sb, &sa);
        assert_eq!(events.len(), 1);
        match &events[0].payload {
            EventPayload::Overtake {
                overtaker,
                overtaken,
                swing,
            } => {
                assert_eq!(*overtaker, RacerId(2));
                assert_eq!(*overtaken, RacerId(1));
                // gap went from -2 to +3
                assert!((swing - 5.0).abs() < 1e-9);
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_leapfrogging_several_racers() {
        let before = vec![RacerId(1), RacerId(2), RacerId(3)];
        let after = vec![RacerId(3), RacerId(1), RacerId(2)];
        let sb = HashMap::new();
        let sa = HashMap::new();
        let events = detect_overtakes(0, &before, &after, &sb, &sa);
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.racers[0] == RacerId(3)));
    }

    #[test]
    fn test_no_change_no_events() {
        let order = vec![RacerId(1), RacerId(2)];
        let events = detect_overtakes(0, &order, &order, &HashMap::new(), &HashMap::new());
        assert!(events.is_empty());
    }

    #[test]
    fn test_segment_order_entry_then_magnitude() {
        let ordered = order_segment_events(
            entry(0),
            vec![incident(2, 4.0), incident(3, 12.0), incident(1, 4.0)],
        );
        assert_eq!(ordered[0].kind(), EventKind::SegmentEntered);
        assert_eq!(ordered[1].racers, vec![RacerId(3)]);
        // equal magnitude falls back to racer id
        assert_eq!(ordered[2].racers, vec![RacerId(1)]);
        assert_eq!(ordered[3].racers, vec![RacerId(2)]);
    }
}
