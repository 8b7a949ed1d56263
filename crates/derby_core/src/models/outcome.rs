//! Race outcome and commentary events
//!
//! A `RaceOutcome` is the only thing the simulator produces. The progression
//! manager, betting resolver and presentation layer all read the same value.
//!
//! Commentary events are structured data. Text rendering and localisation
//! belong to the presentation layer, which should key off `EventPayload`.

use super::course::SegmentKind;
use super::ids::{MapId, RaceId, RacerId};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    SegmentEntered,
    Overtake,
    Incident,
    Finish,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventPayload {
    /// Field enters a segment; `leader` is the running leader at entry.
    SegmentEntered {
        segment_kind: SegmentKind,
        length: f32,
        leader: RacerId,
    },
    Overtake {
        overtaker: RacerId,
        overtaken: RacerId,
        /// Change in score gap between the two racers over this segment
        swing: f64,
    },
    Incident {
        racer: RacerId,
        penalty: f64,
        stamina_deficit: u8,
        temperament_deficit: u8,
    },
    Finish {
        racer: RacerId,
        position: u16,
        score: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CommentaryEvent {
    /// Index into the map's segments
    pub segment: usize,
    pub racers: Vec<RacerId>,
    #[serde(flatten)]
    pub payload: EventPayload,
}

impl CommentaryEvent {
    pub fn kind(&self) -> EventKind {
        match self.payload {
            EventPayload::SegmentEntered { .. } => EventKind::SegmentEntered,
            EventPayload::Overtake { .. } => EventKind::Overtake,
            EventPayload::Incident { .. } => EventKind::Incident,
            EventPayload::Finish { .. } => EventKind::Finish,
        }
    }

    /// Size of the swing this event caused; orders events within a segment.
    pub fn magnitude(&self) -> f64 {
        match self.payload {
            EventPayload::Overtake { swing, .. } => swing.abs(),
            EventPayload::Incident { penalty, .. } => penalty.abs(),
            EventPayload::SegmentEntered { .. } | EventPayload::Finish { .. } => 0.0,
        }
    }

    pub fn involves(&self, racer: RacerId) -> bool {
        self.racers.contains(&racer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RacerResult {
    pub racer_id: RacerId,
    /// 1-based finishing position
    pub position: u16,
    pub score: f64,
    pub incidents: u32,
    /// Performance gained on each segment, incident penalties included
    pub segment_deltas: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RaceOutcome {
    pub race_id: RaceId,
    pub map_id: MapId,
    pub seed: u64,
    pub finish_order: Vec<RacerId>,
    /// One entry per participant, in finish order
    pub results: Vec<RacerResult>,
    pub events: Vec<CommentaryEvent>,
}

impl RaceOutcome {
    pub fn winner(&self) -> Option<RacerId> {
        self.finish_order.first().copied()
    }

    pub fn position_of(&self, racer: RacerId) -> Option<u16> {
        self.finish_order
            .iter()
            .position(|id| *id == racer)
            .map(|i| i as u16 + 1)
    }

    pub fn result_for(&self, racer: RacerId) -> Option<&RacerResult> {
        self.results.iter().find(|r| r.racer_id == racer)
    }

    pub fn is_placed(&self, racer: RacerId, place_positions: u16) -> bool {
        self.position_of(racer)
            .map(|p| p <= place_positions)
            .unwrap_or(false)
    }

    pub fn participants(&self) -> usize {
        self.finish_order.len()
    }

    pub fn events_for_segment(&self, segment: usize) -> impl Iterator<Item = &CommentaryEvent> {
        self.events.iter().filter(move |e| e.segment == segment)
    }

    /// SHA-256 over the canonical JSON form, for replay and audit.
    pub fn digest(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        format!("{:x}", Sha256::digest(&bytes))
    }
}

/// JSON schema of `RaceOutcome`, published to the presentation layer.
pub fn outcome_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(RaceOutcome)
}
