pub mod attributes;
pub mod course;
pub mod ids;
pub mod outcome;
pub mod racer;
pub mod wager;

pub use attributes::{Archetype, Attribute, Attributes, ARCHETYPE_MODIFIER, ATTRIBUTE_MAX, ATTRIBUTE_MIN};
pub use course::{Difficulty, Map, Segment, SegmentKind, DEFAULT_HAZARD_THRESHOLD};
pub use ids::{BettorId, MapId, RaceId, RacerId, WagerId};
pub use outcome::{
    outcome_schema, CommentaryEvent, EventKind, EventPayload, RaceOutcome, RacerResult,
};
pub use racer::{CareerRecord, Morale, Racer, RacerStatus, RetirementReason, MORALE_MAX, MORALE_MIN};
pub use wager::{Odds, Payout, Wager, WagerKind};
