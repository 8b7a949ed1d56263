//! Race map: an ordered, non-empty sequence of typed segments.

use super::attributes::Attribute;
use super::ids::MapId;
use crate::error::SetupIssue;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default stamina/temperament requirement for hazard segments.
pub const DEFAULT_HAZARD_THRESHOLD: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Straight,
    Curve,
    Hazard,
}

/// Per-attribute weighting of a segment's requirement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Difficulty {
    pub speed: f32,
    pub cornering: f32,
    pub stamina: f32,
    pub temperament: f32,
}

impl Difficulty {
    pub fn for_kind(kind: SegmentKind) -> Self {
        match kind {
            SegmentKind::Straight => Self {
                speed: 0.6,
                cornering: 0.0,
                stamina: 0.3,
                temperament: 0.1,
            },
            SegmentKind::Curve => Self {
                speed: 0.25,
                cornering: 0.55,
                stamina: 0.05,
                temperament: 0.15,
            },
            SegmentKind::Hazard => Self {
                speed: 0.1,
                cornering: 0.1,
                stamina: 0.4,
                temperament: 0.4,
            },
        }
    }

    pub fn weight(&self, attr: Attribute) -> f32 {
        match attr {
            Attribute::Speed => self.speed,
            Attribute::Cornering => self.cornering,
            Attribute::Stamina => self.stamina,
            Attribute::Temperament => self.temperament,
        }
    }

    pub fn total(&self) -> f32 {
        self.speed + self.cornering + self.stamina + self.temperament
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Segment {
    pub kind: SegmentKind,
    pub length: f32,
    pub difficulty: Difficulty,
    /// Stamina/temperament a racer needs to clear a hazard safely.
    #[serde(default = "default_threshold")]
    pub threshold: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

fn default_threshold() -> u8 {
    DEFAULT_HAZARD_THRESHOLD
}

impl Segment {
    pub fn new(kind: SegmentKind, length: f32) -> Self {
        Self {
            kind,
            length,
            difficulty: Difficulty::for_kind(kind),
            threshold: DEFAULT_HAZARD_THRESHOLD,
            label: None,
        }
    }

    pub fn straight(length: f32) -> Self {
        Self::new(SegmentKind::Straight, length)
    }

    pub fn curve(length: f32) -> Self {
        Self::new(SegmentKind::Curve, length)
    }

    pub fn hazard(length: f32, threshold: u8) -> Self {
        Self {
            threshold: threshold.min(100),
            ..Self::new(SegmentKind::Hazard, length)
        }
    }

    pub fn is_hazard(&self) -> bool {
        self.kind == SegmentKind::Hazard
    }

    pub fn validate(&self, index: usize) -> Result<(), SetupIssue> {
        let invalid = |detail: String| SetupIssue::InvalidSegment { index, detail };

        if !self.length.is_finite() || self.length <= 0.0 {
            return Err(invalid(format!("length must be positive, got {}", self.length)));
        }
        for attr in Attribute::ALL {
            let w = self.difficulty.weight(attr);
            if !w.is_finite() || w < 0.0 {
                return Err(invalid(format!("{:?} weight must be >= 0, got {}", attr, w)));
            }
        }
        if self.difficulty.total() <= 0.0 {
            return Err(invalid("difficulty weights sum to zero".to_string()));
        }
        if self.threshold > 100 {
            return Err(invalid(format!("threshold must be 0-100, got {}", self.threshold)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Map {
    pub id: MapId,
    #[serde(default)]
    pub name: String,
    pub segments: Vec<Segment>,
}

impl Map {
    pub fn new(id: impl Into<MapId>, segments: Vec<Segment>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            segments,
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn total_length(&self) -> f32 {
        self.segments.iter().map(|s| s.length).sum()
    }

    pub fn validate(&self) -> Result<(), SetupIssue> {
        if self.segments.is_empty() {
            return Err(SetupIssue::EmptyMap);
        }
        self.segments
            .iter()
            .enumerate()
            .try_for_each(|(i, s)| s.validate(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_emphasize_kind() {
        let curve = Difficulty::for_kind(SegmentKind::Curve);
        assert!(curve.cornering > curve.speed);

        let hazard = Difficulty::for_kind(SegmentKind::Hazard);
        assert!(hazard.stamina >= hazard.speed && hazard.temperament >= hazard.cornering);

        for kind in [SegmentKind::Straight, SegmentKind::Curve, SegmentKind::Hazard] {
            assert!((Difficulty::for_kind(kind).total() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_empty_map_is_invalid() {
        let map = Map::new("empty", vec![]);
        assert_eq!(map.validate(), Err(SetupIssue::EmptyMap));
    }

    #[test]
    fn test_non_positive_length_rejected() {
        let map = Map::new("bad", vec![Segment::straight(100.0), Segment::curve(0.0)]);
        match map.validate() {
            Err(SetupIssue::InvalidSegment { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected invalid segment, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut seg = Segment::hazard(50.0, 60);
        seg.difficulty.stamina = -0.5;
        assert!(seg.validate(0).is_err());
    }

    #[test]
    fn test_segment_json_defaults_threshold() {
        let seg: Segment = serde_json::from_str(
            r#"{"kind":"hazard","length":40.0,"difficulty":{"speed":0.1,"cornering":0.1,"stamina":0.4,"temperament":0.4}}"#,
        )
        .unwrap();
        assert_eq!(seg.threshold, DEFAULT_HAZARD_THRESHOLD);
        assert!(seg.is_hazard());
    }
}
