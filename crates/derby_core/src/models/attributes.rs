//! Racer attribute vector and temperament archetypes
//!
//! All four attributes live on a 0-100 scale:
//! - 0-30: Low
//! - 31-70: Average
//! - 71-100: High
//!
//! Every constructor and mutator clamps, including deserialization, so an
//! `Attributes` value is always within bounds.

use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const ATTRIBUTE_MIN: u8 = 0;
pub const ATTRIBUTE_MAX: u8 = 100;

/// Percentage bonus/penalty an archetype applies to its affected attributes.
pub const ARCHETYPE_MODIFIER: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Speed,
    Cornering,
    Stamina,
    Temperament,
}

impl Attribute {
    pub const ALL: [Attribute; 4] = [
        Attribute::Speed,
        Attribute::Cornering,
        Attribute::Stamina,
        Attribute::Temperament,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(from = "AttributeValues")]
pub struct Attributes {
    speed: u8,
    cornering: u8,
    stamina: u8,
    temperament: u8,
}

/// Unchecked wire form; converted through `Attributes::new` so bounds hold.
#[derive(Deserialize, JsonSchema)]
struct AttributeValues {
    speed: u8,
    cornering: u8,
    stamina: u8,
    temperament: u8,
}

impl From<AttributeValues> for Attributes {
    fn from(v: AttributeValues) -> Self {
        Attributes::new(v.speed, v.cornering, v.stamina, v.temperament)
    }
}

impl Default for Attributes {
    /// Average racer (all attributes at 50)
    fn default() -> Self {
        Self::new(50, 50, 50, 50)
    }
}

impl Attributes {
    pub fn new(speed: u8, cornering: u8, stamina: u8, temperament: u8) -> Self {
        Self {
            speed: speed.min(ATTRIBUTE_MAX),
            cornering: cornering.min(ATTRIBUTE_MAX),
            stamina: stamina.min(ATTRIBUTE_MAX),
            temperament: temperament.min(ATTRIBUTE_MAX),
        }
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    pub fn cornering(&self) -> u8 {
        self.cornering
    }

    pub fn stamina(&self) -> u8 {
        self.stamina
    }

    pub fn temperament(&self) -> u8 {
        self.temperament
    }

    pub fn get(&self, attr: Attribute) -> u8 {
        match attr {
            Attribute::Speed => self.speed,
            Attribute::Cornering => self.cornering,
            Attribute::Stamina => self.stamina,
            Attribute::Temperament => self.temperament,
        }
    }

    pub fn set(&mut self, attr: Attribute, value: u8) {
        let value = value.clamp(ATTRIBUTE_MIN, ATTRIBUTE_MAX);
        match attr {
            Attribute::Speed => self.speed = value,
            Attribute::Cornering => self.cornering = value,
            Attribute::Stamina => self.stamina = value,
            Attribute::Temperament => self.temperament = value,
        }
    }

    /// Shift an attribute by `delta`, saturating at the bounds.
    pub fn adjust(&mut self, attr: Attribute, delta: i32) {
        let next = (self.get(attr) as i32 + delta).clamp(ATTRIBUTE_MIN as i32, ATTRIBUTE_MAX as i32);
        self.set(attr, next as u8);
    }

    pub fn total(&self) -> u32 {
        Attribute::ALL.iter().map(|a| self.get(*a) as u32).sum()
    }
}

/// Temperament archetype: raises one attribute and lowers another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
pub enum Archetype {
    Agile,
    Reckless,
    Tactical,
    Burly,
    Steady,
    Sharpshift,
    #[default]
    Quirky,
}

impl Archetype {
    pub const ALL: [Archetype; 7] = [
        Archetype::Agile,
        Archetype::Reckless,
        Archetype::Tactical,
        Archetype::Burly,
        Archetype::Steady,
        Archetype::Sharpshift,
        Archetype::Quirky,
    ];

    /// (boosted, weakened) attributes
    pub fn affected(&self) -> Option<(Attribute, Attribute)> {
        match self {
            Archetype::Agile => Some((Attribute::Speed, Attribute::Stamina)),
            Archetype::Reckless => Some((Attribute::Speed, Attribute::Cornering)),
            Archetype::Tactical => Some((Attribute::Cornering, Attribute::Speed)),
            Archetype::Burly => Some((Attribute::Stamina, Attribute::Cornering)),
            Archetype::Steady => Some((Attribute::Stamina, Attribute::Speed)),
            Archetype::Sharpshift => Some((Attribute::Cornering, Attribute::Stamina)),
            Archetype::Quirky => None,
        }
    }

    pub fn apply(&self, attrs: &Attributes) -> Attributes {
        self.apply_with_modifier(attrs, ARCHETYPE_MODIFIER)
    }

    pub fn apply_with_modifier(&self, attrs: &Attributes, modifier: f32) -> Attributes {
        let mut result = *attrs;
        if let Some((up, down)) = self.affected() {
            let raised = (attrs.get(up) as f32 * (1.0 + modifier)).round();
            let lowered = (attrs.get(down) as f32 * (1.0 - modifier)).round();
            result.set(up, raised.clamp(0.0, ATTRIBUTE_MAX as f32) as u8);
            result.set(down, lowered.clamp(0.0, ATTRIBUTE_MAX as f32) as u8);
        }
        result
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_to_bounds() {
        let attrs = Attributes::new(150, 100, 0, 255);
        assert_eq!(attrs.speed(), 100);
        assert_eq!(attrs.cornering(), 100);
        assert_eq!(attrs.stamina(), 0);
        assert_eq!(attrs.temperament(), 100);
    }

    #[test]
    fn test_adjust_saturates() {
        let mut attrs = Attributes::new(95, 5, 50, 50);
        attrs.adjust(Attribute::Speed, 20);
        attrs.adjust(Attribute::Cornering, -20);
        attrs.adjust(Attribute::Stamina, 7);
        assert_eq!(attrs.speed(), 100);
        assert_eq!(attrs.cornering(), 0);
        assert_eq!(attrs.stamina(), 57);
    }

    #[test]
    fn test_deserialize_clamps() {
        let attrs: Attributes =
            serde_json::from_str(r#"{"speed":200,"cornering":40,"stamina":101,"temperament":3}"#)
                .unwrap();
        assert_eq!(attrs, Attributes::new(100, 40, 100, 3));
    }

    #[test]
    fn test_archetype_modifiers() {
        let base = Attributes::new(50, 50, 50, 50);

        let agile = Archetype::Agile.apply(&base);
        assert_eq!(agile.speed(), 55);
        assert_eq!(agile.stamina(), 45);
        assert_eq!(agile.cornering(), 50);

        let burly = Archetype::Burly.apply(&base);
        assert_eq!(burly.stamina(), 55);
        assert_eq!(burly.cornering(), 45);

        assert_eq!(Archetype::Quirky.apply(&base), base);
    }

    #[test]
    fn test_archetype_respects_upper_bound() {
        let maxed = Attributes::new(100, 100, 100, 100);
        let reckless = Archetype::Reckless.apply(&maxed);
        assert_eq!(reckless.speed(), 100);
        assert_eq!(reckless.cornering(), 90);
    }
}
