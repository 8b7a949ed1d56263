//! Newcomer generation
//!
//! Attributes are drawn per attribute as `mean + spread × z` with `z` standard
//! normal, rounded and clamped to `[min, max]`. The mean is pulled toward the current league
//! average by `league_bias`, so successive generations track the league
//! instead of drifting upward.

use crate::config::NewcomerParams;
use crate::models::{Archetype, Attribute, Attributes, Racer, RacerId};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Mean of each attribute across `racers`, indexed like `Attribute::ALL`.
pub fn league_average(racers: &[Racer]) -> Option<[f64; 4]> {
    if racers.is_empty() {
        return None;
    }
    let mut sums = [0.0_f64; 4];
    for racer in racers {
        for (i, attr) in Attribute::ALL.iter().enumerate() {
            sums[i] += racer.attributes.get(*attr) as f64;
        }
    }
    let n = racers.len() as f64;
    Some(sums.map(|s| s / n))
}

pub fn draw_attributes(
    params: &NewcomerParams,
    average: Option<[f64; 4]>,
    rng: &mut impl Rng,
) -> Attributes {
    let mut attrs = Attributes::default();
    for (i, attr) in Attribute::ALL.iter().enumerate() {
        let mean = match average {
            Some(avg) => params.mean * (1.0 - params.league_bias) + avg[i] * params.league_bias,
            None => params.mean,
        };
        let z: f64 = StandardNormal.sample(rng);
        let value = mean + params.spread * z;
        let clamped = value.round().clamp(params.min as f64, params.max as f64);
        attrs.set(*attr, clamped as u8);
    }
    attrs
}

/// "Comet" -> "Comet II", "Comet II" -> "Comet III"
pub fn successor_name(name: &str) -> String {
    let trimmed = name.trim_end();
    if let Some((base, suffix)) = trimmed.rsplit_once(' ') {
        if let Some(n) = from_roman(suffix) {
            return format!("{} {}", base, to_roman(n + 1));
        }
    }
    format!("{} II", trimmed)
}

pub fn generate(
    id: RacerId,
    name: String,
    owner_id: Option<u64>,
    params: &NewcomerParams,
    average: Option<[f64; 4]>,
    rng: &mut impl Rng,
) -> Racer {
    let attributes = draw_attributes(params, average, rng);
    let archetype = Archetype::random(rng);
    let mut racer = Racer::new(id, name, attributes).with_archetype(archetype);
    racer.owner_id = owner_id;
    racer
}

const NUMERALS: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

fn to_roman(mut n: u32) -> String {
    let mut out = String::new();
    for (value, symbol) in NUMERALS {
        while n >= value {
            out.push_str(symbol);
            n -= value;
        }
    }
    out
}

/// Parses canonical numerals only; anything else (e.g. "Jr", "IIII") is `None`.
fn from_roman(s: &str) -> Option<u32> {
    if s.is_empty() || !s.chars().all(|c| "IVXLCDM".contains(c)) {
        return None;
    }
    let mut rest = s;
    let mut total = 0;
    for (value, symbol) in NUMERALS {
        while let Some(stripped) = rest.strip_prefix(symbol) {
            total += value;
            rest = stripped;
        }
    }
    if rest.is_empty() && total > 0 && to_roman(total) == s {
        Some(total)
    } else {
        None
    }
}
