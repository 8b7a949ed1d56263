//! Field selection: which active racers run in a given race.

use crate::models::Racer;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Draw up to `max_size` active racers, reproducibly for a given seed.
///
/// The pool is sorted by id before drawing, so the result does not depend on
/// how the caller ordered the roster. The returned field is sorted by id.
pub fn draw_field(roster: &[Racer], max_size: usize, seed: u64) -> Vec<Racer> {
    let mut pool: Vec<&Racer> = roster.iter().filter(|r| r.is_active()).collect();
    pool.sort_by_key(|r| r.id);

    let take = max_size.min(pool.len());
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let (chosen, _) = pool.partial_shuffle(&mut rng, take);

    let mut field: Vec<Racer> = chosen.iter().map(|r| (*r).clone()).collect();
    field.sort_by_key(|r| r.id);
    field
}
