use crate::config::ProgressionPolicy;
use crate::models::Racer;

/// Record one finish on the racer's career and nudge morale.
///
/// Win > placed > mid-field (no change) > bottom half (penalty).
pub fn apply_finish(racer: &mut Racer, position: u16, field_size: usize, policy: &ProgressionPolicy) {
    racer
        .career
        .record(position, policy.place_positions, policy.review_window);

    let params = &policy.morale;
    if position == 1 {
        racer.morale.nudge(params.win_boost);
    } else if position <= policy.place_positions {
        racer.morale.nudge(params.place_boost);
    } else if position as f32 > field_size as f32 / 2.0 {
        racer.morale.nudge(-params.poor_finish_penalty);
    }
}

/// End-of-tick relaxation toward neutral.
pub fn decay(racer: &mut Racer, policy: &ProgressionPolicy) {
    racer.morale.decay(policy.morale.decay);
}
