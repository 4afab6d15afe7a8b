//! Level proximity scoring.
//!
//! Fuses the distance of price to every supplied level into one score:
//! each level contributes its bucket score weighted by its type importance,
//! and the accumulated sum is normalized so that two fully-weighted
//! coincident levels saturate the score.

use crate::engine::geometry::{bucket_score, ticks_between};
use crate::engine::params::EngineParams;
use crate::types::PricedLevel;

/// Two coincident max-weight levels (2 * 0.25 * 1.0 * 2) reach 1.0
const NORMALIZATION: f64 = 2.0;

/// Score how tightly price sits against the supplied levels, in [0, 1].
/// Empty level list scores 0.
pub fn proximity_score(levels: &[PricedLevel], price: f64, params: &EngineParams) -> f64 {
    if levels.is_empty() {
        return 0.0;
    }
    let mut acc = 0.0;
    for level in levels {
        let dt = ticks_between(price, level.price, params.tick_size);
        let score = bucket_score(dt, params);
        if score <= 0.0 {
            continue;
        }
        acc += level.level_type.weight() * score;
    }
    (acc / NORMALIZATION).clamp(0.0, 1.0)
}
