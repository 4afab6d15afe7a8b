//! Structural context scoring.
//!
//! VWAP and the value-area levels act as magnets: entering a trade right on
//! top of one means the move has to escape the magnet first. Each magnet
//! within its regime buffer takes a fixed deduction off a neutral 0.5 base.

use crate::engine::geometry::ticks_between;
use crate::engine::params::EngineParams;
use crate::engine::regime::VolatilityRegime;
use crate::types::StructureRefs;

/// Structural context score in [0, 1]; 0.5 is neutral, magnets pull it down.
pub fn structure_score(
    refs: &StructureRefs,
    price: f64,
    regime: VolatilityRegime,
    params: &EngineParams,
) -> f64 {
    let bands = params.regimes.get(regime);
    let mut penalty = 0.0;

    if let Some(vwap) = refs.vwap {
        if ticks_between(price, vwap, params.tick_size) <= bands.vwap_buffer_ticks as f64 {
            penalty -= params.magnet_penalty;
        }
    }
    for lvl in [refs.vpoc, refs.val, refs.vah].into_iter().flatten() {
        if ticks_between(price, lvl, params.tick_size) <= bands.profile_buffer_ticks as f64 {
            penalty -= params.magnet_penalty;
        }
    }

    (0.5 + penalty).clamp(0.0, 1.0)
}
