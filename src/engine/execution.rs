//! Entry/stop/target planning from a triggering level.
//!
//! Offsets are fixed tick counts, so plans stay on the tick grid whenever
//! the level itself is on it. Deliberately regime-independent: regime
//! sensitivity lives in the gates and the confidence multiplier, not in
//! plan geometry.

use crate::engine::params::EngineParams;
use crate::types::Side;

/// Entry, stop and first target for one signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradePlan {
    pub entry: f64,
    pub stop: f64,
    pub target1: f64,
}

/// Build the plan from the triggering level price.
///
/// Long: entry above the level by the entry offset, stop below by the
/// unified stop, target1 at the reward multiple of the risk. Short mirrored.
pub fn plan_from_level(level_price: f64, side: Side, params: &EngineParams) -> TradePlan {
    let tick = params.tick_size;
    let offset = params.entry_offset_ticks as f64 * tick;
    let stop_dist = params.unified_stop_ticks as f64 * tick;

    match side {
        Side::Long => {
            let entry = level_price + offset;
            let stop = level_price - stop_dist;
            let target1 = entry + params.reward_multiple * (entry - stop);
            TradePlan { entry, stop, target1 }
        }
        Side::Short => {
            let entry = level_price - offset;
            let stop = level_price + stop_dist;
            let target1 = entry - params.reward_multiple * (stop - entry);
            TradePlan { entry, stop, target1 }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_plan_geometry() {
        let params = EngineParams::default();
        let plan = plan_from_level(5400.0, Side::Long, &params);
        assert_eq!(plan.entry, 5401.0); // +4 ticks
        assert_eq!(plan.stop, 5398.25); // -7 ticks
        // risk = 2.75, target = entry + 1.2 * risk
        assert!((plan.target1 - 5404.3).abs() < 1e-9);
        assert!(plan.stop < plan.entry && plan.entry < plan.target1);
    }

    #[test]
    fn test_short_plan_geometry() {
        let params = EngineParams::default();
        let plan = plan_from_level(5400.0, Side::Short, &params);
        assert_eq!(plan.entry, 5399.0);
        assert_eq!(plan.stop, 5401.75);
        assert!((plan.target1 - 5395.7).abs() < 1e-9);
        assert!(plan.target1 < plan.entry && plan.entry < plan.stop);
    }

    #[test]
    fn test_ordering_holds_across_levels() {
        let params = EngineParams::default();
        for level in [100.0, 5400.25, 21503.75] {
            let long = plan_from_level(level, Side::Long, &params);
            assert!(long.stop < long.entry && long.entry < long.target1);
            let short = plan_from_level(level, Side::Short, &params);
            assert!(short.target1 < short.entry && short.entry < short.stop);
        }
    }

    #[test]
    fn test_plan_on_tick_grid() {
        let params = EngineParams::default();
        let plan = plan_from_level(5400.25, Side::Long, &params);
        for px in [plan.entry, plan.stop] {
            let ticks = px / params.tick_size;
            assert!((ticks - ticks.round()).abs() < 1e-9, "{} off the tick grid", px);
        }
    }
}
