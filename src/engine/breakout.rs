//! Wick-tolerant true-breakout confirmation.
//!
//! A close beyond the edge is not enough: the bar must close a full wick
//! tolerance past the edge AND the rejection wick back through the edge must
//! stay within that same tolerance. Stressed regimes tolerate longer wicks.

use crate::engine::params::EngineParams;
use crate::engine::regime::VolatilityRegime;
use crate::types::Ohlc;

/// Break direction being validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakDirection {
    Up,
    Down,
}

/// Three-valued outcome: no OHLC means the check could not run, which is
/// treated as not-yet-falsifiable rather than a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakoutCheck {
    Confirmed,
    Rejected,
    Skipped,
}

impl BreakoutCheck {
    /// A skipped check never vetoes the setup
    pub fn holds(&self) -> bool {
        !matches!(self, BreakoutCheck::Rejected)
    }
}

/// Validate a breakout of `edge_price` by the given bar.
pub fn true_breakout(
    edge_price: f64,
    ohlc: Option<&Ohlc>,
    direction: BreakDirection,
    regime: VolatilityRegime,
    params: &EngineParams,
) -> BreakoutCheck {
    let Some(bar) = ohlc else {
        return BreakoutCheck::Skipped;
    };
    let tol_ticks = params.regimes.get(regime).wick_tol_ticks as f64;
    let tick = params.tick_size;

    let confirmed = match direction {
        BreakDirection::Up => {
            let wick_below = (((edge_price - bar.low) / tick).round()).max(0.0);
            bar.close >= edge_price + tol_ticks * tick && wick_below <= tol_ticks
        }
        BreakDirection::Down => {
            let wick_above = (((bar.high - edge_price) / tick).round()).max(0.0);
            bar.close <= edge_price - tol_ticks * tick && wick_above <= tol_ticks
        }
    };

    if confirmed {
        BreakoutCheck::Confirmed
    } else {
        BreakoutCheck::Rejected
    }
}
