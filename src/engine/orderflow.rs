//! Order-flow evaluation: delta-based score plus confirmation counting for
//! the hard order-flow gate.

use crate::engine::params::EngineParams;
use crate::engine::regime::VolatilityRegime;
use crate::types::OrderFlow;

/// Outcome of evaluating the order-flow bundle under a regime
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderFlowReport {
    /// Delta-derived score in [0, 1], neutral 0.5 when no delta is supplied
    pub score: f64,
    /// Confirmations present, 0..=4
    pub confirmations: u32,
    /// Minimum confirmations required by the active regime
    pub required: u32,
    /// Gate outcome: confirmations >= required
    pub gate_passed: bool,
}

impl OrderFlowReport {
    /// Reason code used when the hard gate blocks
    pub fn gate_reason(&self) -> String {
        format!("gate_orderflow_conf<{} ({})", self.required, self.confirmations)
    }
}

/// Count confirmations and score the delta.
///
/// Confirmations (capped at 4): delta burst, delta flip, stacked-imbalance
/// rows on either side, absorption on either side. The gate minimum adapts to
/// the regime - calmer bands need fewer confirmations than stressed ones.
pub fn evaluate_orderflow(
    of: &OrderFlow,
    regime: VolatilityRegime,
    params: &EngineParams,
) -> OrderFlowReport {
    let mut confirmations = 0u32;
    if of.delta_burst {
        confirmations += 1;
    }
    if of.delta_flip {
        confirmations += 1;
    }
    if of.stacked_ask_rows > 0 || of.stacked_bid_rows > 0 {
        confirmations += 1;
    }
    if of.absorption_bid || of.absorption_ask {
        confirmations += 1;
    }

    let score = match of.delta.or(of.cumulative_delta) {
        Some(delta) => (0.5 + 0.3 * delta.clamp(-1.0, 1.0)).clamp(0.0, 1.0),
        None => 0.5,
    };

    let required = params.regimes.get(regime).min_orderflow_confs;
    OrderFlowReport {
        score,
        confirmations,
        required,
        gate_passed: confirmations >= required,
    }
}
