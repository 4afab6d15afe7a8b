//! The gate chain.
//!
//! An ordered list of checks runs before any setup is taken. Hard gates
//! short-circuit the decision to flat with a structured reason; advisory
//! gates only annotate the eventual signal. Adding a gate means appending to
//! `default_chain` - the orchestrator's control flow never changes.

use crate::engine::orderflow::OrderFlowReport;
use crate::engine::params::EngineParams;
use crate::types::Side;
use tracing::debug;

/// Inputs shared by every gate
#[derive(Debug, Clone, Copy)]
pub struct GateInput<'a> {
    /// Provisional side derived from the cluster pattern, if any
    pub side_hint: Option<Side>,
    pub sentiment: Option<f64>,
    pub correlation: Option<f64>,
    pub orderflow: &'a OrderFlowReport,
}

/// Result of one gate check
#[derive(Debug, Clone, PartialEq)]
pub enum GateVerdict {
    Pass,
    /// Passed, but with an annotation for the decision notes
    Note(String),
    /// Failed with a reason code
    Fail(String),
}

type GateCheck = fn(&GateInput<'_>, &EngineParams) -> GateVerdict;

/// One entry in the chain
pub struct Gate {
    pub name: &'static str,
    /// Hard gates short-circuit to flat on failure; advisory gates cannot
    /// block regardless of their verdict.
    pub blocking: bool,
    pub check: GateCheck,
}

/// Outcome of running the whole chain
#[derive(Debug, Clone, PartialEq)]
pub enum ChainOutcome {
    /// All hard gates passed; advisory annotations collected in order
    Cleared { notes: Vec<String> },
    /// A hard gate failed
    Blocked { gate: &'static str, reason: String },
}

/// Sentiment gate (hard). Longs need sentiment at or above the long
/// threshold, shorts need it at or below the signed short threshold.
/// Missing sentiment or side auto-passes.
fn sentiment_gate(input: &GateInput<'_>, params: &EngineParams) -> GateVerdict {
    let (Some(sentiment), Some(side)) = (input.sentiment, input.side_hint) else {
        return GateVerdict::Pass;
    };
    match side {
        Side::Long if sentiment < params.sentiment_long_thr => GateVerdict::Fail(format!(
            "gate_mia:mia_long {:.2}<{:.2}",
            sentiment, params.sentiment_long_thr
        )),
        Side::Short if sentiment > params.sentiment_short_thr => GateVerdict::Fail(format!(
            "gate_mia:mia_short {:.2}>{:.2}",
            sentiment, params.sentiment_short_thr
        )),
        _ => GateVerdict::Pass,
    }
}

/// Leadership/correlation gate (advisory). Highly synchronous markets make
/// counter-trend entries riskier; the setup still trades, annotated.
fn correlation_gate(input: &GateInput<'_>, params: &EngineParams) -> GateVerdict {
    if input.side_hint.is_none() {
        return GateVerdict::Pass;
    }
    match input.correlation {
        Some(cc) if cc.abs() > params.corr_advisory_abs => {
            GateVerdict::Note("counter_trend_caution".to_string())
        }
        _ => GateVerdict::Pass,
    }
}

/// Order-flow confirmation gate (hard). The count vs regime minimum was
/// already computed by `evaluate_orderflow`.
fn orderflow_gate(input: &GateInput<'_>, _params: &EngineParams) -> GateVerdict {
    if input.orderflow.gate_passed {
        GateVerdict::Pass
    } else {
        GateVerdict::Fail(input.orderflow.gate_reason())
    }
}

/// The production chain, in blocking order: sentiment (hard), correlation
/// (advisory), order-flow (hard).
pub fn default_chain() -> Vec<Gate> {
    vec![
        Gate {
            name: "sentiment",
            blocking: true,
            check: sentiment_gate,
        },
        Gate {
            name: "correlation",
            blocking: false,
            check: correlation_gate,
        },
        Gate {
            name: "orderflow",
            blocking: true,
            check: orderflow_gate,
        },
    ]
}

/// Run the chain in order, short-circuiting on the first hard failure.
pub fn run_chain(gates: &[Gate], input: &GateInput<'_>, params: &EngineParams) -> ChainOutcome {
    let mut notes = Vec::new();
    for gate in gates {
        match (gate.check)(input, params) {
            GateVerdict::Pass => {}
            GateVerdict::Note(note) => {
                debug!(gate = gate.name, note = %note, "advisory gate annotation");
                notes.push(note);
            }
            GateVerdict::Fail(reason) => {
                if gate.blocking {
                    debug!(gate = gate.name, reason = %reason, "hard gate blocked");
                    return ChainOutcome::Blocked {
                        gate: gate.name,
                        reason,
                    };
                }
                // Advisory gates cannot block; downgrade to a note
                notes.push(reason);
            }
        }
    }
    ChainOutcome::Cleared { notes }
}
