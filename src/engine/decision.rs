//! Decision orchestrator.
//!
//! One synchronous pass per snapshot: compute the component scores and the
//! regime, run the gate chain, then pattern-match the cluster for a fade or
//! breakout setup. Pure function of (params, snapshot) - no internal state,
//! no retries, identical input always yields the identical decision.

use crate::engine::breakout::{true_breakout, BreakDirection, BreakoutCheck};
use crate::engine::execution::plan_from_level;
use crate::engine::fusion::{cluster_bonus, fuse, label};
use crate::engine::gates::{default_chain, run_chain, ChainOutcome, Gate, GateInput};
use crate::engine::orderflow::evaluate_orderflow;
use crate::engine::params::{ConfigError, EngineParams};
use crate::engine::proximity::proximity_score;
use crate::engine::regime::VolatilityRegime;
use crate::engine::structure::structure_score;
use crate::types::{
    ClusterStatus, ClusterSummary, ConfidenceLabel, Decision, EntrySignal, MarketSnapshot,
    ScoreBreakdown, Side,
};
use tracing::debug;

/// The confluence decision engine.
///
/// Holds the validated, immutable Parameter Set and the gate chain. Safe to
/// share by reference across threads; every evaluation is independent.
pub struct DecisionEngine {
    params: EngineParams,
    gates: Vec<Gate>,
}

impl DecisionEngine {
    /// Construct with a validated Parameter Set. The only hard failure in
    /// the engine lives here: a broken config is rejected before any
    /// decision can run.
    pub fn new(params: EngineParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            params,
            gates: default_chain(),
        })
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    /// Evaluate one snapshot into a decision.
    pub fn evaluate(&self, snapshot: &MarketSnapshot) -> Decision {
        let Some(price) = snapshot.price else {
            return Decision::flat("no_price_or_levels");
        };
        if snapshot.levels.is_empty() {
            return Decision::flat("no_price_or_levels");
        }

        let regime = VolatilityRegime::from_reading(snapshot.volatility);

        let proximity = proximity_score(&snapshot.levels, price, &self.params);
        let of_report = evaluate_orderflow(&snapshot.orderflow, regime, &self.params);
        let structural = structure_score(&snapshot.structure, price, regime, &self.params);
        let bonus = cluster_bonus(snapshot.cluster.as_ref(), &self.params);

        let scores = ScoreBreakdown {
            proximity,
            orderflow: of_report.score,
            structural,
            bonus,
        };
        let confidence = fuse(&scores, regime, &self.params);
        let conf_label = label(confidence, &self.params);

        debug!(
            %regime,
            proximity,
            orderflow = of_report.score,
            structural,
            bonus,
            confidence,
            "scored snapshot"
        );

        let side_hint = side_hint(price, snapshot.cluster.as_ref());
        let input = GateInput {
            side_hint,
            sentiment: snapshot.sentiment,
            correlation: snapshot.correlation,
            orderflow: &of_report,
        };
        let notes = match run_chain(&self.gates, &input, &self.params) {
            ChainOutcome::Blocked { reason, .. } => return Decision::flat(reason),
            ChainOutcome::Cleared { notes } => notes,
        };

        self.match_pattern(price, snapshot, regime, confidence, conf_label, scores, notes)
    }

    /// Cluster pattern matching: fade inside a confluent zone, or join a
    /// validated breakout beyond a strong one.
    fn match_pattern(
        &self,
        price: f64,
        snapshot: &MarketSnapshot,
        regime: VolatilityRegime,
        confidence: f64,
        conf_label: ConfidenceLabel,
        scores: ScoreBreakdown,
        notes: Vec<String>,
    ) -> Decision {
        let Some(cluster) = snapshot.cluster.as_ref() else {
            return Decision::flat("no_cluster");
        };

        let entry = |side: Side, level: f64, rationale: &str| {
            let plan = plan_from_level(level, side, &self.params);
            debug!(%side, level, entry = plan.entry, stop = plan.stop, target1 = plan.target1, rationale, "entry signal");
            Decision::Enter(EntrySignal {
                side,
                entry: plan.entry,
                stop: plan.stop,
                target1: plan.target1,
                confidence,
                label: conf_label,
                regime,
                rationale: rationale.to_string(),
                notes: notes.clone(),
                scores,
                timestamp: snapshot.timestamp,
            })
        };

        match cluster.status {
            // Fade from the near edge of a confluent zone. The order-flow
            // gate already passed or we would not be here.
            ClusterStatus::Inside if cluster.confluence => {
                let side = fade_side(price, cluster);
                let level = match side {
                    Side::Short => cluster.zone_max,
                    Side::Long => cluster.zone_min,
                };
                entry(side, level, "fade_cluster_eul")
            }
            ClusterStatus::Above if cluster.strong => {
                match true_breakout(
                    cluster.zone_max,
                    snapshot.ohlc.as_ref(),
                    BreakDirection::Up,
                    regime,
                    &self.params,
                ) {
                    BreakoutCheck::Rejected => Decision::flat("no_true_break_up"),
                    _ => entry(Side::Long, cluster.zone_max, "breakout_retest_eul"),
                }
            }
            ClusterStatus::Below if cluster.strong => {
                match true_breakout(
                    cluster.zone_min,
                    snapshot.ohlc.as_ref(),
                    BreakDirection::Down,
                    regime,
                    &self.params,
                ) {
                    BreakoutCheck::Rejected => Decision::flat("no_true_break_dn"),
                    _ => entry(Side::Short, cluster.zone_min, "breakout_retest_eul"),
                }
            }
            _ => Decision::flat("no_pattern"),
        }
    }
}

/// Provisional side from the cluster position, used by the gates before the
/// pattern match commits to a setup.
fn side_hint(price: f64, cluster: Option<&ClusterSummary>) -> Option<Side> {
    let cluster = cluster?;
    Some(match cluster.status {
        ClusterStatus::Inside => fade_side(price, cluster),
        ClusterStatus::Above => Side::Long,
        ClusterStatus::Below => Side::Short,
    })
}

/// Inside a zone, fade the nearer edge; equidistant price fades short.
fn fade_side(price: f64, cluster: &ClusterSummary) -> Side {
    if (price - cluster.zone_max).abs() <= (price - cluster.zone_min).abs() {
        Side::Short
    } else {
        Side::Long
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LevelType, Ohlc, OrderFlow, PricedLevel, StructureRefs};

    fn engine() -> DecisionEngine {
        DecisionEngine::new(EngineParams::default()).unwrap()
    }

    fn confirming_orderflow() -> OrderFlow {
        OrderFlow {
            delta: Some(0.4),
            delta_burst: true,
            delta_flip: true,
            stacked_ask_rows: 2,
            ..Default::default()
        }
    }

    fn inside_cluster(confluence: bool) -> ClusterSummary {
        ClusterSummary {
            zone_min: 5396.0,
            zone_max: 5402.0,
            center: 5399.0,
            status: ClusterStatus::Inside,
            confluence,
            strong: false,
            touch: true,
            confluence_strength: 0.8,
        }
    }

    fn base_snapshot() -> MarketSnapshot {
        MarketSnapshot {
            price: Some(5400.0),
            levels: vec![PricedLevel::new(5404.0, LevelType::CallResistance)],
            volatility: Some(18.0), // MID
            ..Default::default()
        }
    }

    #[test]
    fn test_no_price_is_flat() {
        let snap = MarketSnapshot {
            price: None,
            ..base_snapshot()
        };
        assert_eq!(engine().evaluate(&snap).reason(), Some("no_price_or_levels"));
    }

    #[test]
    fn test_empty_levels_flat_regardless_of_rest() {
        let snap = MarketSnapshot {
            levels: vec![],
            orderflow: confirming_orderflow(),
            cluster: Some(inside_cluster(true)),
            sentiment: Some(0.5),
            ..base_snapshot()
        };
        assert_eq!(engine().evaluate(&snap).reason(), Some("no_price_or_levels"));
    }

    #[test]
    fn test_orderflow_gate_blocks_with_count_detail() {
        // price 5400, Call Resistance at 5404 (16 ticks), zero confirmations,
        // MID regime requires 2
        let snap = base_snapshot();
        assert_eq!(
            engine().evaluate(&snap).reason(),
            Some("gate_orderflow_conf<2 (0)")
        );
    }

    #[test]
    fn test_sentiment_gate_precedes_orderflow_gate() {
        // Both would fail; sentiment must be the reported reason.
        // Price 5400 sits nearer zone_max, so the hint is short and a
        // positive sentiment blocks it.
        let snap = MarketSnapshot {
            cluster: Some(inside_cluster(true)),
            sentiment: Some(0.9),
            ..base_snapshot()
        };
        let reason = engine().evaluate(&snap).reason().unwrap().to_string();
        assert!(reason.starts_with("gate_mia:"), "got {}", reason);
    }

    #[test]
    fn test_fade_short_near_zone_max() {
        let snap = MarketSnapshot {
            price: Some(5401.0), // nearer zone_max (5402) than zone_min (5396)
            orderflow: OrderFlow {
                delta: Some(-0.4),
                delta_burst: true,
                absorption_ask: true,
                ..Default::default()
            },
            cluster: Some(inside_cluster(true)),
            sentiment: Some(-0.5), // shorts need <= -0.20
            ..base_snapshot()
        };
        match engine().evaluate(&snap) {
            Decision::Enter(signal) => {
                assert_eq!(signal.side, Side::Short);
                assert_eq!(signal.rationale, "fade_cluster_eul");
                // entry = zone_max - 4 ticks, stop = zone_max + 7 ticks
                assert_eq!(signal.entry, 5401.0);
                assert_eq!(signal.stop, 5403.75);
                let risk = signal.stop - signal.entry;
                assert!((signal.target1 - (signal.entry - 1.2 * risk)).abs() < 1e-9);
                assert!(signal.target1 < signal.entry && signal.entry < signal.stop);
                assert_eq!(signal.regime, VolatilityRegime::Mid);
                assert!(signal.confidence >= 0.0 && signal.confidence <= 1.0);
            }
            other => panic!("expected entry, got {:?}", other),
        }
    }

    #[test]
    fn test_fade_long_near_zone_min() {
        let snap = MarketSnapshot {
            price: Some(5397.0),
            orderflow: confirming_orderflow(),
            cluster: Some(inside_cluster(true)),
            sentiment: Some(0.5),
            ..base_snapshot()
        };
        match engine().evaluate(&snap) {
            Decision::Enter(signal) => {
                assert_eq!(signal.side, Side::Long);
                assert_eq!(signal.entry, 5397.0); // zone_min + 4 ticks
                assert!(signal.stop < signal.entry && signal.entry < signal.target1);
            }
            other => panic!("expected entry, got {:?}", other),
        }
    }

    #[test]
    fn test_inside_without_confluence_no_pattern() {
        let snap = MarketSnapshot {
            orderflow: confirming_orderflow(),
            cluster: Some(inside_cluster(false)),
            ..base_snapshot()
        };
        assert_eq!(engine().evaluate(&snap).reason(), Some("no_pattern"));
    }

    #[test]
    fn test_breakout_rejected_despite_strong_flag() {
        let cluster = ClusterSummary {
            status: ClusterStatus::Above,
            strong: true,
            ..inside_cluster(false)
        };
        let snap = MarketSnapshot {
            price: Some(5403.0),
            orderflow: confirming_orderflow(),
            cluster: Some(cluster),
            sentiment: Some(0.5),
            // close below zone_max + 5-tick tolerance
            ohlc: Some(Ohlc {
                open: 5401.0,
                high: 5403.5,
                low: 5400.0,
                close: 5402.5,
            }),
            ..base_snapshot()
        };
        assert_eq!(engine().evaluate(&snap).reason(), Some("no_true_break_up"));
    }

    #[test]
    fn test_breakout_confirmed_goes_long_from_upper_edge() {
        let cluster = ClusterSummary {
            status: ClusterStatus::Above,
            strong: true,
            ..inside_cluster(false)
        };
        let snap = MarketSnapshot {
            price: Some(5404.0),
            orderflow: confirming_orderflow(),
            cluster: Some(cluster),
            sentiment: Some(0.5),
            ohlc: Some(Ohlc {
                open: 5402.0,
                high: 5404.5,
                low: 5401.75, // 1-tick wick below the edge
                close: 5403.5, // 6 ticks above the 5402 edge
            }),
            ..base_snapshot()
        };
        match engine().evaluate(&snap) {
            Decision::Enter(signal) => {
                assert_eq!(signal.side, Side::Long);
                assert_eq!(signal.rationale, "breakout_retest_eul");
                assert_eq!(signal.entry, 5403.0); // zone_max + 4 ticks
            }
            other => panic!("expected entry, got {:?}", other),
        }
    }

    #[test]
    fn test_breakout_with_missing_ohlc_not_vetoed() {
        let cluster = ClusterSummary {
            status: ClusterStatus::Below,
            strong: true,
            ..inside_cluster(false)
        };
        let snap = MarketSnapshot {
            price: Some(5395.0),
            orderflow: confirming_orderflow(),
            cluster: Some(cluster),
            sentiment: Some(-0.5),
            ohlc: None,
            ..base_snapshot()
        };
        match engine().evaluate(&snap) {
            Decision::Enter(signal) => assert_eq!(signal.side, Side::Short),
            other => panic!("expected entry, got {:?}", other),
        }
    }

    #[test]
    fn test_no_cluster_after_gates_is_flat() {
        let snap = MarketSnapshot {
            orderflow: confirming_orderflow(),
            ..base_snapshot()
        };
        assert_eq!(engine().evaluate(&snap).reason(), Some("no_cluster"));
    }

    #[test]
    fn test_idempotence() {
        let snap = MarketSnapshot {
            price: Some(5401.0),
            orderflow: confirming_orderflow(),
            cluster: Some(inside_cluster(true)),
            sentiment: Some(-0.5),
            structure: StructureRefs {
                vwap: Some(5400.5),
                vpoc: Some(5399.0),
                ..Default::default()
            },
            ..base_snapshot()
        };
        let eng = engine();
        let first = eng.evaluate(&snap);
        for _ in 0..10 {
            assert_eq!(eng.evaluate(&snap), first);
        }
    }

    #[test]
    fn test_regime_changes_gate_and_confidence_but_not_proximity() {
        // 2 confirmations: passes MID, fails EXTREME
        let make = |vix: f64| MarketSnapshot {
            price: Some(5401.0),
            orderflow: OrderFlow {
                delta: Some(-0.4),
                delta_burst: true,
                absorption_ask: true,
                ..Default::default()
            },
            cluster: Some(inside_cluster(true)),
            sentiment: Some(-0.5),
            volatility: Some(vix),
            ..base_snapshot()
        };

        let eng = engine();
        let mid = eng.evaluate(&make(18.0));
        let extreme = eng.evaluate(&make(50.0));

        let Decision::Enter(mid_signal) = mid else {
            panic!("MID should clear the gate");
        };
        assert_eq!(extreme.reason(), Some("gate_orderflow_conf<3 (2)"));

        // LOW also clears the gate; same proximity, different confidence
        let low = eng.evaluate(&make(10.0));
        let Decision::Enter(low_signal) = low else {
            panic!("LOW should clear the gate");
        };
        assert_eq!(low_signal.scores.proximity, mid_signal.scores.proximity);
        assert!(low_signal.confidence > mid_signal.confidence);
    }

    #[test]
    fn test_counter_trend_caution_note_carried() {
        let snap = MarketSnapshot {
            price: Some(5401.0),
            orderflow: OrderFlow {
                delta: Some(-0.4),
                delta_burst: true,
                absorption_ask: true,
                ..Default::default()
            },
            cluster: Some(inside_cluster(true)),
            sentiment: Some(-0.5),
            correlation: Some(0.92),
            ..base_snapshot()
        };
        match engine().evaluate(&snap) {
            Decision::Enter(signal) => {
                assert!(signal.notes.contains(&"counter_trend_caution".to_string()));
            }
            other => panic!("expected entry, got {:?}", other),
        }
    }

    #[test]
    fn test_all_scores_in_unit_interval() {
        let snap = MarketSnapshot {
            price: Some(5400.0),
            levels: vec![
                PricedLevel::new(5400.0, LevelType::GammaWall),
                PricedLevel::new(5400.0, LevelType::GammaWall),
                PricedLevel::new(5400.0, LevelType::ZeroDte),
            ],
            orderflow: OrderFlow {
                delta: Some(10.0),
                delta_burst: true,
                delta_flip: true,
                stacked_bid_rows: 4,
                absorption_bid: true,
                ..Default::default()
            },
            structure: StructureRefs {
                vwap: Some(5400.0),
                vpoc: Some(5400.0),
                val: Some(5400.0),
                vah: Some(5400.0),
            },
            cluster: Some(ClusterSummary {
                confluence_strength: 1.0,
                confluence: true,
                strong: false,
                ..inside_cluster(true)
            }),
            sentiment: Some(-0.9),
            volatility: Some(10.0),
            ..Default::default()
        };
        // price 5400 is equidistant-ish inside the zone -> short hint, passes
        match engine().evaluate(&snap) {
            Decision::Enter(signal) => {
                for v in [
                    signal.scores.proximity,
                    signal.scores.orderflow,
                    signal.scores.structural,
                    signal.confidence,
                ] {
                    assert!((0.0..=1.0).contains(&v), "{} out of [0,1]", v);
                }
            }
            Decision::Flat { reason } => panic!("unexpected flat: {}", reason),
        }
    }

    #[test]
    fn test_invalid_params_rejected_at_construction() {
        let params = EngineParams {
            tick_size: 0.0,
            ..Default::default()
        };
        assert!(DecisionEngine::new(params).is_err());
    }
}
