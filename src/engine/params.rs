//! Immutable engine Parameter Set.
//!
//! Built once at startup, validated, then shared read-only across any number
//! of concurrent evaluations. Adaptive tuning must swap in a whole new
//! `EngineParams` instance, never mutate one in place.

use crate::engine::regime::VolatilityRegime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hard configuration-time failures. The engine refuses to construct with a
/// broken Parameter Set instead of misbehaving mid-decision.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("tick size must be positive, got {0}")]
    InvalidTickSize(f64),
    #[error("proximity buckets must be in ascending threshold order")]
    UnorderedBuckets,
}

/// Per-regime adaptive knobs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeParams {
    /// Wick tolerance for true-breakout confirmation, in ticks
    pub wick_tol_ticks: u32,
    /// Magnet buffer around VWAP, in ticks
    pub vwap_buffer_ticks: u32,
    /// Magnet buffer around VPOC/VAL/VAH, in ticks
    pub profile_buffer_ticks: u32,
    /// Minimum order-flow confirmations required by the hard gate
    pub min_orderflow_confs: u32,
    /// Multiplier applied to the fused composite score
    pub score_mult: f64,
}

/// One `RegimeParams` per volatility band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeTable {
    pub low: RegimeParams,
    pub mid: RegimeParams,
    pub high: RegimeParams,
    pub extreme: RegimeParams,
}

impl RegimeTable {
    pub fn get(&self, regime: VolatilityRegime) -> &RegimeParams {
        match regime {
            VolatilityRegime::Low => &self.low,
            VolatilityRegime::Mid => &self.mid,
            VolatilityRegime::High => &self.high,
            VolatilityRegime::Extreme => &self.extreme,
        }
    }
}

impl Default for RegimeTable {
    fn default() -> Self {
        // Calm regimes: tight wicks, few confirmations, slight score boost.
        // Stressed regimes: loose wicks, wide buffers, more confirmations,
        // haircut on the composite.
        Self {
            low: RegimeParams {
                wick_tol_ticks: 3,
                vwap_buffer_ticks: 1,
                profile_buffer_ticks: 1,
                min_orderflow_confs: 2,
                score_mult: 1.05,
            },
            mid: RegimeParams {
                wick_tol_ticks: 5,
                vwap_buffer_ticks: 2,
                profile_buffer_ticks: 2,
                min_orderflow_confs: 2,
                score_mult: 1.00,
            },
            high: RegimeParams {
                wick_tol_ticks: 7,
                vwap_buffer_ticks: 3,
                profile_buffer_ticks: 3,
                min_orderflow_confs: 3,
                score_mult: 0.90,
            },
            extreme: RegimeParams {
                wick_tol_ticks: 7,
                vwap_buffer_ticks: 4,
                profile_buffer_ticks: 4,
                min_orderflow_confs: 3,
                score_mult: 0.85,
            },
        }
    }
}

/// Full engine configuration.
///
/// Defaults carry the calibrated NQ constants. Any subset can be overridden
/// from a JSON params file thanks to `serde(default)`.
///
/// Note: an earlier revision of this config described a per-regime vote-count
/// adjustment (+1/-1 confirmation votes by band). It was never wired into the
/// gate chain; the extension point today is `gates::default_chain`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParams {
    /// Minimum price increment (NQ/ES: 0.25)
    pub tick_size: f64,

    /// Ordered (tick-distance threshold, score) pairs for proximity scoring.
    /// The first bucket whose threshold covers the distance wins.
    pub prox_buckets: Vec<(f64, f64)>,

    /// Fusion weight for level proximity
    pub w_level: f64,
    /// Fusion weight for order-flow score
    pub w_orderflow: f64,
    /// Fusion weight for structural context
    pub w_structural: f64,

    /// Confidence label thresholds, descending
    pub th_extreme: f64,
    pub th_strong: f64,
    pub th_moderate: f64,
    pub th_weak: f64,

    /// Cap on the graded confluence-strength bonus
    pub confluence_bonus_max: f64,
    /// Flat bonus when the cluster confluence flag is set
    pub cluster_bonus: f64,
    /// Flat bonus when the cluster strong flag is set
    pub cluster_strong_bonus: f64,

    /// Sentiment gate: longs need sentiment >= this
    pub sentiment_long_thr: f64,
    /// Sentiment gate: shorts need sentiment <= this (signed)
    pub sentiment_short_thr: f64,

    /// |correlation| above this flags counter-trend caution (advisory only)
    pub corr_advisory_abs: f64,

    /// Deduction per structural magnet within its buffer
    pub magnet_penalty: f64,

    pub regimes: RegimeTable,

    /// Stop distance from the triggering level, in ticks
    pub unified_stop_ticks: u32,
    /// Entry offset from the triggering level, in ticks
    pub entry_offset_ticks: u32,
    /// Reward multiple for target1
    pub reward_multiple: f64,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            tick_size: 0.25,
            prox_buckets: vec![(2.0, 1.0), (4.0, 0.7), (8.0, 0.4), (16.0, 0.1), (32.0, 0.05)],
            w_level: 0.55,
            w_orderflow: 0.30,
            w_structural: 0.15,
            th_extreme: 0.90,
            th_strong: 0.75,
            th_moderate: 0.60,
            th_weak: 0.45,
            confluence_bonus_max: 0.15,
            cluster_bonus: 0.05,
            cluster_strong_bonus: 0.10,
            sentiment_long_thr: 0.20,
            sentiment_short_thr: -0.20,
            corr_advisory_abs: 0.80,
            magnet_penalty: 0.15,
            regimes: RegimeTable::default(),
            unified_stop_ticks: 7,
            entry_offset_ticks: 4,
            reward_multiple: 1.2,
        }
    }
}

impl EngineParams {
    /// Validate the hard constraints. Called by `DecisionEngine::new`; a
    /// failure here must never be deferred to decision time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_size <= 0.0 {
            return Err(ConfigError::InvalidTickSize(self.tick_size));
        }
        let ordered = self
            .prox_buckets
            .windows(2)
            .all(|w| w[0].0 <= w[1].0);
        if !ordered {
            return Err(ConfigError::UnorderedBuckets);
        }
        Ok(())
    }
}
