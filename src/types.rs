//! Market snapshot and decision data model.
//!
//! The engine is handed one fully-formed `MarketSnapshot` per call and hands
//! back one `Decision`. Everything here is plain data: serde-derived, owned
//! by the caller, no behavior beyond small classification helpers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long,
    Short,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Long => write!(f, "long"),
            Side::Short => write!(f, "short"),
        }
    }
}

/// Classification of an externally-supplied price level.
///
/// The upstream levels provider tags levels with free-form strings
/// ("Gamma Wall 0DTE", "Call Resistance", ...). Those tags are mapped onto
/// this closed set once, at snapshot construction, so the proximity scorer
/// can use an exhaustive weight table instead of string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelType {
    /// Dealer gamma wall - the strongest magnet/barrier
    GammaWall,
    /// 0DTE-specific wall
    ZeroDte,
    CallResistance,
    PutSupport,
    /// Swing / high-volume level
    SwingLevel,
    BlindSpot,
    /// Generic gamma level
    Gamma,
    /// Gamma-exposure node - weakest
    Gex,
    /// Unrecognized external tag
    Unknown,
}

impl LevelType {
    /// Importance weight used by the proximity scorer.
    ///
    /// Unknown tags get a conservative mid-weight rather than being dropped.
    pub fn weight(&self) -> f64 {
        match self {
            LevelType::GammaWall => 0.25,
            LevelType::ZeroDte => 0.20,
            LevelType::CallResistance => 0.15,
            LevelType::PutSupport => 0.15,
            LevelType::SwingLevel => 0.12,
            LevelType::BlindSpot => 0.12,
            LevelType::Gamma => 0.10,
            LevelType::Gex => 0.08,
            LevelType::Unknown => 0.10,
        }
    }

    /// Map an external provider tag onto the closed set.
    ///
    /// Matching is case-insensitive substring, most specific first, so
    /// "gamma_wall_0dte" resolves to GammaWall and plain "gamma support"
    /// to Gamma.
    pub fn from_tag(tag: &str) -> Self {
        let lt = tag.to_lowercase();
        if lt.contains("gamma_wall") || lt.contains("gamma wall") {
            LevelType::GammaWall
        } else if lt.contains("0dte") {
            LevelType::ZeroDte
        } else if lt.contains("gex") {
            LevelType::Gex
        } else if lt.contains("blind") {
            LevelType::BlindSpot
        } else if lt.contains("hvl") || lt.contains("swing") {
            LevelType::SwingLevel
        } else if lt.contains("call resistance") {
            LevelType::CallResistance
        } else if lt.contains("put support") {
            LevelType::PutSupport
        } else if lt.contains("gamma") {
            LevelType::Gamma
        } else {
            LevelType::Unknown
        }
    }
}

/// A single externally-computed significant price level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricedLevel {
    pub price: f64,
    pub level_type: LevelType,
}

impl PricedLevel {
    pub fn new(price: f64, level_type: LevelType) -> Self {
        Self { price, level_type }
    }
}

/// Raw order-flow indicators for the current bar, as supplied by the
/// order-flow aggregator. All fields optional/zeroable - absent signals
/// simply contribute no confirmation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderFlow {
    /// Normalized delta for the bar, expected in roughly [-1, 1]
    pub delta: Option<f64>,
    /// Normalized cumulative delta, used when per-bar delta is absent
    pub cumulative_delta: Option<f64>,
    /// Sudden one-sided delta surge
    pub delta_burst: bool,
    /// Delta sign flip against recent direction
    pub delta_flip: bool,
    /// Stacked-imbalance rows on the ask side
    pub stacked_ask_rows: u32,
    /// Stacked-imbalance rows on the bid side
    pub stacked_bid_rows: u32,
    /// Passive absorption detected on the bid
    pub absorption_bid: bool,
    /// Passive absorption detected on the ask
    pub absorption_ask: bool,
}

/// Session structure reference levels (the "magnets")
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureRefs {
    pub vwap: Option<f64>,
    /// Volume-profile point of control
    pub vpoc: Option<f64>,
    /// Value area low
    pub val: Option<f64>,
    /// Value area high
    pub vah: Option<f64>,
}

/// Position of price relative to the nearest cluster zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterStatus {
    Inside,
    Above,
    Below,
}

/// Pre-aggregated zone of nearby significant levels, consumed verbatim from
/// the alerts summarizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub zone_min: f64,
    pub zone_max: f64,
    pub center: f64,
    pub status: ClusterStatus,
    /// Multiple level families overlap in this zone
    pub confluence: bool,
    /// High-importance cluster
    pub strong: bool,
    /// Price has already touched the zone this session
    pub touch: bool,
    /// Graded confluence strength in [0, 1]
    #[serde(default)]
    pub confluence_strength: f64,
}

/// One bar of OHLC, used only by the true-breakout validator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ohlc {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Everything the engine needs for one decision.
///
/// Constructed fresh per call by the surrounding system; the engine keeps no
/// state between snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Reference price (last trade or mid)
    pub price: Option<f64>,
    /// Options-derived significant levels
    #[serde(default)]
    pub levels: Vec<PricedLevel>,
    #[serde(default)]
    pub orderflow: OrderFlow,
    #[serde(default)]
    pub structure: StructureRefs,
    pub cluster: Option<ClusterSummary>,
    /// MIA sentiment score in [-1, 1] (internals-derived market bias)
    pub sentiment: Option<f64>,
    /// Cross-market correlation coefficient in [-1, 1]
    pub correlation: Option<f64>,
    /// Volatility index reading (VIX-style)
    pub volatility: Option<f64>,
    /// Current bar, for breakout validation
    pub ohlc: Option<Ohlc>,
    /// Snapshot capture time, echoed into the decision
    pub timestamp: Option<DateTime<Utc>>,
}

/// Discrete confidence label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLabel {
    Extreme,
    Strong,
    Moderate,
    Weak,
    None,
}

impl std::fmt::Display for ConfidenceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfidenceLabel::Extreme => write!(f, "Extreme"),
            ConfidenceLabel::Strong => write!(f, "Strong"),
            ConfidenceLabel::Moderate => write!(f, "Moderate"),
            ConfidenceLabel::Weak => write!(f, "Weak"),
            ConfidenceLabel::None => write!(f, "None"),
        }
    }
}

/// Component scores behind a decision, kept for telemetry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub proximity: f64,
    pub orderflow: f64,
    pub structural: f64,
    pub bonus: f64,
}

/// An executable entry plan with its context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySignal {
    pub side: Side,
    pub entry: f64,
    pub stop: f64,
    pub target1: f64,
    /// Final fused confidence in [0, 1]
    pub confidence: f64,
    pub label: ConfidenceLabel,
    pub regime: crate::engine::regime::VolatilityRegime,
    /// Which setup produced the plan ("fade_cluster_eul", "breakout_retest_eul")
    pub rationale: String,
    /// Advisory annotations from non-blocking gates
    #[serde(default)]
    pub notes: Vec<String>,
    pub scores: ScoreBreakdown,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Result of one evaluation: an entry plan or a flat with a reason code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Decision {
    Flat { reason: String },
    Enter(EntrySignal),
}

impl Decision {
    pub fn flat(reason: impl Into<String>) -> Self {
        Decision::Flat {
            reason: reason.into(),
        }
    }

    pub fn is_flat(&self) -> bool {
        matches!(self, Decision::Flat { .. })
    }

    /// Flat reason code, if flat
    pub fn reason(&self) -> Option<&str> {
        match self {
            Decision::Flat { reason } => Some(reason),
            Decision::Enter(_) => None,
        }
    }
}
