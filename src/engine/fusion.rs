//! Score fusion and confidence labeling.

use crate::engine::params::EngineParams;
use crate::engine::regime::VolatilityRegime;
use crate::types::{ClusterSummary, ConfidenceLabel, ScoreBreakdown};

/// Cluster-driven bonus on top of the weighted fusion.
///
/// Graded confluence strength earns a tiered, capped bonus; the boolean
/// confluence/strong flags each add their flat amount.
pub fn cluster_bonus(cluster: Option<&ClusterSummary>, params: &EngineParams) -> f64 {
    let Some(cluster) = cluster else {
        return 0.0;
    };
    let mut bonus = 0.0;
    if cluster.confluence_strength >= 0.7 {
        let tier: f64 = if cluster.confluence_strength >= 0.9 { 0.05 } else { 0.0 };
        bonus += (0.1 + tier).min(params.confluence_bonus_max);
    }
    if cluster.confluence {
        bonus += params.cluster_bonus;
    }
    if cluster.strong {
        bonus += params.cluster_strong_bonus;
    }
    bonus
}

/// Weighted combination of the component scores, scaled by the regime
/// multiplier and clamped to [0, 1].
pub fn fuse(scores: &ScoreBreakdown, regime: VolatilityRegime, params: &EngineParams) -> f64 {
    let composite = params.w_level * scores.proximity
        + params.w_orderflow * scores.orderflow
        + params.w_structural * scores.structural
        + scores.bonus;
    (composite * params.regimes.get(regime).score_mult).clamp(0.0, 1.0)
}

/// Map a confidence value onto the discrete label ladder.
pub fn label(confidence: f64, params: &EngineParams) -> ConfidenceLabel {
    if confidence >= params.th_extreme {
        ConfidenceLabel::Extreme
    } else if confidence >= params.th_strong {
        ConfidenceLabel::Strong
    } else if confidence >= params.th_moderate {
        ConfidenceLabel::Moderate
    } else if confidence >= params.th_weak {
        ConfidenceLabel::Weak
    } else {
        ConfidenceLabel::None
    }
}
