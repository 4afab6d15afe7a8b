//! Volatility regime classification.
//!
//! Discretizes a VIX-style reading into four bands. Every adaptive knob in
//! the Parameter Set (wick tolerance, magnet buffers, gate minimums, score
//! multiplier) is indexed by the band.

use serde::{Deserialize, Serialize};

/// Volatility band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VolatilityRegime {
    Low,
    Mid,
    High,
    Extreme,
}

impl VolatilityRegime {
    /// Classify a volatility reading. Missing readings default to Mid.
    pub fn from_reading(value: Option<f64>) -> Self {
        let Some(v) = value else {
            return VolatilityRegime::Mid;
        };
        if v < 15.0 {
            VolatilityRegime::Low
        } else if v < 22.0 {
            VolatilityRegime::Mid
        } else if v < 35.0 {
            VolatilityRegime::High
        } else {
            VolatilityRegime::Extreme
        }
    }
}

impl std::fmt::Display for VolatilityRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VolatilityRegime::Low => write!(f, "LOW"),
            VolatilityRegime::Mid => write!(f, "MID"),
            VolatilityRegime::High => write!(f, "HIGH"),
            VolatilityRegime::Extreme => write!(f, "EXTREME"),
        }
    }
}
