//! Confluence decision engine.
//!
//! Core evaluation pipeline, leaves first:
//! - Tick-grid geometry and bucket scoring
//! - Level proximity scoring
//! - Order-flow evaluation (score + confirmation gate)
//! - Structural magnet penalty
//! - True-breakout validation
//! - Volatility regime classification
//! - Gate chain (hard + advisory)
//! - Score fusion and labeling
//! - Entry/stop/target planning
//! - The decision orchestrator tying it all together

pub mod breakout;
pub mod decision;
pub mod execution;
pub mod fusion;
pub mod gates;
pub mod geometry;
pub mod orderflow;
pub mod params;
pub mod proximity;
pub mod regime;
pub mod structure;

// Re-export commonly used types
pub use breakout::{BreakDirection, BreakoutCheck};
pub use decision::DecisionEngine;
pub use execution::TradePlan;
pub use gates::{ChainOutcome, Gate, GateInput, GateVerdict};
pub use orderflow::OrderFlowReport;
pub use params::{ConfigError, EngineParams, RegimeParams, RegimeTable};
pub use regime::VolatilityRegime;
