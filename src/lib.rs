// Library crate - confluence-based decision engine for futures level trading

pub mod engine;
pub mod types;

// Re-export commonly used types
pub use engine::{ConfigError, DecisionEngine, EngineParams, VolatilityRegime};
pub use types::{
    ClusterStatus, ClusterSummary, ConfidenceLabel, Decision, EntrySignal, LevelType,
    MarketSnapshot, Ohlc, OrderFlow, PricedLevel, ScoreBreakdown, Side, StructureRefs,
};
