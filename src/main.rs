//! CLI driver: evaluate snapshot JSON through the decision engine.
//!
//! The engine itself is a library call; this binary is the thin glue for
//! running it against captured snapshots from the shell.

use anyhow::{Context, Result};
use clap::Parser;
use confluence_engine::{Decision, DecisionEngine, EngineParams, MarketSnapshot};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "confluence-engine")]
#[command(about = "Evaluate market snapshots into entry/flat decisions")]
struct Args {
    /// Path to a snapshot JSON file, or a JSON array of snapshots
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Optional params JSON file overriding the default Parameter Set
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Print verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let params = match &args.params {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read params file {}", path.display()))?;
            serde_json::from_str::<EngineParams>(&raw).context("Failed to parse params JSON")?
        }
        None => EngineParams::default(),
    };
    let engine = DecisionEngine::new(params).context("Invalid engine params")?;

    let raw = std::fs::read_to_string(&args.snapshot)
        .with_context(|| format!("Failed to read snapshot file {}", args.snapshot.display()))?;

    // Accept a single snapshot object or an array of them
    let snapshots: Vec<MarketSnapshot> = match serde_json::from_str::<Vec<MarketSnapshot>>(&raw) {
        Ok(batch) => batch,
        Err(_) => vec![serde_json::from_str(&raw).context("Failed to parse snapshot JSON")?],
    };
    info!("Evaluating {} snapshot(s)", snapshots.len());

    for snapshot in &snapshots {
        let decision = engine.evaluate(snapshot);
        if let Decision::Enter(signal) = &decision {
            info!(
                "{} @ {:.2} stop {:.2} tp1 {:.2} ({}, {:.3})",
                signal.side, signal.entry, signal.stop, signal.target1, signal.label,
                signal.confidence
            );
        }
        println!("{}", serde_json::to_string_pretty(&decision)?);
    }

    Ok(())
}
