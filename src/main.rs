//! Batch driver: run one policy-guided search per benchmark row.

mod dataset;
mod oracle;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use centaur_core::{SearchParams, SkillContext, position_from_fen};
use centaur_search::{SearchControl, Searcher};
use centaur_uci::UciClient;

use crate::dataset::load_rows;
use crate::oracle::ProcessOracle;

#[derive(Debug, Parser)]
#[command(name = "centaur", about = "Policy-guided engine search over a benchmark dataset")]
struct Args {
    /// Path to the UCI engine binary.
    #[arg(long)]
    engine: String,

    /// Policy oracle command: program followed by its arguments.
    #[arg(long, num_args = 1.., required = true)]
    oracle: Vec<String>,

    /// CSV dataset with columns fen,move,elo_self,elo_oppo.
    #[arg(long)]
    data: PathBuf,

    /// Plies to descend from each root before scoring leaves.
    #[arg(long, default_value_t = 3)]
    max_depth: u8,

    /// Wall-clock budget per search, in milliseconds.
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Process only the first N rows.
    #[arg(long)]
    limit: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    info!("centaur starting");

    let rows = load_rows(&args.data)?;
    let evaluator = UciClient::spawn(&args.engine)?;
    let oracle = ProcessOracle::spawn(&args.oracle)?;
    let params = SearchParams {
        max_depth: args.max_depth,
        ..SearchParams::default()
    };
    let mut searcher = Searcher::new(evaluator, oracle, params);

    let take = args.limit.unwrap_or(rows.len());
    for row in rows.into_iter().take(take) {
        let pos = position_from_fen(&row.fen)?;
        let skill = SkillContext::new(row.elo_self, row.elo_oppo);
        let control = SearchControl::with_budget(
            Arc::new(AtomicBool::new(false)),
            args.time_limit_ms.map(Duration::from_millis),
            None,
        );

        let result = searcher.search(&pos, skill, &control)?;
        if result.has_continuation() {
            let agrees = result
                .pv
                .first()
                .is_some_and(|mv| mv.to_string() == row.reference_move);
            info!(
                fen = %row.fen,
                score = result.score,
                pv = %result.pv,
                reference = %row.reference_move,
                agrees,
                nodes = result.nodes,
                "row searched"
            );
            println!(
                "{} | score cp {} | pv {} | played {}",
                row.fen, result.score, result.pv, row.reference_move
            );
        } else {
            warn!(fen = %row.fen, "no viable continuation found");
            println!("{} | no viable continuation", row.fen);
        }
    }

    info!("centaur done");
    Ok(())
}
