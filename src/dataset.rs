//! Benchmark dataset loading.

use std::fs::File;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// One benchmark row: a position, the move the human actually played,
/// and the two player ratings conditioning the policy oracle.
#[derive(Debug, Clone, Deserialize)]
pub struct BenchmarkRow {
    pub fen: String,
    #[serde(rename = "move")]
    pub reference_move: String,
    pub elo_self: u32,
    pub elo_oppo: u32,
}

/// Load a CSV dataset with columns `fen,move,elo_self,elo_oppo`.
pub fn load_rows(path: &Path) -> Result<Vec<BenchmarkRow>> {
    let file =
        File::open(path).with_context(|| format!("opening dataset {}", path.display()))?;
    read_rows(file).with_context(|| format!("parsing dataset {}", path.display()))
}

fn read_rows<R: io::Read>(input: R) -> Result<Vec<BenchmarkRow>> {
    let mut reader = csv::Reader::from_reader(input);
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}
