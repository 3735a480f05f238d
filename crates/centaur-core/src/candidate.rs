//! Candidate moves considered for expansion at a node.

use shakmaty::uci::UciMove;

/// A legal move annotated with the two collaborator signals.
///
/// Candidates are ephemeral: rebuilt at every expansion step, never
/// persisted or cached across nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Canonical encoding of the move.
    pub mv: UciMove,
    /// Policy-oracle probability in [0, 1]; 0.0 when the oracle did not
    /// mention the move.
    pub prob: f64,
    /// Shallow evaluator score in centipawns, or `None` when the move did
    /// not appear in the shallow probe's top lines.
    pub shallow_cp: Option<i32>,
}

impl Candidate {
    pub fn new(mv: UciMove, prob: f64, shallow_cp: Option<i32>) -> Self {
        Candidate {
            mv,
            prob,
            shallow_cp,
        }
    }
}
