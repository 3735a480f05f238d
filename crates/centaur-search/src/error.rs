//! Search-level errors.

use crate::evaluator::EvalError;
use crate::oracle::OracleError;

/// Hard failures of a search call.
///
/// Terminal positions and exhausted budgets are not errors — they are
/// encoded in the normal return value as leaf evaluations.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The evaluator collaborator failed.
    #[error(transparent)]
    Eval(#[from] EvalError),

    /// The policy-oracle collaborator failed.
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// A collaborator returned a move that is not legal in the position
    /// it was asked about. Indicates a collaborator or protocol defect,
    /// never silently trusted or dropped.
    #[error("collaborator returned illegal move {uci_move} for {fen}")]
    MalformedCandidate {
        /// The offending move encoding.
        uci_move: String,
        /// The position the move was supposed to apply to.
        fen: String,
    },
}
