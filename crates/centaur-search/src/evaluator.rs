//! The positional-scoring collaborator.

use std::collections::HashMap;

use shakmaty::Chess;
use shakmaty::uci::UciMove;

/// Errors from the evaluator collaborator.
///
/// Both variants are fatal for the enclosing search call; no score is
/// ever silently defaulted in their place.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    /// The evaluator process cannot be reached or has gone away.
    #[error("evaluator unavailable: {reason}")]
    Unavailable {
        /// What failed while talking to the evaluator.
        reason: String,
    },

    /// The evaluator replied with something the protocol does not allow.
    #[error("evaluator protocol error: {detail}")]
    Protocol {
        /// The offending reply or field.
        detail: String,
    },
}

/// A positional scoring oracle with two effort levels.
///
/// Scores are signed centipawns from the perspective of the side to move
/// in the scored position. Forced mates are mapped to finite sentinel
/// magnitudes (see [`centaur_core::MATE_SCORE`]).
pub trait Evaluator {
    /// Score a position at the given effort.
    fn evaluate(&mut self, pos: &Chess, depth: u8) -> Result<i32, EvalError>;

    /// First move and score of up to `multipv` ranked lines at the given
    /// effort.
    ///
    /// Moves absent from the returned map are simply unscored by this
    /// probe; absence carries no judgement about the move.
    fn top_moves(
        &mut self,
        pos: &Chess,
        depth: u8,
        multipv: u8,
    ) -> Result<HashMap<UciMove, i32>, EvalError>;
}
