//! The move-probability collaborator.

use std::collections::HashMap;

use shakmaty::Chess;
use shakmaty::uci::UciMove;

use centaur_core::SkillContext;

/// Errors from the policy-oracle collaborator.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// The oracle process or model cannot be reached.
    #[error("policy oracle unavailable: {reason}")]
    Unavailable {
        /// What failed while talking to the oracle.
        reason: String,
    },

    /// The oracle replied with something the protocol does not allow.
    #[error("policy oracle protocol error: {detail}")]
    Protocol {
        /// The offending reply or field.
        detail: String,
    },
}

/// Predicts how a human of a given strength would move.
///
/// Returns a probability in [0, 1] per legal move; the probabilities need
/// not sum to 1. A move absent from the map is treated as probability 0
/// by the search: absence is a prediction, not an error.
pub trait PolicyOracle {
    fn move_probabilities(
        &mut self,
        pos: &Chess,
        skill: SkillContext,
    ) -> Result<HashMap<UciMove, f64>, OracleError>;
}
