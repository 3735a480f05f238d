//! Candidate filtering, ranking, and capping.

use std::collections::HashMap;

use shakmaty::uci::UciMove;
use shakmaty::{Chess, Position};

use centaur_core::{Candidate, SearchParams, decode_move, encode_move, fen_of};

use crate::error::SearchError;

/// Build the capped candidate set for one expansion step.
///
/// A legal move qualifies when its policy probability strictly exceeds
/// `p_min` **or** it appears in the shallow probe's top lines. The union
/// is deliberate: a strong engine move is never filtered out by an
/// unfamiliar-looking policy probability.
///
/// Qualifying moves are ranked by shallow evaluator score (scored moves
/// first, descending), then by probability descending, and the set is
/// truncated to `children_cap`. Ranking before truncation means the cap
/// can never silently drop the best-scoring or most-probable move.
///
/// Every move key in either collaborator map must be legal in `pos`;
/// anything else is a [`SearchError::MalformedCandidate`].
pub fn build_candidates(
    pos: &Chess,
    probs: &HashMap<UciMove, f64>,
    shallow: &HashMap<UciMove, i32>,
    params: &SearchParams,
) -> Result<Vec<Candidate>, SearchError> {
    for uci in probs.keys().chain(shallow.keys()) {
        decode_move(pos, uci).map_err(|_| SearchError::MalformedCandidate {
            uci_move: uci.to_string(),
            fen: fen_of(pos),
        })?;
    }

    let mut cands: Vec<Candidate> = Vec::new();
    for mv in pos.legal_moves() {
        let uci = encode_move(&mv);
        let prob = probs.get(&uci).copied().unwrap_or(0.0);
        let shallow_cp = shallow.get(&uci).copied();
        if prob > params.p_min || shallow_cp.is_some() {
            cands.push(Candidate::new(uci, prob, shallow_cp));
        }
    }

    cands.sort_by(|a, b| {
        b.shallow_cp
            .is_some()
            .cmp(&a.shallow_cp.is_some())
            .then_with(|| {
                b.shallow_cp
                    .unwrap_or(i32::MIN)
                    .cmp(&a.shallow_cp.unwrap_or(i32::MIN))
            })
            .then_with(|| b.prob.total_cmp(&a.prob))
    });
    cands.truncate(params.children_cap);

    Ok(cands)
}
