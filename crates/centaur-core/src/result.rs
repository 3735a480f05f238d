//! Result of a completed search call.

use crate::line::Line;
use crate::score::SCORE_NONE;

/// Score and principal variation returned by a search.
///
/// The score is in centipawns from the perspective of the side to move in
/// the searched position. An empty line with [`SCORE_NONE`] means no
/// viable continuation survived candidate filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Evaluation in centipawns from the mover's perspective.
    pub score: i32,
    /// Principal variation from the searched position.
    pub pv: Line,
    /// Nodes visited, leaves included.
    pub nodes: u64,
}

impl SearchResult {
    /// The "no viable continuation" result.
    pub fn none() -> Self {
        SearchResult {
            score: SCORE_NONE,
            pv: Line::new(),
            nodes: 0,
        }
    }

    /// Whether the search found any continuation at all.
    pub fn has_continuation(&self) -> bool {
        self.score != SCORE_NONE
    }
}
