//! Tunable search parameters.

/// Knobs governing how aggressively the search prunes and how much
/// evaluator effort it spends.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    /// Plies descended from the root before a node is scored as a leaf.
    pub max_depth: u8,
    /// Evaluator effort for the per-node candidate probe.
    pub shallow_depth: u8,
    /// Evaluator effort for leaf scoring. The dominant cost of a search.
    pub deep_depth: u8,
    /// Number of ranked lines requested from the shallow probe.
    pub multipv: u8,
    /// Policy probability a move must exceed to qualify as a candidate on
    /// its own; moves in the shallow probe's lines qualify regardless.
    pub p_min: f64,
    /// Most candidates expanded at any node, enforced after ranking.
    pub children_cap: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            max_depth: 3,
            shallow_depth: 10,
            deep_depth: 18,
            multipv: 6,
            p_min: 0.8,
            children_cap: 8,
        }
    }
}
