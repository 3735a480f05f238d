//! The bounded policy-guided recursion.

use shakmaty::{Chess, Position};
use tracing::{debug, trace};

use centaur_core::{Line, SCORE_NONE, SearchParams, SearchResult, SkillContext, decode_move, fen_of};

use crate::candidates::build_candidates;
use crate::control::SearchControl;
use crate::error::SearchError;
use crate::evaluator::Evaluator;
use crate::oracle::PolicyOracle;

/// Depth-first searcher over injected collaborators.
///
/// Owns the evaluator and the policy oracle for its lifetime; both are
/// explicitly constructed by the caller and recoverable via
/// [`into_parts`](Searcher::into_parts), so independent searches and
/// tests can run against independent or mocked collaborators.
///
/// Scoring convention: every score is expressed from the perspective of
/// the side to move at the node that produced it. A child's score is
/// negated when folded into its parent's comparison, so the result of
/// [`search`](Searcher::search) is from the root mover's perspective.
pub struct Searcher<E, P> {
    evaluator: E,
    oracle: P,
    params: SearchParams,
}

impl<E: Evaluator, P: PolicyOracle> Searcher<E, P> {
    pub fn new(evaluator: E, oracle: P, params: SearchParams) -> Self {
        Searcher {
            evaluator,
            oracle,
            params,
        }
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn oracle(&self) -> &P {
        &self.oracle
    }

    /// Release the collaborators for reuse or disposal.
    pub fn into_parts(self) -> (E, P) {
        (self.evaluator, self.oracle)
    }

    /// Search `pos` and return the best line found, scored from the
    /// perspective of the side to move in `pos`.
    ///
    /// An exhausted budget (depth, deadline, or node cap) turns the
    /// affected nodes into leaves; a position with no viable candidates
    /// yields [`SearchResult::none`]. Collaborator failures and illegal
    /// collaborator moves are the only errors.
    pub fn search(
        &mut self,
        pos: &Chess,
        skill: SkillContext,
        control: &SearchControl,
    ) -> Result<SearchResult, SearchError> {
        let mut nodes = 0;
        let (score, pv) = self.node(pos, 0, skill, control, &mut nodes)?;
        debug!(score, nodes, pv = %pv, "search finished");
        Ok(SearchResult { score, pv, nodes })
    }

    /// One recursion step. `depth` counts plies consumed from the root,
    /// starting at 0.
    fn node(
        &mut self,
        pos: &Chess,
        depth: u8,
        skill: SkillContext,
        control: &SearchControl,
        nodes: &mut u64,
    ) -> Result<(i32, Line), SearchError> {
        *nodes += 1;

        let exhausted = depth >= self.params.max_depth || control.should_stop(*nodes);
        if exhausted || pos.is_game_over() {
            // The one place deep evaluator effort is spent.
            let score = self.evaluator.evaluate(pos, self.params.deep_depth)?;
            trace!(depth, score, "leaf");
            return Ok((score, Line::new()));
        }

        let probs = self.oracle.move_probabilities(pos, skill)?;
        let shallow =
            self.evaluator
                .top_moves(pos, self.params.shallow_depth, self.params.multipv)?;
        let cands = build_candidates(pos, &probs, &shallow, &self.params)?;
        trace!(depth, candidates = cands.len(), "expanding");

        let mut best_score = SCORE_NONE;
        let mut best_line = Line::new();

        for cand in cands {
            // Candidates were built from this position's legal moves, so
            // resolving the encoding cannot fail here.
            let mv = decode_move(pos, &cand.mv).map_err(|_| SearchError::MalformedCandidate {
                uci_move: cand.mv.to_string(),
                fen: fen_of(pos),
            })?;

            let mut child = pos.clone();
            child.play_unchecked(&mv);

            let (child_score, child_line) = self.node(&child, depth + 1, skill, control, nodes)?;
            if child_score == SCORE_NONE {
                // The child found no viable continuation; there is nothing
                // comparable to fold in, and the sentinel must not be negated.
                continue;
            }

            // Re-anchor the child's score to this node's mover.
            let score = -child_score;
            if score > best_score {
                best_score = score;
                best_line = child_line;
                best_line.prepend(cand.mv);
            }
        }

        Ok((best_score, best_line))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use shakmaty::uci::UciMove;

    use centaur_core::{STARTING_FEN, position_from_fen};

    use super::*;
    use crate::evaluator::EvalError;
    use crate::oracle::OracleError;

    const AFTER_E2E4: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";
    const AFTER_F2F3: &str = "rnbqkbnr/pppppppp/8/8/8/5P2/PPPPP1PP/RNBQKBNR b KQkq - 0 1";
    const AFTER_G1F3: &str = "rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b KQkq - 1 1";
    const AFTER_E2E4_E7E5: &str = "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2";
    // Black king on h8, white queen on g7, white king on f6 — black is checkmated.
    const CHECKMATED: &str = "7k/6Q1/5K2/8/8/8/8/8 b - - 0 1";

    #[derive(Default)]
    struct StubEvaluator {
        deep: HashMap<String, i32>,
        tops: HashMap<String, Vec<(String, i32)>>,
        deep_calls: Vec<(String, u8)>,
        shallow_calls: u64,
    }

    impl StubEvaluator {
        fn with_deep(mut self, fen: &str, score: i32) -> Self {
            self.deep.insert(fen.to_string(), score);
            self
        }

        fn with_tops(mut self, fen: &str, lines: &[(&str, i32)]) -> Self {
            self.tops.insert(
                fen.to_string(),
                lines.iter().map(|(m, cp)| (m.to_string(), *cp)).collect(),
            );
            self
        }
    }

    impl Evaluator for StubEvaluator {
        fn evaluate(&mut self, pos: &Chess, depth: u8) -> Result<i32, EvalError> {
            let fen = fen_of(pos);
            self.deep_calls.push((fen.clone(), depth));
            self.deep
                .get(&fen)
                .copied()
                .ok_or_else(|| EvalError::Protocol {
                    detail: format!("no stub evaluation for {fen}"),
                })
        }

        fn top_moves(
            &mut self,
            pos: &Chess,
            _depth: u8,
            _multipv: u8,
        ) -> Result<HashMap<UciMove, i32>, EvalError> {
            self.shallow_calls += 1;
            Ok(self
                .tops
                .get(&fen_of(pos))
                .map(|lines| {
                    lines
                        .iter()
                        .map(|(m, cp)| (m.parse().unwrap(), *cp))
                        .collect()
                })
                .unwrap_or_default())
        }
    }

    #[derive(Default)]
    struct StubOracle {
        probs: HashMap<String, Vec<(String, f64)>>,
        seen_skill: Vec<SkillContext>,
    }

    impl StubOracle {
        fn with_probs(mut self, fen: &str, probs: &[(&str, f64)]) -> Self {
            self.probs.insert(
                fen.to_string(),
                probs.iter().map(|(m, p)| (m.to_string(), *p)).collect(),
            );
            self
        }
    }

    impl PolicyOracle for StubOracle {
        fn move_probabilities(
            &mut self,
            pos: &Chess,
            skill: SkillContext,
        ) -> Result<HashMap<UciMove, f64>, OracleError> {
            self.seen_skill.push(skill);
            Ok(self
                .probs
                .get(&fen_of(pos))
                .map(|probs| {
                    probs
                        .iter()
                        .map(|(m, p)| (m.parse().unwrap(), *p))
                        .collect()
                })
                .unwrap_or_default())
        }
    }

    fn skill() -> SkillContext {
        SkillContext::new(1600, 1500)
    }

    fn run(
        evaluator: StubEvaluator,
        oracle: StubOracle,
        params: SearchParams,
        fen: &str,
    ) -> (Result<SearchResult, SearchError>, Searcher<StubEvaluator, StubOracle>) {
        let pos = position_from_fen(fen).unwrap();
        let control = SearchControl::unlimited(Arc::new(AtomicBool::new(false)));
        let mut searcher = Searcher::new(evaluator, oracle, params);
        let result = searcher.search(&pos, skill(), &control);
        (result, searcher)
    }

    fn depth_params(max_depth: u8) -> SearchParams {
        SearchParams {
            max_depth,
            ..SearchParams::default()
        }
    }

    #[test]
    fn depth_exhausted_root_is_scored_as_a_leaf() {
        let evaluator = StubEvaluator::default().with_deep(STARTING_FEN, 12);
        let (result, searcher) = run(evaluator, StubOracle::default(), depth_params(0), STARTING_FEN);
        let result = result.unwrap();
        assert_eq!(result.score, 12);
        assert!(result.pv.is_empty());
        assert_eq!(result.nodes, 1);
        // Exactly one deep probe at full effort, no expansion queries
        assert_eq!(searcher.evaluator().deep_calls, vec![(STARTING_FEN.to_string(), 18)]);
        assert_eq!(searcher.evaluator().shallow_calls, 0);
        assert!(searcher.oracle().seen_skill.is_empty());
    }

    #[test]
    fn terminal_position_is_a_leaf_with_budget_remaining() {
        let evaluator = StubEvaluator::default().with_deep(CHECKMATED, -100_000);
        let (result, searcher) = run(evaluator, StubOracle::default(), depth_params(3), CHECKMATED);
        let result = result.unwrap();
        assert_eq!(result.score, -100_000);
        assert!(result.pv.is_empty());
        assert!(searcher.oracle().seen_skill.is_empty(), "terminal nodes must not query the oracle");
    }

    #[test]
    fn start_position_depth_one_follows_the_agreed_move() {
        // The one-candidate opening scenario: the oracle strongly expects
        // e2e4, the shallow probe agrees at +30, and the resulting
        // position evaluates to 35 for the root mover (-35 for the reply
        // side, which is the perspective leaf scores arrive in).
        let evaluator = StubEvaluator::default()
            .with_tops(STARTING_FEN, &[("e2e4", 30)])
            .with_deep(AFTER_E2E4, -35);
        let oracle = StubOracle::default().with_probs(STARTING_FEN, &[("e2e4", 0.95)]);
        let (result, _) = run(evaluator, oracle, depth_params(1), STARTING_FEN);
        let result = result.unwrap();
        assert_eq!(result.score, 35);
        assert_eq!(result.pv.to_string(), "e2e4");
        assert_eq!(result.nodes, 2);
    }

    #[test]
    fn child_scores_are_negated_across_the_turn_flip() {
        // After e2e4 the reply side stands at -50 (good for the root);
        // after f2f3 it stands at +20 (bad for the root). Comparing the
        // raw child scores without negation would pick f2f3.
        let evaluator = StubEvaluator::default()
            .with_tops(STARTING_FEN, &[("e2e4", 10), ("f2f3", 15)])
            .with_deep(AFTER_E2E4, -50)
            .with_deep(AFTER_F2F3, 20);
        let (result, _) = run(evaluator, StubOracle::default(), depth_params(1), STARTING_FEN);
        let result = result.unwrap();
        assert_eq!(result.pv.to_string(), "e2e4");
        assert_eq!(result.score, 50);
    }

    #[test]
    fn empty_candidate_set_returns_sentinel_not_error() {
        let evaluator = StubEvaluator::default();
        let oracle = StubOracle::default().with_probs(STARTING_FEN, &[("e2e4", 0.5)]);
        let (result, _) = run(evaluator, oracle, depth_params(1), STARTING_FEN);
        let result = result.unwrap();
        assert!(!result.has_continuation());
        assert_eq!(result.score, SCORE_NONE);
        assert!(result.pv.is_empty());
    }

    #[test]
    fn children_cap_bounds_the_number_of_expansions() {
        let moves: [(&str, i32); 10] = [
            ("a2a3", 1),
            ("b2b3", 2),
            ("c2c3", 3),
            ("d2d3", 4),
            ("e2e3", 5),
            ("f2f3", 6),
            ("g2g3", 7),
            ("h2h3", 8),
            ("a2a4", 9),
            ("b2b4", 10),
        ];
        let mut evaluator = StubEvaluator::default().with_tops(STARTING_FEN, &moves);
        // Every reply position scores the same; only the expansion count matters.
        for (mv, _) in &moves {
            let pos = position_from_fen(STARTING_FEN).unwrap();
            let uci: UciMove = mv.parse().unwrap();
            let mut child = pos.clone();
            child.play_unchecked(&decode_move(&pos, &uci).unwrap());
            evaluator = evaluator.with_deep(&fen_of(&child), -10);
        }
        let (result, searcher) = run(evaluator, StubOracle::default(), depth_params(1), STARTING_FEN);
        let result = result.unwrap();
        assert_eq!(searcher.evaluator().deep_calls.len(), 8, "cap is 8 expansions");
        assert_eq!(result.nodes, 9);
    }

    #[test]
    fn shallow_probe_moves_expand_despite_zero_probability() {
        let evaluator = StubEvaluator::default()
            .with_tops(STARTING_FEN, &[("g1f3", 25)])
            .with_deep(AFTER_G1F3, -5);
        // Oracle has never heard of g1f3
        let oracle = StubOracle::default().with_probs(STARTING_FEN, &[("d2d4", 0.1)]);
        let (result, _) = run(evaluator, oracle, depth_params(1), STARTING_FEN);
        let result = result.unwrap();
        assert_eq!(result.pv.to_string(), "g1f3");
        assert_eq!(result.score, 5);
    }

    #[test]
    fn returned_line_is_legal_from_the_root() {
        let evaluator = StubEvaluator::default()
            .with_tops(STARTING_FEN, &[("e2e4", 30)])
            .with_tops(AFTER_E2E4, &[("e7e5", -28)])
            .with_deep(AFTER_E2E4_E7E5, 25);
        let oracle = StubOracle::default()
            .with_probs(STARTING_FEN, &[("e2e4", 0.9)])
            .with_probs(AFTER_E2E4, &[("e7e5", 0.9)]);
        let (result, _) = run(evaluator, oracle, depth_params(2), STARTING_FEN);
        let result = result.unwrap();
        assert_eq!(result.pv.len(), 2);
        assert_eq!(result.score, 25);

        // Walk the line move by move; every step must be legal.
        let mut pos = position_from_fen(STARTING_FEN).unwrap();
        for uci in result.pv.iter() {
            let mv = decode_move(&pos, uci).expect("line contains an illegal move");
            pos.play_unchecked(&mv);
        }
    }

    #[test]
    fn deepening_does_not_worsen_the_root_score() {
        let stubs = || {
            let evaluator = StubEvaluator::default()
                .with_tops(STARTING_FEN, &[("e2e4", 30)])
                .with_deep(AFTER_E2E4, -35)
                .with_tops(AFTER_E2E4, &[("e7e5", -30)])
                .with_deep(AFTER_E2E4_E7E5, 40);
            let oracle = StubOracle::default()
                .with_probs(STARTING_FEN, &[("e2e4", 0.95)])
                .with_probs(AFTER_E2E4, &[("e7e5", 0.9)]);
            (evaluator, oracle)
        };
        let (evaluator, oracle) = stubs();
        let (shallow, _) = run(evaluator, oracle, depth_params(1), STARTING_FEN);
        let (evaluator, oracle) = stubs();
        let (deep, _) = run(evaluator, oracle, depth_params(2), STARTING_FEN);
        let (shallow, deep) = (shallow.unwrap(), deep.unwrap());
        assert!(
            deep.score >= shallow.score,
            "depth 2 score {} is worse than depth 1 score {}",
            deep.score,
            shallow.score
        );
    }

    #[test]
    fn identical_inputs_produce_identical_results() {
        let stubs = || {
            let evaluator = StubEvaluator::default()
                .with_tops(STARTING_FEN, &[("e2e4", 30), ("d2d4", 28)])
                .with_deep(AFTER_E2E4, -35)
                .with_deep(
                    "rnbqkbnr/pppppppp/8/8/3P4/8/PPP1PPPP/RNBQKBNR b KQkq - 0 1",
                    -20,
                );
            let oracle = StubOracle::default().with_probs(STARTING_FEN, &[("e2e4", 0.95)]);
            (evaluator, oracle)
        };
        let (evaluator, oracle) = stubs();
        let (first, _) = run(evaluator, oracle, depth_params(1), STARTING_FEN);
        let (evaluator, oracle) = stubs();
        let (second, _) = run(evaluator, oracle, depth_params(1), STARTING_FEN);
        assert_eq!(first.unwrap(), second.unwrap());
    }

    #[test]
    fn node_budget_collapses_the_search_to_a_leaf() {
        let evaluator = StubEvaluator::default().with_deep(STARTING_FEN, 7);
        let pos = position_from_fen(STARTING_FEN).unwrap();
        let stopped = Arc::new(AtomicBool::new(false));
        let control = SearchControl::with_budget(Arc::clone(&stopped), None, Some(1));
        let mut searcher = Searcher::new(evaluator, StubOracle::default(), depth_params(3));
        let result = searcher.search(&pos, skill(), &control).unwrap();
        assert_eq!(result.score, 7);
        assert!(result.pv.is_empty());
        assert!(stopped.load(Ordering::Acquire), "budget expiry latches the stop flag");
    }

    #[test]
    fn illegal_collaborator_move_fails_the_search() {
        let evaluator = StubEvaluator::default().with_tops(STARTING_FEN, &[("e2e5", 50)]);
        let (result, _) = run(evaluator, StubOracle::default(), depth_params(1), STARTING_FEN);
        assert!(matches!(result, Err(SearchError::MalformedCandidate { .. })));
    }

    #[test]
    fn evaluator_failure_propagates_as_a_hard_error() {
        // No stubbed leaf score: the evaluator errors instead of defaulting.
        let (result, _) = run(
            StubEvaluator::default(),
            StubOracle::default(),
            depth_params(0),
            STARTING_FEN,
        );
        assert!(matches!(result, Err(SearchError::Eval(_))));
    }

    #[test]
    fn skill_context_passes_through_the_whole_recursion() {
        let evaluator = StubEvaluator::default()
            .with_tops(STARTING_FEN, &[("e2e4", 30)])
            .with_tops(AFTER_E2E4, &[("e7e5", -28)])
            .with_deep(AFTER_E2E4_E7E5, 25);
        let oracle = StubOracle::default()
            .with_probs(STARTING_FEN, &[("e2e4", 0.9)])
            .with_probs(AFTER_E2E4, &[("e7e5", 0.9)]);
        let (result, searcher) = run(evaluator, oracle, depth_params(2), STARTING_FEN);
        result.unwrap();
        let seen = &searcher.oracle().seen_skill;
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|s| *s == skill()));
    }
}
