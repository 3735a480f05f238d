//! Skill parameters conditioning the policy oracle.

/// Strength ratings for the mover and the opponent.
///
/// Passed unchanged through the whole recursion; they parametrize the
/// policy oracle only, never the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillContext {
    /// Elo of the side whose moves are being predicted.
    pub elo_self: u32,
    /// Elo of the opponent.
    pub elo_oppo: u32,
}

impl SkillContext {
    pub fn new(elo_self: u32, elo_oppo: u32) -> Self {
        SkillContext { elo_self, elo_oppo }
    }
}
