//! Core domain types for policy-guided search: scores, lines, candidates,
//! skill parameters, and position encoding helpers.

mod candidate;
mod error;
mod line;
mod params;
mod position;
mod result;
mod score;
mod skill;

pub use candidate::Candidate;
pub use error::PositionError;
pub use line::Line;
pub use params::SearchParams;
pub use position::{STARTING_FEN, decode_move, encode_move, fen_of, position_from_fen};
pub use result::SearchResult;
pub use score::{MATE_SCORE, MATE_THRESHOLD, SCORE_NONE, is_mate_score, mate_to_cp};
pub use skill::SkillContext;
