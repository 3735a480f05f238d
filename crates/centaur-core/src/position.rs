//! Position and move encoding helpers over [`shakmaty`].
//!
//! The search never owns board rules; it needs exactly three things from
//! the chess model: a canonical textual position key (FEN), a canonical
//! move encoding usable as a map key against both collaborators (UCI),
//! and legality checks for everything a collaborator hands back.

use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Move};

use crate::error::PositionError;

/// The FEN string for the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Parse a FEN string into a legal position.
pub fn position_from_fen(fen: &str) -> Result<Chess, PositionError> {
    let parsed: Fen = fen.parse().map_err(|_| PositionError::InvalidFen {
        fen: fen.to_string(),
    })?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|_| PositionError::InvalidFen {
            fen: fen.to_string(),
        })
}

/// Canonical FEN encoding of a position, usable as a cache/lookup key.
pub fn fen_of(pos: &Chess) -> String {
    Fen::from_position(pos.clone(), EnPassantMode::Legal).to_string()
}

/// Canonical UCI encoding of a move.
pub fn encode_move(mv: &Move) -> UciMove {
    mv.to_uci(CastlingMode::Standard)
}

/// Resolve a UCI encoding against a position, rejecting illegal moves.
pub fn decode_move(pos: &Chess, uci: &UciMove) -> Result<Move, PositionError> {
    uci.to_move(pos).map_err(|_| PositionError::IllegalMove {
        uci_move: uci.to_string(),
        fen: fen_of(pos),
    })
}
