//! Errors for position and move-encoding handling.

/// Errors that occur when decoding positions or move encodings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    /// The FEN string could not be parsed or describes an illegal position.
    #[error("invalid FEN: {fen}")]
    InvalidFen {
        /// The FEN string that failed to parse.
        fen: String,
    },

    /// A move encoding could not be parsed as UCI notation.
    #[error("invalid move encoding: {uci_move}")]
    InvalidMoveEncoding {
        /// The move string that failed to parse.
        uci_move: String,
    },

    /// A syntactically valid move is not legal in the given position.
    #[error("illegal move {uci_move} in position {fen}")]
    IllegalMove {
        /// The UCI encoding of the offending move.
        uci_move: String,
        /// The position the move was checked against.
        fen: String,
    },
}
