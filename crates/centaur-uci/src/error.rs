//! UCI client errors.

use centaur_search::EvalError;

/// Errors that can occur while driving the external engine.
#[derive(Debug, thiserror::Error)]
pub enum UciError {
    /// The engine executable could not be started.
    #[error("failed to start engine `{path}`: {source}")]
    Spawn {
        /// The path that was executed.
        path: String,
        /// The underlying spawn failure.
        source: std::io::Error,
    },

    /// The engine process closed its output stream.
    #[error("engine closed its output stream")]
    EngineClosed,

    /// An I/O error occurred on the engine's stdio pipes.
    #[error("I/O error talking to the engine: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A numeric field in an engine reply could not be parsed.
    #[error("invalid {field} in engine reply: \"{value}\"")]
    InvalidField {
        /// The field name ("depth", "multipv", "score", ...).
        field: &'static str,
        /// The unparseable value.
        value: String,
    },

    /// A move in an engine `pv` could not be parsed as UCI notation.
    #[error("invalid move in engine pv: {uci_move}")]
    InvalidMove {
        /// The move string that failed to parse.
        uci_move: String,
    },

    /// The engine finished a `go` without ever reporting a score.
    #[error("engine reported no score for position {fen}")]
    MissingScore {
        /// The analysed position.
        fen: String,
    },
}

impl From<UciError> for EvalError {
    fn from(err: UciError) -> Self {
        let transport = matches!(
            err,
            UciError::Spawn { .. } | UciError::EngineClosed | UciError::Io { .. }
        );
        if transport {
            EvalError::Unavailable {
                reason: err.to_string(),
            }
        } else {
            EvalError::Protocol {
                detail: err.to_string(),
            }
        }
    }
}
