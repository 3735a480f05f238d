//! Parsing of engine output lines.
//!
//! Only `info` and `bestmove` carry analysis state; everything else the
//! engine prints (`id`, option advertisements, banners) is ignored.

use std::str::{FromStr, SplitWhitespace};

use shakmaty::uci::UciMove;

use centaur_core::mate_to_cp;

use crate::error::UciError;

/// Score field of an `info` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreInfo {
    /// Centipawns from the engine's side to move.
    Centipawns(i32),
    /// Forced mate in the given number of moves; negative means the side
    /// to move gets mated.
    Mate(i32),
}

impl ScoreInfo {
    /// Collapse to centipawns, mates mapped to finite sentinel values.
    pub fn to_cp(self) -> i32 {
        match self {
            ScoreInfo::Centipawns(cp) => cp,
            ScoreInfo::Mate(moves) => mate_to_cp(moves),
        }
    }
}

/// One parsed `info` line of a running search.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoLine {
    /// Search depth reached.
    pub depth: u32,
    /// Ranked line index; 1 when the engine omits the field.
    pub multipv: u8,
    /// Reported score, absent on progress-only lines (`currmove` etc.).
    pub score: Option<ScoreInfo>,
    /// Principal variation, possibly empty.
    pub pv: Vec<UciMove>,
}

/// A line of engine output relevant to analysis.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineReply {
    /// An `info` line.
    Info(InfoLine),
    /// `bestmove <move>` — the move string is kept raw because engines
    /// report `(none)` for positions with no legal moves.
    BestMove(String),
    /// Anything else.
    Other,
}

/// Parse a single line of engine output.
pub fn parse_engine_line(line: &str) -> Result<EngineReply, UciError> {
    let mut tokens = line.split_whitespace();
    match tokens.next() {
        Some("info") => parse_info(&mut tokens).map(EngineReply::Info),
        Some("bestmove") => {
            let mv = tokens.next().ok_or(UciError::InvalidField {
                field: "bestmove",
                value: String::new(),
            })?;
            Ok(EngineReply::BestMove(mv.to_string()))
        }
        _ => Ok(EngineReply::Other),
    }
}

fn parse_info(tokens: &mut SplitWhitespace<'_>) -> Result<InfoLine, UciError> {
    let mut info = InfoLine {
        depth: 0,
        multipv: 1,
        score: None,
        pv: Vec::new(),
    };

    while let Some(token) = tokens.next() {
        match token {
            "depth" => info.depth = parse_value(tokens, "depth")?,
            "multipv" => info.multipv = parse_value(tokens, "multipv")?,
            "score" => {
                info.score = Some(match tokens.next() {
                    Some("cp") => ScoreInfo::Centipawns(parse_value(tokens, "score cp")?),
                    Some("mate") => ScoreInfo::Mate(parse_value(tokens, "score mate")?),
                    other => {
                        return Err(UciError::InvalidField {
                            field: "score",
                            value: other.unwrap_or("").to_string(),
                        });
                    }
                });
            }
            "pv" => {
                for mv in tokens.by_ref() {
                    info.pv.push(mv.parse().map_err(|_| UciError::InvalidMove {
                        uci_move: mv.to_string(),
                    })?);
                }
            }
            // `info string` consumes the rest of the line
            "string" => break,
            // Unknown keywords and their values fall through one token at
            // a time; values never collide with the keywords above.
            _ => {}
        }
    }

    Ok(info)
}

fn parse_value<T: FromStr>(
    tokens: &mut SplitWhitespace<'_>,
    field: &'static str,
) -> Result<T, UciError> {
    let value = tokens.next().ok_or(UciError::InvalidField {
        field,
        value: String::new(),
    })?;
    value.parse().map_err(|_| UciError::InvalidField {
        field,
        value: value.to_string(),
    })
}
