//! Out-of-process policy oracle client.
//!
//! The policy model runs as an external collaborator (in practice a
//! Python process wrapping the pretrained network). The protocol is one
//! line per query and one line per predicted move:
//!
//! ```text
//! -> query <elo_self> <elo_oppo> <fen>
//! <- e2e4 0.912
//! <- d2d4 0.051
//! <- end
//! ```

use std::collections::HashMap;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use shakmaty::Chess;
use shakmaty::uci::UciMove;
use tracing::{debug, info};

use centaur_core::{SkillContext, fen_of};
use centaur_search::{OracleError, PolicyOracle};

/// One parsed line of an oracle reply.
#[derive(Debug, Clone, PartialEq)]
enum OracleReply {
    /// A move and its probability.
    Prob(UciMove, f64),
    /// End of the reply for the current query.
    End,
}

fn parse_oracle_line(line: &str) -> Result<OracleReply, OracleError> {
    if line == "end" {
        return Ok(OracleReply::End);
    }
    let mut tokens = line.split_whitespace();
    let (Some(mv), Some(prob), None) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Err(OracleError::Protocol {
            detail: format!("malformed oracle reply: \"{line}\""),
        });
    };
    let mv: UciMove = mv.parse().map_err(|_| OracleError::Protocol {
        detail: format!("invalid move in oracle reply: \"{line}\""),
    })?;
    let prob: f64 = prob.parse().map_err(|_| OracleError::Protocol {
        detail: format!("invalid probability in oracle reply: \"{line}\""),
    })?;
    if !(0.0..=1.0).contains(&prob) {
        return Err(OracleError::Protocol {
            detail: format!("probability out of range in oracle reply: \"{line}\""),
        });
    }
    Ok(OracleReply::Prob(mv, prob))
}

/// A policy oracle running as a child process.
///
/// Explicitly constructed and disposed, like the engine client; sent
/// `quit` and reaped on drop.
#[derive(Debug)]
pub struct ProcessOracle {
    child: Child,
    writer: BufWriter<ChildStdin>,
    reader: BufReader<ChildStdout>,
}

impl ProcessOracle {
    /// Start the oracle from a command line (program plus arguments).
    pub fn spawn(command: &[String]) -> Result<Self, OracleError> {
        let (program, args) = command.split_first().ok_or(OracleError::Unavailable {
            reason: "empty oracle command".to_string(),
        })?;
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| OracleError::Unavailable {
                reason: format!("failed to start `{program}`: {err}"),
            })?;

        let stdin = child.stdin.take().expect("oracle stdin was piped");
        let stdout = child.stdout.take().expect("oracle stdout was piped");
        info!(oracle = %program, "policy oracle ready");
        Ok(ProcessOracle {
            child,
            writer: BufWriter::new(stdin),
            reader: BufReader::new(stdout),
        })
    }

    fn send(&mut self, line: &str) -> Result<(), OracleError> {
        debug!(cmd = line, "-> oracle");
        writeln!(self.writer, "{line}").map_err(unavailable)?;
        self.writer.flush().map_err(unavailable)
    }

    fn read_line(&mut self) -> Result<String, OracleError> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line).map_err(unavailable)?;
        if read == 0 {
            return Err(OracleError::Unavailable {
                reason: "oracle closed its output stream".to_string(),
            });
        }
        Ok(line.trim().to_string())
    }
}

fn unavailable(err: std::io::Error) -> OracleError {
    OracleError::Unavailable {
        reason: format!("I/O error talking to the oracle: {err}"),
    }
}

impl PolicyOracle for ProcessOracle {
    fn move_probabilities(
        &mut self,
        pos: &Chess,
        skill: SkillContext,
    ) -> Result<HashMap<UciMove, f64>, OracleError> {
        self.send(&format!(
            "query {} {} {}",
            skill.elo_self,
            skill.elo_oppo,
            fen_of(pos)
        ))?;

        let mut out = HashMap::new();
        loop {
            let line = self.read_line()?;
            if line.is_empty() {
                continue;
            }
            match parse_oracle_line(&line)? {
                OracleReply::Prob(mv, prob) => {
                    out.insert(mv, prob);
                }
                OracleReply::End => break,
            }
        }
        Ok(out)
    }
}

impl Drop for ProcessOracle {
    fn drop(&mut self) {
        let _ = self.send("quit");
        let _ = self.child.wait();
    }
}
