//! The engine process and its analysis session.

use std::collections::{BTreeMap, HashMap, btree_map::Entry};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use shakmaty::Chess;
use shakmaty::uci::UciMove;
use tracing::{debug, info};

use centaur_core::fen_of;
use centaur_search::{EvalError, Evaluator};

use crate::error::UciError;
use crate::info::{EngineReply, InfoLine, parse_engine_line};

/// A UCI engine running as a child process.
///
/// Owns the process for its lifetime: explicitly constructed with
/// [`spawn`](UciClient::spawn), sent `quit` and reaped on drop. One
/// client per search worker; the protocol is strictly request/response,
/// with at most one `go` outstanding.
#[derive(Debug)]
pub struct UciClient {
    child: Child,
    writer: BufWriter<ChildStdin>,
    reader: BufReader<ChildStdout>,
    /// Last MultiPV value sent, to avoid resending the option per query.
    multipv: u8,
}

impl UciClient {
    /// Start the engine at `path` and complete the UCI handshake.
    pub fn spawn(path: &str) -> Result<Self, UciError> {
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| UciError::Spawn {
                path: path.to_string(),
                source,
            })?;

        let stdin = child.stdin.take().expect("engine stdin was piped");
        let stdout = child.stdout.take().expect("engine stdout was piped");
        let mut client = UciClient {
            child,
            writer: BufWriter::new(stdin),
            reader: BufReader::new(stdout),
            multipv: 1,
        };

        client.send("uci")?;
        client.wait_for("uciok")?;
        client.send("isready")?;
        client.wait_for("readyok")?;
        info!(engine = path, "engine ready");
        Ok(client)
    }

    /// Set a UCI option and wait for the engine to acknowledge readiness.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), UciError> {
        self.send(&format!("setoption name {name} value {value}"))?;
        self.send("isready")?;
        self.wait_for("readyok")
    }

    fn send(&mut self, line: &str) -> Result<(), UciError> {
        debug!(cmd = line, "-> engine");
        writeln!(self.writer, "{line}")?;
        self.writer.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, UciError> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line)?;
        if read == 0 {
            return Err(UciError::EngineClosed);
        }
        Ok(line.trim().to_string())
    }

    fn wait_for(&mut self, token: &str) -> Result<(), UciError> {
        loop {
            if self.read_line()? == token {
                return Ok(());
            }
        }
    }

    fn ensure_multipv(&mut self, multipv: u8) -> Result<(), UciError> {
        if self.multipv != multipv {
            self.set_option("MultiPV", &multipv.to_string())?;
            self.multipv = multipv;
        }
        Ok(())
    }

    /// Run `go depth` on a position and collect the final reported line
    /// per multipv slot, keyed by slot index.
    fn analyse(
        &mut self,
        pos: &Chess,
        depth: u8,
        multipv: u8,
    ) -> Result<BTreeMap<u8, InfoLine>, UciError> {
        self.ensure_multipv(multipv)?;
        self.send(&format!("position fen {}", fen_of(pos)))?;
        self.send(&format!("go depth {depth}"))?;

        let mut slots: BTreeMap<u8, InfoLine> = BTreeMap::new();
        loop {
            let line = self.read_line()?;
            match parse_engine_line(&line)? {
                EngineReply::Info(info) => {
                    if info.score.is_none() {
                        continue;
                    }
                    match slots.entry(info.multipv) {
                        Entry::Vacant(slot) => {
                            slot.insert(info);
                        }
                        Entry::Occupied(mut slot) => {
                            // Bound announcements without a pv do not
                            // clobber a previously seen full line.
                            if !info.pv.is_empty() {
                                slot.insert(info);
                            }
                        }
                    }
                }
                EngineReply::BestMove(_) => break,
                EngineReply::Other => {}
            }
        }
        Ok(slots)
    }
}

impl Evaluator for UciClient {
    fn evaluate(&mut self, pos: &Chess, depth: u8) -> Result<i32, EvalError> {
        let slots = self.analyse(pos, depth, 1)?;
        let score = slots.get(&1).and_then(|line| line.score);
        match score {
            Some(score) => Ok(score.to_cp()),
            None => Err(UciError::MissingScore { fen: fen_of(pos) }.into()),
        }
    }

    fn top_moves(
        &mut self,
        pos: &Chess,
        depth: u8,
        multipv: u8,
    ) -> Result<HashMap<UciMove, i32>, EvalError> {
        let slots = self.analyse(pos, depth, multipv)?;
        let mut out = HashMap::new();
        for line in slots.values() {
            let (Some(first), Some(score)) = (line.pv.first(), line.score) else {
                continue;
            };
            out.insert(first.clone(), score.to_cp());
        }
        Ok(out)
    }
}

impl Drop for UciClient {
    fn drop(&mut self) {
        let _ = self.send("quit");
        let _ = self.child.wait();
    }
}
