#![doc = include_str!("../README.md")]
#![warn(missing_docs, missing_debug_implementations)]
use std::{
    ffi::OsStr,
    io::{BufRead, BufReader, Write},
    process::{Child, ChildStdin, Command, Stdio},
    sync::mpsc::{self, Receiver, RecvTimeoutError},
    thread,
    time::{Duration, Instant},
};

mod score;

use chess_session::{
    rules::to_fen,
    search::{SearchEngine, SearchError},
    Move, ParseMoveError, SearchBudget,
};
use regex::Regex;
use shakmaty::Chess;
use tracing::{debug, info, trace, warn};

pub use score::Score;

const BESTMOVE: &str = r"^bestmove (\S+)";
const SCORE: &str = r"score (cp|mate) (-?\d+)";

/// how long the engine gets to answer `uci` and `isready`
pub const INIT_TIMEOUT: Duration = Duration::from_secs(10);
/// time a search may take regardless of depth
const SEARCH_BASE: Duration = Duration::from_secs(10);
/// extra time a search gets per ply of depth
const SEARCH_PER_PLY: Duration = Duration::from_secs(5);

/// Error that arises from talking to a UCI engine
#[derive(Debug, thiserror::Error)]
pub enum UciError {
    /// the engine could not be started
    #[error("could not start engine {program:?}: {source}")]
    Spawn {
        /// what was run
        program: String,
        /// why it failed
        source: std::io::Error,
    },
    /// reading from or writing to the engine failed
    #[error("engine i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// the engine's stdin or stdout was not piped
    #[error("engine pipes are not connected")]
    NoPipe,
    /// the engine closed its output
    #[error("engine exited unexpectedly")]
    Closed,
    /// the engine didn't answer in time
    #[error("engine sent no {expected:?} within {timeout:?}")]
    Timeout {
        /// the line that was waited for
        expected: &'static str,
        /// how long it was waited for
        timeout: Duration,
    },
    /// the engine sent a move that can't be parsed
    #[error("engine sent unreadable move in {line:?}: {source}")]
    BadMove {
        /// the offending line
        line: String,
        /// why it couldn't be read
        source: ParseMoveError,
    },
    /// one of the built-in patterns failed to compile
    #[error(transparent)]
    Pattern(#[from] regex::Error),
}

/// The engine's answer to a `go` command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestMove {
    /// the chosen move, `None` if the engine has none (the game is over)
    pub mv: Option<Move>,
    /// the last evaluation reported before the move
    pub score: Option<Score>,
}

/// A running UCI engine process.
///
/// The engine is asked to quit and then killed when this is dropped.
#[derive(Debug)]
pub struct UciEngine {
    name: String,
    child: Child,
    stdin: ChildStdin,
    lines: Receiver<std::io::Result<String>>,
    search_timeout: Option<Duration>,
    bestmove: Regex,
    score: Regex,
}

impl UciEngine {
    /// Starts `program` (looked up in `PATH` like any command) and performs the UCI handshake
    pub fn spawn(program: impl AsRef<OsStr>) -> Result<Self, UciError> {
        Self::from_command(Command::new(program))
    }

    /// Starts `command` and performs the UCI handshake, giving up after [`INIT_TIMEOUT`]. Its
    /// stdin and stdout are replaced by pipes, stderr is discarded.
    pub fn from_command(command: Command) -> Result<Self, UciError> {
        Self::from_command_timeout(command, INIT_TIMEOUT)
    }

    /// Like [`UciEngine::from_command`], with `timeout` for each handshake step
    pub fn from_command_timeout(mut command: Command, timeout: Duration) -> Result<Self, UciError> {
        let bestmove = Regex::new(BESTMOVE)?;
        let score = Regex::new(SCORE)?;
        let program = command.get_program().to_string_lossy().into_owned();
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| UciError::Spawn {
                program: program.clone(),
                source,
            })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(UciError::NoPipe);
        };

        let (line_in, line_out) = mpsc::channel();
        let reader = thread::Builder::new()
            .name("uci-reader".into())
            .spawn(move || {
                for line in BufReader::new(stdout).lines() {
                    if line_in.send(line).is_err() {
                        break;
                    }
                }
            });

        // from here on, dropping the engine reaps the child
        let mut engine = UciEngine {
            name: program,
            child,
            stdin,
            lines: line_out,
            search_timeout: None,
            bestmove,
            score,
        };
        let _ = reader?;

        engine.send("uci")?;
        let deadline = Instant::now() + timeout;
        loop {
            let line = engine.read_line(deadline, "uciok", timeout)?;
            if line == "uciok" {
                break;
            }
            if let Some(name) = line.strip_prefix("id name ") {
                engine.name = name.to_owned();
            }
        }
        engine.send("isready")?;
        let deadline = Instant::now() + timeout;
        while engine.read_line(deadline, "readyok", timeout)? != "readyok" {}

        info!(engine = %engine.name, "engine ready");
        Ok(engine)
    }

    /// Gives every search `timeout`, instead of a time that grows with the depth
    pub fn with_search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = Some(timeout);
        self
    }

    fn search_timeout(&self, depth: u32) -> Duration {
        self.search_timeout
            .unwrap_or_else(|| SEARCH_BASE + SEARCH_PER_PLY * depth)
    }

    /// the name the engine reported, or the program name if it didn't
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Searches the position given in FEN to `depth` plies. Blocks until the engine answers,
    /// or fails with [`UciError::Timeout`] if it takes longer than the depth allows. After a
    /// timeout the engine may still be searching and should be dropped.
    pub fn best_move(&mut self, fen: &str, depth: u32) -> Result<BestMove, UciError> {
        self.send(&format!("position fen {fen}"))?;
        self.send(&format!("go depth {depth}"))?;

        let timeout = self.search_timeout(depth);
        let deadline = Instant::now() + timeout;
        let mut score = None;
        loop {
            let line = self.read_line(deadline, "bestmove", timeout)?;
            if let Some(s) = Score::parse(&self.score, &line) {
                score = Some(s);
            }
            let Some(cap) = self.bestmove.captures(&line) else {
                continue;
            };
            let mv = match &cap[1] {
                "(none)" | "0000" => None,
                mv => Some(mv.parse().map_err(|source| UciError::BadMove {
                    line: line.clone(),
                    source,
                })?),
            };
            return Ok(BestMove { mv, score });
        }
    }

    fn send(&mut self, command: &str) -> Result<(), UciError> {
        trace!(engine = %self.name, "> {command}");
        writeln!(self.stdin, "{command}")?;
        self.stdin.flush()?;
        Ok(())
    }

    /// the next line of output, which has to arrive before `deadline`
    fn read_line(
        &mut self,
        deadline: Instant,
        expected: &'static str,
        timeout: Duration,
    ) -> Result<String, UciError> {
        let left = deadline.saturating_duration_since(Instant::now());
        let line = match self.lines.recv_timeout(left) {
            Ok(line) => line?,
            Err(RecvTimeoutError::Timeout) => {
                warn!(engine = %self.name, expected, ?timeout, "engine timed out");
                return Err(UciError::Timeout { expected, timeout });
            }
            Err(RecvTimeoutError::Disconnected) => return Err(UciError::Closed),
        };
        let line = line.trim_end().to_owned();
        trace!(engine = %self.name, "< {line}");
        Ok(line)
    }
}

impl SearchEngine<Chess> for UciEngine {
    fn choose_move(&mut self, position: &Chess, budget: SearchBudget) -> Result<Move, SearchError> {
        let start = Instant::now();
        let fen = to_fen(position);
        let BestMove { mv, score } = self
            .best_move(&fen, budget.depth())
            .map_err(SearchError::engine)?;
        let took = start.elapsed().as_millis() as f64 / 1000.0;

        match mv {
            Some(mv) => {
                match score {
                    Some(score) => info!(engine = %self.name, %mv, %score, took, "engine replied"),
                    None => info!(engine = %self.name, %mv, took, "engine replied"),
                }
                Ok(mv)
            }
            None => {
                debug!(engine = %self.name, %fen, "engine has no move");
                Err(SearchError::NoMove)
            }
        }
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        let _ = self.send("quit");
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
