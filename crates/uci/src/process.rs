//! A UCI engine running as a child process.
//!
//! The engine's stdout is drained by a background thread into a channel, so
//! every read can be bounded with a timeout. An engine that hangs during the
//! handshake or while thinking surfaces as [`UciError::Timeout`] instead of
//! blocking the caller forever.

use crate::{EngineMessage, GoOptions, GuiCommand, UciError};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// A spawned engine with a line channel fed by its stdout.
///
/// # Lifecycle
///
/// 1. Spawn the engine with [`EngineProcess::spawn`]
/// 2. Run the UCI handshake with [`EngineProcess::handshake`]
/// 3. Send positions and request moves with [`EngineProcess::best_move`]
/// 4. Clean up with [`EngineProcess::quit`] (or rely on the [`Drop`] implementation)
pub struct EngineProcess {
    child: Child,
    stdin: ChildStdin,
    lines: Receiver<String>,
    /// The engine's name as reported during the handshake.
    name: Option<String>,
}

impl EngineProcess {
    /// Spawns the engine at `path` with `args`.
    ///
    /// # Errors
    ///
    /// Returns [`UciError::SpawnError`] if the process cannot be started,
    /// typically because the executable doesn't exist or lacks permissions.
    pub fn spawn<P: AsRef<Path>>(path: P, args: &[String]) -> Result<Self, UciError> {
        let path = path.as_ref();
        let mut child = Command::new(path)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| UciError::SpawnError {
                path: path.display().to_string(),
                source,
            })?;

        let stdin = child.stdin.take().ok_or(UciError::EngineExited)?;
        let stdout = child.stdout.take().ok_or(UciError::EngineExited)?;

        let (tx, lines) = mpsc::channel();
        thread::Builder::new()
            .name("uci-reader".to_string())
            .spawn(move || {
                for line in BufReader::new(stdout).lines() {
                    let Ok(line) = line else {
                        break;
                    };
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            })?;

        debug!(path = %path.display(), "spawned engine");
        Ok(EngineProcess {
            child,
            stdin,
            lines,
            name: None,
        })
    }

    /// The name from `id name`, once the handshake has run.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Writes one command line to the engine.
    pub fn send(&mut self, command: &GuiCommand) -> Result<(), UciError> {
        trace!(">> {}", command);
        writeln!(self.stdin, "{}", command)?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Runs `uci`/`uciok` then `isready`/`readyok`, each bounded by `timeout`.
    pub fn handshake(&mut self, timeout: Duration) -> Result<(), UciError> {
        self.send(&GuiCommand::Uci)?;
        let mut name = None;
        self.wait_for("uciok", timeout, |msg| match msg {
            EngineMessage::Id { name: Some(n), .. } => {
                name = Some(n);
                None
            }
            EngineMessage::UciOk => Some(()),
            _ => None,
        })?;
        self.name = name;

        self.send(&GuiCommand::IsReady)?;
        self.wait_for("readyok", timeout, |msg| {
            (msg == EngineMessage::ReadyOk).then_some(())
        })?;

        debug!(name = ?self.name, "engine ready");
        Ok(())
    }

    /// Starts a search and waits up to `timeout` for `bestmove`.
    pub fn best_move(&mut self, go: GoOptions, timeout: Duration) -> Result<String, UciError> {
        self.send(&GuiCommand::Go(go))?;
        self.wait_for("bestmove", timeout, |msg| match msg {
            EngineMessage::BestMove { mv, .. } => Some(mv),
            _ => None,
        })
    }

    /// Reads lines until `accept` returns a value or `timeout` elapses.
    fn wait_for<T>(
        &mut self,
        expected: &'static str,
        timeout: Duration,
        mut accept: impl FnMut(EngineMessage) -> Option<T>,
    ) -> Result<T, UciError> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.lines.recv_timeout(remaining) {
                Ok(line) => {
                    trace!("<< {}", line);
                    if let Some(value) = accept(EngineMessage::parse(&line)) {
                        return Ok(value);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    let timeout_ms = timeout.as_millis() as u64;
                    warn!(expected, timeout_ms, "engine did not respond in time");
                    return Err(UciError::Timeout {
                        expected,
                        timeout_ms,
                    });
                }
                Err(RecvTimeoutError::Disconnected) => return Err(UciError::EngineExited),
            }
        }
    }

    /// Sends `quit` and waits for the process to exit.
    pub fn quit(&mut self) -> Result<(), UciError> {
        self.send(&GuiCommand::Quit)?;
        self.child.wait()?;
        Ok(())
    }
}

impl Drop for EngineProcess {
    fn drop(&mut self) {
        let _ = self.send(&GuiCommand::Quit);
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
