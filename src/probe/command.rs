//! Blocking external tool execution with a timeout
//!
//! The child is polled with `try_wait` while its pipes drain on reader threads,
//! so a chatty tool cannot deadlock on a full pipe and a hung one is killed
//! once the deadline passes.

use crossbeam_channel::{bounded, Receiver};
use std::ffi::OsString;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// How often the child is polled for exit
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long to wait for pipe readers after the child exits
///
/// Grandchildren that inherited the pipes can keep them open past our child's exit.
const READER_GRACE: Duration = Duration::from_secs(2);

/// Output captured from a tool execution
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub status: ExitStatus,
    /// Captured standard output (lossy UTF-8)
    pub stdout: String,
    /// Captured standard error (lossy UTF-8)
    pub stderr: String,
}

/// Failure modes of a tool invocation
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("executable not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("I/O error while waiting: {0}")]
    Io(#[from] std::io::Error),
}

/// A builder for a single external tool invocation
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
    timeout: Duration,
}

impl ToolCommand {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout,
        }
    }

    /// Append a single argument
    pub fn arg(&mut self, arg: impl Into<OsString>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    /// Append multiple arguments
    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the tool to completion or until the timeout elapses
    ///
    /// A non-zero exit is not an error here; callers inspect `status`.
    pub fn execute(&self) -> Result<ToolOutput, CommandError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => CommandError::NotFound(self.program.clone()),
                _ => CommandError::Spawn {
                    program: self.program.clone(),
                    source: e,
                },
            })?;

        let stdout_rx = drain(child.stdout.take());
        let stderr_rx = drain(child.stderr.take());

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                // Already-exited races are fine; either way the child is gone
                let _ = child.kill();
                let _ = child.wait();
                return Err(CommandError::Timeout(self.timeout));
            }
            thread::sleep(POLL_INTERVAL);
        };

        let stdout = stdout_rx.recv_timeout(READER_GRACE).unwrap_or_default();
        let stderr = stderr_rx.recv_timeout(READER_GRACE).unwrap_or_default();

        Ok(ToolOutput {
            status,
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
    }
}

/// Read a pipe to the end on a background thread
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<Vec<u8>> {
    let (tx, rx) = bounded(1);
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        let _ = tx.send(buf);
    });
    rx
}
