//! External-process formatter backend
//!
//! Runs a command that reads a raw note on stdin and writes the formatted note
//! to stdout. It is always wrapped in a [`FallbackFormatter`], so a missing
//! binary, a non-zero exit, a run past the timeout or garbage output degrades
//! to the rule-based formatter.

use clinote_core::{BackendError, FormatBackend};
use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Default limit on one backend call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Formatter backed by an external program
#[derive(Debug, Clone)]
pub struct CommandBackend {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandBackend {
    /// Parse a whitespace-separated command line
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Kill the program when it runs longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Program name
    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Wait for the child until the timeout; `None` once it expires
    fn wait_for(&self, child: &mut Child) -> Result<Option<ExitStatus>, BackendError> {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(status) = child
                .try_wait()
                .map_err(|e| BackendError::Failed(e.to_string()))?
            {
                return Ok(Some(status));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl FormatBackend for CommandBackend {
    fn name(&self) -> &str {
        &self.program
    }

    fn format(&self, raw: &str) -> Result<String, BackendError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| BackendError::Unavailable(format!("{}: {e}", self.program)))?;

        // Pipes are served on their own threads so a child that fills stdout
        // before draining stdin cannot deadlock us.
        let (Some(mut stdin), Some(stdout), Some(stderr)) =
            (child.stdin.take(), child.stdout.take(), child.stderr.take())
        else {
            kill(&mut child, &self.program);
            return Err(BackendError::Unavailable("pipes not captured".into()));
        };
        let input = raw.to_string();
        let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));
        let stdout = thread::spawn(move || drain(stdout));
        let stderr = thread::spawn(move || drain(stderr));

        let status = match self.wait_for(&mut child) {
            Ok(Some(status)) => status,
            Ok(None) => {
                kill(&mut child, &self.program);
                return Err(BackendError::Failed(format!(
                    "{} timed out after {}ms",
                    self.program,
                    self.timeout.as_millis()
                )));
            }
            Err(e) => {
                kill(&mut child, &self.program);
                return Err(e);
            }
        };

        match writer.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(BackendError::Failed(format!("writing stdin: {e}"))),
            Err(_) => return Err(BackendError::Failed("stdin writer panicked".into())),
        }
        let stdout = join_reader(stdout, "stdout")?;
        let stderr = join_reader(stderr, "stderr")?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            return Err(BackendError::Failed(format!(
                "{} exited with {}: {}",
                self.program,
                status,
                stderr.trim()
            )));
        }

        String::from_utf8(stdout)
            .map_err(|_| BackendError::Failed(format!("{} wrote non-UTF-8 output", self.program)))
    }
}

fn drain(mut pipe: impl Read) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    pipe.read_to_end(&mut buf)?;
    Ok(buf)
}

fn join_reader(
    handle: thread::JoinHandle<std::io::Result<Vec<u8>>>,
    pipe: &str,
) -> Result<Vec<u8>, BackendError> {
    match handle.join() {
        Ok(Ok(buf)) => Ok(buf),
        Ok(Err(e)) => Err(BackendError::Failed(format!("reading {pipe}: {e}"))),
        Err(_) => Err(BackendError::Failed(format!("{pipe} reader panicked"))),
    }
}

/// Kill and reap a child we gave up on
fn kill(child: &mut Child, program: &str) {
    if let Err(e) = child.kill() {
        log::debug!("could not kill {program}: {e}");
    }
    if let Err(e) = child.wait() {
        log::debug!("could not reap {program}: {e}");
    }
}
