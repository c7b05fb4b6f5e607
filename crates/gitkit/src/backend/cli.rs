//! Real git backend using the `git` executable.

use crate::backend::Backend;
use crate::error::{Error, Result};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// How often a running child is polled for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Backend that executes real `git` commands.
///
/// Each invocation gets its own time budget; when it runs out the child is
/// killed and [`Error::TimedOut`] is returned. Other invocations, including
/// concurrent ones on other threads, are unaffected.
#[derive(Debug, Clone)]
pub struct GitCli {
    /// Program to execute (normally `git` from `PATH`)
    program: PathBuf,
    /// Budget for a single invocation
    timeout: Duration,
}

impl GitCli {
    /// Time budget applied to every command unless overridden.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a backend running `git` from `PATH`.
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("git"),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-command time budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the executable (a specific git build, or a stand-in for tests).
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// The per-command time budget.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn command_line(&self, args: &[&str]) -> String {
        format!("{} {}", self.program.display(), args.join(" "))
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for GitCli {
    fn run(&self, dir: &Path, args: &[&str]) -> Result<String> {
        let command = self.command_line(args);
        log::debug!("{} (in {})", command, dir.display());

        // stdout and stderr share one pipe so output stays interleaved
        let (mut reader, writer) = io::pipe()?;
        let mut child = {
            let mut cmd = Command::new(&self.program);
            cmd.args(args)
                .current_dir(dir)
                .env("GIT_TERMINAL_PROMPT", "0")
                .stdin(Stdio::null())
                .stdout(writer.try_clone()?)
                .stderr(writer);
            cmd.spawn().map_err(|source| Error::Spawn {
                command: command.clone(),
                source,
            })?
            // `cmd` drops here, closing our copies of the write end
        };

        let collector = thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = reader.read_to_end(&mut buf);
            buf
        });

        let Some(status) = wait_with_deadline(&mut child, self.timeout)? else {
            // Helpers spawned by git may still hold the pipe; leave the reader behind.
            log::debug!("{command} timed out after {:?}", self.timeout);
            return Err(Error::TimedOut {
                command,
                dir: dir.to_path_buf(),
                timeout: self.timeout,
            });
        };

        let raw = collector.join().unwrap_or_default();
        let output = String::from_utf8_lossy(&raw)
            .trim_end_matches('\n')
            .to_string();

        if status.success() {
            Ok(output)
        } else {
            Err(Error::CommandFailed {
                command,
                dir: dir.to_path_buf(),
                status: status.code(),
                output,
            })
        }
    }
}

/// The parts of a running child process the deadline loop drives.
trait Supervised {
    fn try_wait(&mut self) -> io::Result<Option<ExitStatus>>;
    fn kill(&mut self) -> io::Result<()>;
    fn wait(&mut self) -> io::Result<ExitStatus>;
}

impl Supervised for Child {
    fn try_wait(&mut self) -> io::Result<Option<ExitStatus>> {
        Self::try_wait(self)
    }

    fn kill(&mut self) -> io::Result<()> {
        Self::kill(self)
    }

    fn wait(&mut self) -> io::Result<ExitStatus> {
        Self::wait(self)
    }
}

/// Wait for `child` to exit, killing it once `timeout` has elapsed.
///
/// Returns `None` when the child had to be killed. The child is also killed
/// when polling it fails, so no git process outlives the call.
fn wait_with_deadline(
    child: &mut impl Supervised,
    timeout: Duration,
) -> io::Result<Option<ExitStatus>> {
    let started = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(Some(status)),
            Ok(None) => {}
            Err(e) => {
                stop(child);
                return Err(e);
            }
        }
        if started.elapsed() >= timeout {
            stop(child);
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn stop(child: &mut impl Supervised) {
    let _ = child.kill();
    let _ = child.wait();
}
