//! Non-blocking external process execution.
//!
//! [`ProcessRunner::run`] starts a program and returns a [`ProcessHandle`] right away.
//! The host checks the handle on each tick with [`ProcessHandle::poll`]; captured
//! stdout and stderr are drained by one reader thread per stream so a chatty process
//! never blocks on a full pipe, and partial output can be shown while it runs.
//!
//! # Public API
//! - [`ProcessRunner`]: Launches programs in a fixed working directory
//! - [`ProcessHandle`]: A running (or finished) process
//! - [`ProcessOutput`]: Exit code and fully drained output streams
//! - [`ExitCallback`]: Completion continuation `(exit_code, stdout, stderr)`
//! - [`CANCELLED_EXIT_CODE`]: Exit code reported for killed processes
//!
//! # Guarantees
//! - Output is fully drained before completion is reported
//! - The continuation fires exactly once: on completion or on cancellation
//! - Bounded waits kill the process and return [`VcsError::Timeout`]

use crate::core::error::{Result, VcsError};
use crate::core::vcs::CommandLine;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Exit code handed to continuations when a process was killed before it finished
pub const CANCELLED_EXIT_CODE: i32 = -9999;

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(5);

pub type ExitCallback = Box<dyn FnOnce(i32, Option<String>, Option<String>)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    fn cancelled() -> Self {
        Self {
            exit_code: CANCELLED_EXIT_CODE,
            stdout: String::new(),
            stderr: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProcessRunner {
    working_dir: PathBuf,
}

impl ProcessRunner {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Start `command` without waiting for it.
    ///
    /// With a continuation, stdout and stderr are captured and handed to it on
    /// completion. Without one, both streams are discarded.
    pub fn run(&self, command: &CommandLine, on_exit: Option<ExitCallback>) -> Result<ProcessHandle> {
        let capture = on_exit.is_some();
        self.launch(command, capture, on_exit)
    }

    /// Start `command` with stdout and stderr captured whether or not a
    /// continuation is given. Used for output the session reads itself.
    pub fn run_captured(
        &self,
        command: &CommandLine,
        on_exit: Option<ExitCallback>,
    ) -> Result<ProcessHandle> {
        self.launch(command, true, on_exit)
    }

    /// Run `command` to completion with captured output, killing it after `timeout`.
    pub fn run_sync(&self, command: &CommandLine, timeout: Duration) -> Result<ProcessOutput> {
        let mut handle = self.launch(command, true, None)?;
        handle.wait_timeout(timeout)
    }

    fn launch(
        &self,
        command: &CommandLine,
        capture: bool,
        on_exit: Option<ExitCallback>,
    ) -> Result<ProcessHandle> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null());
        if capture {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        } else {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }

        log::debug!("Launching: {}", command);
        let mut child = cmd.spawn().map_err(|e| {
            log::error!("Failed to launch '{}': {}", command.program, e);
            VcsError::process_launch(&command.program, e)
        })?;

        let stdout = child.stdout.take().map(StreamReader::spawn);
        let stderr = child.stderr.take().map(StreamReader::spawn);

        Ok(ProcessHandle {
            command_line: command.to_string(),
            child,
            stdout,
            stderr,
            on_exit,
            finished: None,
        })
    }
}

/// Accumulates one output stream on a background thread.
struct StreamReader {
    buffer: Arc<Mutex<Vec<u8>>>,
    thread: Option<JoinHandle<()>>,
}

impl StreamReader {
    fn spawn<R: Read + Send + 'static>(mut source: R) -> Self {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&buffer);
        let thread = thread::spawn(move || {
            let mut chunk = [0u8; 4096];
            loop {
                match source.read(&mut chunk) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => lock(&sink).extend_from_slice(&chunk[..n]),
                }
            }
        });
        Self {
            buffer,
            thread: Some(thread),
        }
    }

    fn snapshot(&self) -> String {
        String::from_utf8_lossy(&lock(&self.buffer)).into_owned()
    }

    /// True once the write end of the pipe is closed and everything is buffered.
    /// A background grandchild that inherited the pipe keeps it open.
    fn is_drained(&self) -> bool {
        self.thread.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Return everything the stream produced. Only call once it is drained.
    fn finish(&mut self) -> String {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::warn!("Output reader thread panicked");
            }
        }
        self.snapshot()
    }

    /// Stop tracking the reader thread without waiting for the pipe to close
    fn detach(&mut self) {
        self.thread.take();
    }
}

fn lock(buffer: &Mutex<Vec<u8>>) -> std::sync::MutexGuard<'_, Vec<u8>> {
    buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A launched process. Dropping the handle does not kill the process.
pub struct ProcessHandle {
    command_line: String,
    child: Child,
    stdout: Option<StreamReader>,
    stderr: Option<StreamReader>,
    on_exit: Option<ExitCallback>,
    finished: Option<ProcessOutput>,
}

impl ProcessHandle {
    /// Check for completion without blocking.
    ///
    /// Returns the output once the process has exited and its streams are closed, so
    /// a process whose background children still hold its output is not finished yet.
    /// The continuation fires on the first call that observes completion.
    pub fn poll(&mut self) -> Result<Option<ProcessOutput>> {
        if let Some(output) = &self.finished {
            return Ok(Some(output.clone()));
        }

        let status = match self.child.try_wait()? {
            Some(status) => status,
            None => return Ok(None),
        };
        let drained = [self.stdout.as_ref(), self.stderr.as_ref()]
            .into_iter()
            .flatten()
            .all(StreamReader::is_drained);
        if !drained {
            return Ok(None);
        }

        let exit_code = status.code().unwrap_or(CANCELLED_EXIT_CODE);
        let captured = self.stdout.is_some();
        let output = ProcessOutput {
            exit_code,
            stdout: self.stdout.as_mut().map(StreamReader::finish).unwrap_or_default(),
            stderr: self.stderr.as_mut().map(StreamReader::finish).unwrap_or_default(),
        };
        log::debug!("'{}' exited with code {}", self.command_line, exit_code);

        self.finished = Some(output.clone());
        if let Some(on_exit) = self.on_exit.take() {
            if captured {
                on_exit(exit_code, Some(output.stdout.clone()), Some(output.stderr.clone()));
            } else {
                on_exit(exit_code, None, None);
            }
        }
        Ok(Some(output))
    }

    /// True once [`poll`](Self::poll) or a wait has observed completion
    pub fn has_exited(&self) -> bool {
        self.finished.is_some()
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.finished.as_ref().map(|output| output.exit_code)
    }

    /// Captured stdout so far; complete once the process has exited
    pub fn stdout_so_far(&self) -> String {
        match (&self.finished, &self.stdout) {
            (Some(output), _) => output.stdout.clone(),
            (None, Some(reader)) => reader.snapshot(),
            (None, None) => String::new(),
        }
    }

    pub fn stderr_so_far(&self) -> String {
        match (&self.finished, &self.stderr) {
            (Some(output), _) => output.stderr.clone(),
            (None, Some(reader)) => reader.snapshot(),
            (None, None) => String::new(),
        }
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    /// Block until the process exits or `timeout` elapses.
    ///
    /// On expiry the process is killed, the continuation receives the cancelled
    /// exit code, and [`VcsError::Timeout`] is returned.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Result<ProcessOutput> {
        let started = Instant::now();
        loop {
            if let Some(output) = self.poll()? {
                return Ok(output);
            }
            if started.elapsed() >= timeout {
                log::warn!(
                    "'{}' did not finish within {} ms, killing it",
                    self.command_line,
                    timeout.as_millis()
                );
                self.cancel();
                return Err(VcsError::timeout(self.command_line.clone(), timeout));
            }
            thread::sleep(WAIT_POLL_INTERVAL);
        }
    }

    /// Force-kill the process.
    ///
    /// Returns false when the process had already finished. Otherwise the
    /// continuation receives [`CANCELLED_EXIT_CODE`] with no output. Reader threads
    /// are detached rather than joined: a grandchild holding the pipes open must not
    /// block the caller.
    pub fn cancel(&mut self) -> bool {
        if self.finished.is_some() {
            return false;
        }

        if let Err(e) = self.child.kill() {
            log::debug!("Kill of '{}' failed: {}", self.command_line, e);
        }
        if let Err(e) = self.child.wait() {
            log::warn!("Failed to reap '{}': {}", self.command_line, e);
        }
        for reader in [self.stdout.as_mut(), self.stderr.as_mut()].into_iter().flatten() {
            reader.detach();
        }

        log::warn!("Cancelled '{}'", self.command_line);
        self.finished = Some(ProcessOutput::cancelled());
        if let Some(on_exit) = self.on_exit.take() {
            on_exit(CANCELLED_EXIT_CODE, None, None);
        }
        true
    }
}

impl std::fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("command_line", &self.command_line)
            .field("finished", &self.finished)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Recorded = Rc<RefCell<Vec<(i32, Option<String>, Option<String>)>>>;

    fn recorder() -> (Recorded, ExitCallback) {
        let calls: Recorded = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        let callback: ExitCallback = Box::new(move |code, out, err| {
            sink.borrow_mut().push((code, out, err));
        });
        (calls, callback)
    }

    fn runner() -> ProcessRunner {
        ProcessRunner::new(std::env::temp_dir())
    }

    #[test]
    fn test_launch_failure_is_an_error() {
        let cmd = CommandLine::new("vcs-browser-no-such-program-42");
        let err = runner().run(&cmd, None).unwrap_err();
        assert!(matches!(err, VcsError::ProcessLaunch { .. }));
    }

    #[test]
    fn test_run_sync_launch_failure() {
        let cmd = CommandLine::new("vcs-browser-no-such-program-42");
        let err = runner().run_sync(&cmd, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, VcsError::ProcessLaunch { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_captured_output_and_exit_code() {
        let cmd = CommandLine::new("sh").args(["-c", "echo out; echo err >&2; exit 3"]);
        let (calls, callback) = recorder();
        let mut handle = runner().run(&cmd, Some(callback)).unwrap();

        let output = handle.wait_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
        assert!(handle.has_exited());
        assert_eq!(handle.exit_code(), Some(3));

        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], (3, Some("out\n".to_string()), Some("err\n".to_string())));
    }

    #[cfg(unix)]
    #[test]
    fn test_continuation_fires_once() {
        let cmd = CommandLine::new("sh").args(["-c", "exit 0"]);
        let (calls, callback) = recorder();
        let mut handle = runner().run(&cmd, Some(callback)).unwrap();
        handle.wait_timeout(Duration::from_secs(5)).unwrap();
        assert!(handle.poll().unwrap().is_some());
        assert!(!handle.cancel());
        assert_eq!(calls.borrow().len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_large_output_is_fully_drained() {
        let cmd = CommandLine::new("sh").args(["-c", "i=0; while [ $i -lt 20000 ]; do echo line$i; i=$((i+1)); done"]);
        let output = runner().run_sync(&cmd, Duration::from_secs(30)).unwrap();
        assert_eq!(output.stdout.lines().count(), 20000);
        assert_eq!(output.stdout.lines().last(), Some("line19999"));
    }

    #[cfg(unix)]
    #[test]
    fn test_uncaptured_streams() {
        let cmd = CommandLine::new("sh").args(["-c", "echo hidden"]);
        let mut handle = runner().run(&cmd, None).unwrap();
        let output = handle.wait_timeout(Duration::from_secs(5)).unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, "");
        assert_eq!(handle.stdout_so_far(), "");
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_process() {
        let cmd = CommandLine::new("sleep").arg("10");
        let started = Instant::now();
        let err = runner().run_sync(&cmd, Duration::from_millis(200)).unwrap_err();
        assert!(matches!(err, VcsError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_does_not_wait_for_background_children() {
        let cmd = CommandLine::new("sh").args(["-c", "sleep 30 & sleep 30"]);
        let started = Instant::now();
        let err = runner().run_sync(&cmd, Duration::from_millis(200)).unwrap_err();
        assert!(matches!(err, VcsError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn test_cancel_returns_while_background_child_holds_pipes() {
        let cmd = CommandLine::new("sh").args(["-c", "sleep 30 & sleep 30"]);
        let (calls, callback) = recorder();
        let mut handle = runner().run(&cmd, Some(callback)).unwrap();

        let started = Instant::now();
        assert!(handle.cancel());
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(calls.borrow().as_slice(), &[(CANCELLED_EXIT_CODE, None, None)]);
    }

    #[cfg(unix)]
    #[test]
    fn test_not_finished_until_background_child_closes_pipes() {
        let cmd = CommandLine::new("sh").args(["-c", "(sleep 1; echo late) & echo early"]);
        let mut handle = runner().run_captured(&cmd, None).unwrap();

        let output = handle.wait_timeout(Duration::from_secs(10)).unwrap();
        assert_eq!(output.stdout, "early\nlate\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_cancel_reports_sentinel() {
        let cmd = CommandLine::new("sleep").arg("10");
        let (calls, callback) = recorder();
        let mut handle = runner().run(&cmd, Some(callback)).unwrap();

        assert!(handle.cancel());
        assert_eq!(handle.exit_code(), Some(CANCELLED_EXIT_CODE));
        assert_eq!(calls.borrow().as_slice(), &[(CANCELLED_EXIT_CODE, None, None)]);
    }
}
