#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Runs a decision procedure under a wall-clock deadline.
//!
//! The procedure runs in a separate worker process, so a search that outlives
//! its deadline can be stopped without cooperation from the solver. The
//! harness hands the worker the formula as DIMACS on stdin and reads the
//! answer from stdout (see [`crate::sat::worker`]). When the deadline passes
//! first, the worker is killed and reaped before `Timeout` is returned, so no
//! process outlives the call. A worker that closes stdout but keeps running is
//! held to the same deadline.
//!
//! Anything else that goes wrong (the worker cannot be started, exits with an
//! error, is killed by a signal or answers nonsense) is reported as
//! `Failure` with a description; it is never confused with a timeout.

use crate::sat::cnf::Cnf;
use crate::sat::log::targets::BOUNDED as LOG_BOUNDED;
use crate::sat::measure::Measurement;
use crate::sat::solver::{Algorithm, Verdict};
use crate::sat::worker::parse_answer;
use std::ffi::OsString;
use std::fmt::{self, Display, Formatter};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// Lines of worker stderr kept in a failure description.
const STDERR_TAIL: usize = 5;
/// How often an exited-looking worker is polled for its status.
const EXIT_POLL: Duration = Duration::from_millis(5);
/// How long stderr may trail the worker's exit.
const STDERR_GRACE: Duration = Duration::from_millis(500);

/// The result of a bounded run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Outcome {
    Satisfiable,
    Unsatisfiable,
    /// The deadline passed before the worker answered.
    Timeout,
    /// The worker could not produce an answer.
    Failure(String),
}

impl Outcome {
    /// The verdict, when the worker reached one.
    #[must_use]
    pub const fn verdict(&self) -> Option<Verdict> {
        match self {
            Self::Satisfiable => Some(Verdict::Satisfiable),
            Self::Unsatisfiable => Some(Verdict::Unsatisfiable),
            Self::Timeout | Self::Failure(_) => None,
        }
    }

    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

impl From<Verdict> for Outcome {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Satisfiable => Self::Satisfiable,
            Verdict::Unsatisfiable => Self::Unsatisfiable,
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Satisfiable => write!(f, "SATISFIABLE"),
            Self::Unsatisfiable => write!(f, "UNSATISFIABLE"),
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::Failure(reason) => write!(f, "FAILURE ({reason})"),
        }
    }
}

/// An outcome with what was observed while reaching it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedReport {
    pub outcome: Outcome,
    /// Wall-clock time from spawning the worker to the outcome.
    pub elapsed: Duration,
    /// Bytes the worker allocated while solving, if it reported them.
    pub worker_allocated_bytes: Option<u64>,
    /// Process id of the worker, if one was started. It has been reaped by
    /// the time the report exists.
    pub worker_pid: Option<u32>,
}

impl BoundedReport {
    /// The figures of this run as a [`Measurement`]; the worker's resident
    /// memory is not reported.
    #[must_use]
    pub const fn measurement(&self) -> Measurement {
        Measurement {
            elapsed: self.elapsed,
            allocated_bytes: self.worker_allocated_bytes,
            resident_bytes: None,
        }
    }
}

/// Spawns worker processes.
///
/// By default the worker is `<program> worker --algorithm <name>`, which is
/// how the `sat-explorer` binary serves bounded runs.
#[derive(Debug, Clone)]
pub struct Harness {
    program: PathBuf,
    args: Vec<OsString>,
}

impl Harness {
    /// The subcommand a `sat-explorer` binary answers bounded runs on.
    pub const WORKER_SUBCOMMAND: &'static str = "worker";

    /// A harness running `program worker --algorithm <name>`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self::with_args(program, [Self::WORKER_SUBCOMMAND])
    }

    /// A harness re-executing the running binary.
    ///
    /// # Errors
    ///
    /// If the path of the running executable cannot be determined.
    pub fn current_exe() -> io::Result<Self> {
        std::env::current_exe().map(Self::new)
    }

    /// A harness running `program` with `args` in front of
    /// `--algorithm <name>`.
    pub fn with_args<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Decides `cnf` with `algorithm` in a worker, giving up after `deadline`.
    pub fn run_bounded(&self, algorithm: Algorithm, cnf: &Cnf, deadline: Duration) -> Outcome {
        self.run(algorithm, cnf, deadline).outcome
    }

    /// Like [`Harness::run_bounded`], reporting elapsed time and the worker's
    /// allocations as well.
    pub fn run(&self, algorithm: Algorithm, cnf: &Cnf, deadline: Duration) -> BoundedReport {
        let start = Instant::now();
        let (worker_pid, (outcome, worker_allocated_bytes)) = match self.spawn(algorithm) {
            Ok(child) => (
                Some(child.id()),
                supervise(child, algorithm, cnf, deadline, start),
            ),
            Err(e) => (
                None,
                failure(format!(
                    "could not start worker {}: {e}",
                    self.program.display()
                )),
            ),
        };
        let elapsed = start.elapsed();

        log::debug!(
            target: LOG_BOUNDED,
            "{algorithm} finished with {outcome} after {elapsed:?} (deadline {deadline:?})."
        );

        BoundedReport {
            outcome,
            elapsed,
            worker_allocated_bytes,
            worker_pid,
        }
    }

    fn spawn(&self, algorithm: Algorithm) -> io::Result<Child> {
        Command::new(&self.program)
            .args(&self.args)
            .arg("--algorithm")
            .arg(algorithm.name())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
    }
}

/// Decides `cnf` with `algorithm` in a worker spawned from the running
/// binary, giving up after `deadline`.
///
/// Only meaningful inside a binary that serves the `worker` subcommand.
pub fn run_bounded(algorithm: Algorithm, cnf: &Cnf, deadline: Duration) -> Outcome {
    run_bounded_report(algorithm, cnf, deadline).outcome
}

/// Like [`run_bounded`], with the full [`BoundedReport`].
pub fn run_bounded_report(algorithm: Algorithm, cnf: &Cnf, deadline: Duration) -> BoundedReport {
    match Harness::current_exe() {
        Ok(harness) => harness.run(algorithm, cnf, deadline),
        Err(e) => BoundedReport {
            outcome: failure(format!("could not locate the running executable: {e}")).0,
            elapsed: Duration::ZERO,
            worker_allocated_bytes: None,
            worker_pid: None,
        },
    }
}

/// Feeds the formula to a spawned worker and waits for its answer until
/// `deadline` after `start`.
///
/// The pipe threads are detached; each ends once every process holding its
/// pipe has exited.
fn supervise(
    mut child: Child,
    algorithm: Algorithm,
    cnf: &Cnf,
    deadline: Duration,
    start: Instant,
) -> (Outcome, Option<u64>) {
    let id = child.id();
    log::debug!(target: LOG_BOUNDED, "Spawned worker {id} for {algorithm}.");

    let (Some(stdin), Some(stdout), Some(stderr)) =
        (child.stdin.take(), child.stdout.take(), child.stderr.take())
    else {
        terminate(&mut child);
        return failure("worker pipes were not captured".to_string());
    };

    // A failed write means the worker already exited; its status says why.
    let input = cnf.to_string();
    thread::spawn(move || {
        let mut stdin = stdin;
        stdin.write_all(input.as_bytes())
    });

    let (errors_tx, errors_rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = errors_tx.send(read_all(stderr));
    });

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(read_all(stdout));
    });

    let stdout = match rx.recv_timeout(deadline.saturating_sub(start.elapsed())) {
        Ok(stdout) => stdout,
        Err(RecvTimeoutError::Timeout) => {
            terminate(&mut child);
            log::info!(target: LOG_BOUNDED, "{algorithm} timed out after {deadline:?}.");
            return (Outcome::Timeout, None);
        }
        Err(RecvTimeoutError::Disconnected) => {
            terminate(&mut child);
            return failure("worker output reader stopped unexpectedly".to_string());
        }
    };

    // End of output is not the end of the worker.
    let Some(status) = wait_until(&mut child, deadline, start) else {
        terminate(&mut child);
        log::info!(
            target: LOG_BOUNDED,
            "Worker {id} closed its output but was still running after {deadline:?}."
        );
        return (Outcome::Timeout, None);
    };

    let stderr = errors_rx
        .recv_timeout(STDERR_GRACE)
        .ok()
        .and_then(Result::ok)
        .unwrap_or_default();
    interpret(status, stdout, &stderr)
}

/// Polls `child` for its exit status, giving up once `deadline` after `start`
/// has passed.
fn wait_until(
    child: &mut Child,
    deadline: Duration,
    start: Instant,
) -> Option<io::Result<ExitStatus>> {
    loop {
        let remaining = deadline.saturating_sub(start.elapsed());
        match child.try_wait() {
            Ok(Some(status)) => return Some(Ok(status)),
            Ok(None) if remaining.is_zero() => return None,
            Ok(None) => thread::sleep(EXIT_POLL.min(remaining)),
            Err(e) => return Some(Err(e)),
        }
    }
}

fn failure(reason: String) -> (Outcome, Option<u64>) {
    log::warn!(target: LOG_BOUNDED, "Worker failed: {reason}");
    (Outcome::Failure(reason), None)
}

fn read_all(mut pipe: impl Read) -> io::Result<String> {
    let mut text = String::new();
    pipe.read_to_string(&mut text)?;
    Ok(text)
}

fn interpret(
    status: io::Result<ExitStatus>,
    stdout: io::Result<String>,
    stderr: &str,
) -> (Outcome, Option<u64>) {
    let status = match status {
        Ok(status) => status,
        Err(e) => return failure(format!("could not wait for worker: {e}")),
    };
    if !status.success() {
        let tail = stderr_tail(stderr);
        return if tail.is_empty() {
            failure(format!("worker {status}"))
        } else {
            failure(format!("worker {status}: {tail}"))
        };
    }

    let stdout = match stdout {
        Ok(text) => text,
        Err(e) => return failure(format!("could not read worker output: {e}")),
    };
    match parse_answer(&stdout) {
        Ok(answer) => (answer.verdict.into(), answer.allocated_bytes),
        Err(reason) => failure(reason),
    }
}

fn terminate(child: &mut Child) {
    let id = child.id();
    if let Err(e) = child.kill() {
        log::debug!(target: LOG_BOUNDED, "Worker {id} could not be killed: {e}");
    }
    match child.wait() {
        Ok(status) => log::debug!(target: LOG_BOUNDED, "Worker {id} reaped ({status})."),
        Err(e) => log::warn!(target: LOG_BOUNDED, "Worker {id} could not be reaped: {e}"),
    }
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    lines[lines.len().saturating_sub(STDERR_TAIL)..].join(" | ")
}
