//! Single-command execution under a wall-clock deadline.

use crate::ArtifactDir;
use std::io::Read;
use std::os::unix::process::ExitStatusExt;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Return code recorded when the process could not be spawned at all.
pub const SPAWN_FAILURE_CODE: i32 = -1;

/// Wall-clock limit for the discarded warm-up run, in seconds.
pub const WARM_UP_TIME_LIMIT: f64 = 5.0;

/// Known-benign tool chatter dropped from captured stdout so it cannot
/// confuse the log classifiers.
const FILTERED_STDOUT_FRAGMENT: &str = "WARN (json.hpp:185): Inaccurate JSON export:";

const STDERR_DELIMITER: &str =
    "##############################Output to stderr##############################";

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Captured outcome of one command-line run.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    /// Filtered stdout, with stderr appended behind a delimiter line when
    /// the process wrote any.
    pub output: String,
    /// Elapsed wall-clock seconds (0 when the process never spawned).
    pub wall_time: f64,
    /// Exit code; `None` exactly when the run was killed on deadline.
    pub return_code: Option<i32>,
}

impl CommandOutcome {
    pub fn timed_out(&self) -> bool {
        self.return_code.is_none()
    }
}

/// Runs a command line to completion or until the deadline expires.
///
/// The command line is `$ARTIFACT_DIR`-expanded and split on whitespace.
/// With `warm_up_run` set, the same command is first executed once under a
/// short fixed limit and that run's outcome is discarded; this settles
/// filesystem caches so the measured run is more stable.
///
/// Never returns an error: spawn failures are folded into the outcome with
/// the failure message as output and [`SPAWN_FAILURE_CODE`] as return code.
pub fn execute_command_line(
    command_line: &str,
    time_limit: Option<f64>,
    warm_up_run: bool,
    artifacts: &ArtifactDir,
) -> CommandOutcome {
    let command_line = artifacts.expand(command_line);
    if warm_up_run {
        let _ = run_once(&command_line, Some(WARM_UP_TIME_LIMIT));
    }
    run_once(&command_line, time_limit)
}

fn run_once(command_line: &str, time_limit: Option<f64>) -> CommandOutcome {
    let mut parts = command_line.split_whitespace();
    let program = parts.next().unwrap_or("");
    let args: Vec<&str> = parts.collect();

    let start = Instant::now();
    let mut child = match Command::new(program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            return CommandOutcome {
                output: format!("Error when executing the command:\n{e}\n"),
                wall_time: 0.0,
                return_code: Some(SPAWN_FAILURE_CODE),
            };
        }
    };

    // Both pipes are drained concurrently; a tool writing more than the
    // pipe buffer to stderr would otherwise deadlock against our wait.
    let stdout_handle = drain(child.stdout.take());
    let stderr_handle = drain(child.stderr.take());

    let deadline = time_limit
        .filter(|limit| *limit > 0.0)
        .map(|limit| start + Duration::from_secs_f64(limit));

    let mut timeout = false;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break Some(status),
            Ok(None) => {}
            Err(_) => break None,
        }
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                timeout = true;
                terminate(&mut child);
                break child.wait().ok();
            }
        }
        thread::sleep(POLL_INTERVAL);
    };
    let wall_time = start.elapsed().as_secs_f64();

    let stdout = stdout_handle.join().unwrap_or_default();
    let stderr = stderr_handle.join().unwrap_or_default();

    let mut output = filter_stdout(&stdout);
    if !stderr.is_empty() {
        output.push('\n');
        output.push_str(STDERR_DELIMITER);
        output.push('\n');
        output.push_str(&stderr);
    }

    if timeout {
        if let Some(limit) = time_limit {
            if wall_time <= limit {
                tracing::warn!(
                    wall_time,
                    limit,
                    "process killed on deadline but measured wall time is within the limit"
                );
            }
        }
        return CommandOutcome {
            output,
            wall_time,
            return_code: None,
        };
    }

    let return_code = match status {
        Some(status) => status
            .code()
            .or_else(|| status.signal().map(|sig| -sig))
            .unwrap_or(SPAWN_FAILURE_CODE),
        None => SPAWN_FAILURE_CODE,
    };

    CommandOutcome {
        output,
        wall_time,
        return_code: Some(return_code),
    }
}

/// Read a pipe to the end on a dedicated thread.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

/// SIGTERM first, brief grace period, then SIGKILL.
fn terminate(child: &mut Child) {
    let ret = unsafe { libc::kill(child.id() as libc::pid_t, libc::SIGTERM) };
    if ret == -1 {
        tracing::debug!("SIGTERM delivery failed, process likely already gone");
    }
    thread::sleep(Duration::from_millis(50));
    if matches!(child.try_wait(), Ok(None)) {
        let _ = child.kill();
    }
}

fn filter_stdout(stdout: &str) -> String {
    if !stdout.contains(FILTERED_STDOUT_FRAGMENT) {
        return stdout.to_string();
    }
    let mut filtered: String = stdout
        .lines()
        .filter(|line| !line.contains(FILTERED_STDOUT_FRAGMENT))
        .collect::<Vec<_>>()
        .join("\n");
    if stdout.ends_with('\n') && !filtered.is_empty() {
        filtered.push('\n');
    }
    filtered
}
