//! Command sequences under a single decrementing time budget.

use crate::invocation::Invocation;
use crate::runner::execute_command_line;
use crate::ArtifactDir;

/// Synthetic return code recorded for a step aborted by the budget.
pub const TIMEOUT_RETURN_CODE: i32 = -9;

/// Separator between per-step log blocks in the concatenated log.
pub const STEP_SEPARATOR: &str =
    "\n########################################\n";

const ABORT_RULE: &str = "----------";

/// One invocation's execution state: the merged outcome of running its
/// command sequence against the shared wall-clock budget.
#[derive(Debug, Clone)]
pub struct Execution {
    invocation: Invocation,
    /// Sum of per-step wall times, in seconds.
    pub wall_time: f64,
    /// Set when any step hit the deadline (or the budget ran out first).
    pub timeout: bool,
    /// Set when a step exited non-zero without a timeout.
    pub error: bool,
    pub return_codes: Vec<i32>,
    logs: Vec<String>,
}

impl Execution {
    pub fn new(invocation: Invocation) -> Self {
        Self {
            invocation,
            wall_time: 0.0,
            timeout: false,
            error: false,
            return_codes: Vec::new(),
            logs: Vec::new(),
        }
    }

    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    /// Runs the invocation's own command sequence.
    pub fn run(&mut self, warm_up_run: bool, artifacts: &ArtifactDir) {
        let commands = self.invocation.command_sequence();
        self.run_sequence(&commands, warm_up_run, artifacts);
    }

    /// Runs an explicit command sequence (e.g. with an export argument
    /// appended that should not be persisted on the invocation itself).
    ///
    /// Each step gets whatever is left of the invocation's time limit. A
    /// step that finds the budget already exhausted is not started: it is
    /// recorded as a synthetic timeout with [`TIMEOUT_RETURN_CODE`]. After
    /// any timeout the remaining steps are skipped.
    pub fn run_sequence(&mut self, commands: &[String], warm_up_run: bool, artifacts: &ArtifactDir) {
        self.wall_time = 0.0;
        self.timeout = false;
        self.error = false;
        self.return_codes.clear();
        self.logs.clear();

        for command in commands {
            let remaining = self.invocation.time_limit - self.wall_time;
            if remaining <= 0.0 {
                self.timeout = true;
                self.return_codes.push(TIMEOUT_RETURN_CODE);
                // The step never ran, but its log block keeps the fixed
                // per-step layout so downstream log parsing sees one shape.
                self.logs.push(format!(
                    "Command:\t{command}\nWallclock time:\t0\nReturn code:\t{TIMEOUT_RETURN_CODE}\nOutput:\n\n"
                ));
                self.append_abort_note();
                break;
            }

            let outcome = execute_command_line(command, Some(remaining), warm_up_run, artifacts);
            self.wall_time += outcome.wall_time;
            self.logs.push(format!(
                "Command:\t{}\nWallclock time:\t{}\nReturn code:\t{}\nOutput:\n{}\n",
                command,
                outcome.wall_time,
                match outcome.return_code {
                    Some(code) => code.to_string(),
                    None => "None".to_string(),
                },
                outcome.output
            ));

            match outcome.return_code {
                None => {
                    self.timeout = true;
                    self.return_codes.push(TIMEOUT_RETURN_CODE);
                    self.append_abort_note();
                    break;
                }
                Some(code) => {
                    self.return_codes.push(code);
                }
            }
        }

        // A timed-out sequence is a timeout and nothing else, even when
        // an earlier step exited non-zero.
        self.error = !self.timeout && self.return_codes.iter().any(|code| *code != 0);
    }

    fn append_abort_note(&mut self) {
        let note = format!(
            "\n{ABORT_RULE}\nComputation aborted after {} seconds since the total time limit of {} seconds was exceeded.\n",
            self.wall_time, self.invocation.time_limit
        );
        match self.logs.last_mut() {
            Some(last) => last.push_str(&note),
            None => self.logs.push(note),
        }
    }

    /// All per-step log blocks joined by [`STEP_SEPARATOR`].
    pub fn concatenated_logs(&self) -> String {
        self.logs.join(STEP_SEPARATOR)
    }
}
