//! Execution engine for external verification tools.
//!
//! The pipeline for a single benchmark invocation:
//!
//! ```text
//! Invocation ──> Execution::run ──> execute_command_line (per command)
//!                     │                    │
//!                     │                    ├── spawn + capture stdout/stderr
//!                     │                    └── wall-clock deadline, kill on expiry
//!                     │
//!                     └── merged wall time, timeout/error flags, log blocks
//! ```
//!
//! All execution-level failures (spawn errors, timeouts, non-zero exits)
//! are captured as data on the outcome, never surfaced as `Err`; a broken
//! tool binary is a result to record, not a reason to abort the batch.

mod artifact;
mod execution;
mod invocation;
mod runner;

pub use artifact::ArtifactDir;
pub use execution::{Execution, STEP_SEPARATOR, TIMEOUT_RETURN_CODE};
pub use invocation::{Invocation, InvocationError, Precision, IDENTIFIER_SEPARATOR};
pub use runner::{execute_command_line, CommandOutcome, SPAWN_FAILURE_CODE, WARM_UP_TIME_LIMIT};
