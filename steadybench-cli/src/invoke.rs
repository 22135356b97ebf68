//! The `run` subcommand: execute an invocation file.

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use steadybench_exec::{ArtifactDir, Execution, Invocation};
use steadybench_store::ResultRecord;
use steadybench_tools::ToolKind;

const NOTES_DELIMITER: &str =
    "############################## Notes ##############################";

/// Options for the `run` subcommand.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// JSON file holding the invocation list.
    pub invocations_file: PathBuf,
    /// Run only this zero-based entry of the invocation list.
    pub index: Option<usize>,
    /// Directory receiving `logs/` and `exports/`.
    pub results_dir: PathBuf,
    /// Discarded warm-up run before each measured command.
    pub warm_up: bool,
    /// Override for every invocation's time limit, seconds.
    pub time_limit: Option<f64>,
}

/// Executes the invocation file sequentially.
///
/// Each invocation is persisted (record + log) immediately after it
/// finishes, so an interrupted batch keeps everything completed so far.
/// A single invocation failing to set up or persist is logged and the
/// batch continues.
pub fn run_invocations(options: &RunOptions, artifacts: &ArtifactDir) -> anyhow::Result<()> {
    let file = File::open(&options.invocations_file)
        .with_context(|| format!("cannot open {}", options.invocations_file.display()))?;
    let mut invocations: Vec<Invocation> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("cannot parse {}", options.invocations_file.display()))?;

    if let Some(limit) = options.time_limit {
        for invocation in &mut invocations {
            invocation.time_limit = limit;
        }
    }
    if let Some(index) = options.index {
        anyhow::ensure!(
            index < invocations.len(),
            "invocation index {index} out of range, file has {} entries",
            invocations.len()
        );
        invocations = vec![invocations[index].clone()];
    }
    check_identifiers(&invocations);

    let logs_dir = options.results_dir.join("logs");
    let exports_dir = options.results_dir.join("exports");
    fs::create_dir_all(&logs_dir)
        .with_context(|| format!("cannot create {}", logs_dir.display()))?;
    fs::create_dir_all(&exports_dir)
        .with_context(|| format!("cannot create {}", exports_dir.display()))?;

    let progress = ProgressBar::new(invocations.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .expect("static progress template"),
    );

    for invocation in &invocations {
        progress.set_message(invocation.benchmark_id.clone());
        if let Err(e) = run_single(invocation, &logs_dir, &exports_dir, options.warm_up, artifacts)
        {
            tracing::error!(
                benchmark_id = %invocation.benchmark_id,
                tool = %invocation.tool,
                error = %e,
                "invocation failed, continuing with the next one"
            );
        }
        progress.inc(1);
    }
    progress.finish_and_clear();
    Ok(())
}

/// Warn about invalid or duplicate identifiers up front; duplicates
/// would silently overwrite each other's files.
fn check_identifiers(invocations: &[Invocation]) {
    let mut seen = HashSet::new();
    for invocation in invocations {
        match invocation.identifier() {
            Ok(identifier) => {
                if !seen.insert(identifier.clone()) {
                    tracing::warn!(%identifier, "duplicate invocation identifier");
                }
            }
            Err(e) => tracing::warn!(error = %e, "invalid invocation identifier"),
        }
    }
}

fn run_single(
    invocation: &Invocation,
    logs_dir: &Path,
    exports_dir: &Path,
    warm_up: bool,
    artifacts: &ArtifactDir,
) -> anyhow::Result<()> {
    let identifier = invocation.identifier()?;
    let tool = ToolKind::detect(&invocation.tool)
        .with_context(|| format!("unknown tool '{}'", invocation.tool))?;

    let mut notes: Vec<String> = Vec::new();
    let mut commands = invocation.command_sequence();

    // Export is requested on the executed command only; the persisted
    // invocation keeps the command from the invocation file.
    let mut export_file: Option<PathBuf> = None;
    if invocation.export {
        match tool.export_format() {
            Some(format) => {
                let path = exports_dir.join(format!("{identifier}{format}"));
                let argument = tool
                    .export_command(&path.to_string_lossy())
                    .expect("tools with an export format have an export command");
                if let Some(first) = commands.first_mut() {
                    first.push(' ');
                    first.push_str(&argument);
                    export_file = Some(path);
                }
            }
            None => notes.push("Tool does not support file export.".to_string()),
        }
    }

    let mut execution = Execution::new(invocation.clone());
    execution.run_sequence(&commands, warm_up, artifacts);
    let log = execution.concatenated_logs();

    let success = !execution.timeout && !execution.error && tool.found_result(&log);
    let mut record = ResultRecord::from_execution(&execution);
    if !success && !execution.timeout && !execution.error {
        // Exit code 0 but no result in the log: the run is not usable.
        notes.push("Unable to obtain tool result.".to_string());
        record.execution_error = true;
    }
    record.apply_metrics(&tool.scrape_metrics(&log), success);

    if let Some(path) = &export_file {
        if path.is_file() {
            record.export_value_file = Some(path.to_string_lossy().into_owned());
        } else {
            notes.push(format!("Export file {} does not exist.", path.display()));
        }
    }

    let log_name = format!("{identifier}.log");
    record.log = Some(log_name.clone());
    record.notes = notes;

    let mut log_body = log;
    if !record.notes.is_empty() {
        log_body.push('\n');
        log_body.push_str(NOTES_DELIMITER);
        log_body.push('\n');
        for note in &record.notes {
            log_body.push_str(note);
            log_body.push('\n');
        }
    }
    let log_path = logs_dir.join(&log_name);
    fs::write(&log_path, log_body)
        .with_context(|| format!("cannot write {}", log_path.display()))?;

    let record_path = logs_dir.join(format!("{identifier}.json"));
    let json = serde_json::to_string_pretty(&record)?;
    fs::write(&record_path, json)
        .with_context(|| format!("cannot write {}", record_path.display()))?;
    Ok(())
}
