//! Baseline resolution and per-axis error scalars.

use crate::vector::parse_state_vector;
use crate::{absolute_errors, max_norm, mean_deviation, relative_errors, sentinel};
use steadybench_exec::ArtifactDir;
use steadybench_store::{AxisKey, ResultRecord, ResultStore};
use steadybench_tools::ToolKind;

/// The four comparison scalars attached to a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorScalars {
    pub absolute_max_norm: f64,
    pub relative_max_norm: f64,
    pub absolute_mean_deviation: f64,
    pub relative_mean_deviation: f64,
}

impl ErrorScalars {
    fn uniform(value: f64) -> Self {
        Self {
            absolute_max_norm: value,
            relative_max_norm: value,
            absolute_mean_deviation: value,
            relative_mean_deviation: value,
        }
    }
}

/// Computes and stores comparison scalars for every (axis, benchmark)
/// pair in the store.
///
/// For each benchmark, the baseline vector comes from the first axis in
/// `baseline_axes` with a usable record: clean run, reported state count,
/// and a parsable export file. Without any baseline, every axis of that
/// benchmark gets the NO_BASELINE sentinel; with one, axes without a
/// usable export of their own get NOT_AVAILABLE.
pub fn generate_comparison_values(
    store: &mut ResultStore,
    benchmark_ids: &[String],
    baseline_axes: &[AxisKey],
    artifacts: &ArtifactDir,
) {
    let axes = store.axes();
    for benchmark_id in benchmark_ids {
        let baseline = resolve_baseline(store, benchmark_id, baseline_axes, artifacts);
        for axis in &axes {
            let scalars = match store.lookup(axis, benchmark_id) {
                None => continue,
                Some(record) => match &baseline {
                    None => ErrorScalars::uniform(sentinel::NO_BASELINE),
                    Some(baseline) => axis_scalars(record, baseline, artifacts),
                },
            };
            if let Some(record) = store.record_mut(axis, benchmark_id) {
                record.absolute_error_max_norm = Some(scalars.absolute_max_norm);
                record.relative_error_max_norm = Some(scalars.relative_max_norm);
                record.absolute_error_mean_deviation = Some(scalars.absolute_mean_deviation);
                record.relative_error_mean_deviation = Some(scalars.relative_mean_deviation);
            }
        }
    }
}

/// Loads a record's exported vector, or `None` with a diagnostic.
fn load_vector(record: &ResultRecord, artifacts: &ArtifactDir) -> Option<Vec<f64>> {
    let file = record.export_value_file.as_ref()?;
    let states = record.states? as usize;
    let threshold =
        ToolKind::detect(&record.invocation.tool).and_then(ToolKind::infinity_threshold);
    match parse_state_vector(&artifacts.expand_path(file), states, threshold) {
        Ok(vector) => Some(vector),
        Err(e) => {
            tracing::warn!(
                benchmark_id = %record.invocation.benchmark_id,
                axis = %record.axis(),
                error = %e,
                "unusable export file"
            );
            None
        }
    }
}

fn resolve_baseline(
    store: &ResultStore,
    benchmark_id: &str,
    baseline_axes: &[AxisKey],
    artifacts: &ArtifactDir,
) -> Option<Vec<f64>> {
    baseline_axes.iter().find_map(|axis| {
        let record = store.lookup(axis, benchmark_id)?;
        if !record.is_clean() {
            return None;
        }
        load_vector(record, artifacts)
    })
}

fn axis_scalars(record: &ResultRecord, baseline: &[f64], artifacts: &ArtifactDir) -> ErrorScalars {
    if !record.is_clean() {
        return ErrorScalars::uniform(sentinel::NOT_AVAILABLE);
    }
    let Some(candidate) = load_vector(record, artifacts) else {
        return ErrorScalars::uniform(sentinel::NOT_AVAILABLE);
    };
    if candidate.len() != baseline.len() {
        tracing::warn!(
            benchmark_id = %record.invocation.benchmark_id,
            axis = %record.axis(),
            candidate = candidate.len(),
            baseline = baseline.len(),
            "state count differs from baseline"
        );
        return ErrorScalars::uniform(sentinel::NOT_AVAILABLE);
    }

    let absolute = absolute_errors(&candidate, baseline);
    let relative = relative_errors(&absolute, baseline);
    ErrorScalars {
        absolute_max_norm: max_norm(&absolute),
        relative_max_norm: max_norm(&relative),
        absolute_mean_deviation: mean_deviation(&absolute),
        relative_mean_deviation: mean_deviation(&relative),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use steadybench_exec::{Execution, Invocation, Precision};

    fn record(tool: &str, solver: &str, benchmark: &str) -> ResultRecord {
        let invocation = Invocation {
            benchmark_id: benchmark.to_string(),
            tool: tool.to_string(),
            configuration_id: "default".to_string(),
            solver_id: solver.to_string(),
            export: true,
            note: String::new(),
            command: format!("{tool} run"),
            time_limit: 60.0,
            precision: Precision::Ignored,
        };
        ResultRecord::from_execution(&Execution::new(invocation))
    }

    fn write_export(dir: &std::path::Path, name: &str, content: &str) -> String {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn scalars(store: &ResultStore, tool: &str, solver: &str, benchmark: &str) -> ErrorScalars {
        let axis = AxisKey::new(tool, "default", solver, "ignored");
        let record = store.lookup(&axis, benchmark).unwrap();
        ErrorScalars {
            absolute_max_norm: record.absolute_error_max_norm.unwrap(),
            relative_max_norm: record.relative_error_max_norm.unwrap(),
            absolute_mean_deviation: record.absolute_error_mean_deviation.unwrap(),
            relative_mean_deviation: record.relative_error_mean_deviation.unwrap(),
        }
    }

    #[test]
    fn baseline_compared_to_itself_is_all_zero() {
        let dir = tempfile::tempdir().unwrap();
        let export = write_export(
            dir.path(),
            "base.json",
            r#"[{"s": 0, "v": 0.25}, {"s": 1, "v": 0.75}]"#,
        );
        let mut base = record("storm", "luexact", "b1");
        base.states = Some(2);
        base.export_value_file = Some(export);

        let mut store = ResultStore::default();
        let baseline_axis = base.axis();
        store.insert(base);

        generate_comparison_values(
            &mut store,
            &["b1".to_string()],
            &[baseline_axis],
            &ArtifactDir::new("/"),
        );

        let s = scalars(&store, "storm", "luexact", "b1");
        assert_eq!(s, ErrorScalars::uniform(0.0));
    }

    #[test]
    fn missing_baseline_marks_all_axes_no_baseline() {
        let mut store = ResultStore::default();
        store.insert(record("prism", "power", "b1"));
        store.insert(record("sds", "bounded", "b1"));

        generate_comparison_values(
            &mut store,
            &["b1".to_string()],
            &[AxisKey::new("storm", "default", "luexact", "ignored")],
            &ArtifactDir::new("/"),
        );

        for (tool, solver) in [("prism", "power"), ("sds", "bounded")] {
            let s = scalars(&store, tool, solver, "b1");
            assert_eq!(s, ErrorScalars::uniform(sentinel::NO_BASELINE));
        }
    }

    #[test]
    fn axis_without_export_gets_not_available() {
        let dir = tempfile::tempdir().unwrap();
        let export = write_export(dir.path(), "base.json", r#"[{"s": 0, "v": 1.0}]"#);
        let mut base = record("storm", "luexact", "b1");
        base.states = Some(1);
        base.export_value_file = Some(export);
        let baseline_axis = base.axis();

        let mut store = ResultStore::default();
        store.insert(base);
        store.insert(record("prism", "power", "b1"));

        generate_comparison_values(
            &mut store,
            &["b1".to_string()],
            &[baseline_axis],
            &ArtifactDir::new("/"),
        );

        let s = scalars(&store, "prism", "power", "b1");
        assert_eq!(s, ErrorScalars::uniform(sentinel::NOT_AVAILABLE));
    }

    #[test]
    fn timed_out_axis_gets_not_available() {
        let dir = tempfile::tempdir().unwrap();
        let export = write_export(dir.path(), "base.json", r#"[{"s": 0, "v": 1.0}]"#);
        let mut base = record("storm", "luexact", "b1");
        base.states = Some(1);
        base.export_value_file = Some(export.clone());
        let baseline_axis = base.axis();

        let mut candidate = record("storm", "gmres", "b1");
        candidate.timeout = true;
        candidate.states = Some(1);
        candidate.export_value_file = Some(export);

        let mut store = ResultStore::default();
        store.insert(base);
        store.insert(candidate);

        generate_comparison_values(
            &mut store,
            &["b1".to_string()],
            &[baseline_axis],
            &ArtifactDir::new("/"),
        );

        let s = scalars(&store, "storm", "gmres", "b1");
        assert_eq!(s, ErrorScalars::uniform(sentinel::NOT_AVAILABLE));
    }

    #[test]
    fn lone_infinity_in_candidate_gives_infinite_norms() {
        let dir = tempfile::tempdir().unwrap();
        let base_export = write_export(
            dir.path(),
            "base.json",
            r#"[{"s": 0, "v": 0.5}, {"s": 1, "v": 0.5}]"#,
        );
        let cand_export = write_export(
            dir.path(),
            "cand.json",
            r#"[{"s": 0, "v": null}, {"s": 1, "v": 0.5}]"#,
        );

        let mut base = record("storm", "luexact", "b1");
        base.states = Some(2);
        base.export_value_file = Some(base_export);
        let baseline_axis = base.axis();

        let mut candidate = record("storm", "gmres", "b1");
        candidate.states = Some(2);
        candidate.export_value_file = Some(cand_export);

        let mut store = ResultStore::default();
        store.insert(base);
        store.insert(candidate);

        generate_comparison_values(
            &mut store,
            &["b1".to_string()],
            &[baseline_axis],
            &ArtifactDir::new("/"),
        );

        let s = scalars(&store, "storm", "gmres", "b1");
        assert_eq!(s.absolute_max_norm, f64::INFINITY);
        assert_eq!(s.relative_max_norm, f64::INFINITY);
        assert_eq!(s.absolute_mean_deviation, f64::INFINITY);
    }

    #[test]
    fn baseline_falls_through_to_the_next_axis() {
        let dir = tempfile::tempdir().unwrap();
        let export = write_export(dir.path(), "base.json", r#"[{"s": 0, "v": 1.0}]"#);

        // First baseline candidate timed out; second is usable.
        let mut dead = record("storm", "luexact-a", "b1");
        dead.timeout = true;
        let dead_axis = dead.axis();

        let mut live = record("storm", "luexact-b", "b1");
        live.states = Some(1);
        live.export_value_file = Some(export);
        let live_axis = live.axis();

        let mut store = ResultStore::default();
        store.insert(dead);
        store.insert(live);

        generate_comparison_values(
            &mut store,
            &["b1".to_string()],
            &[dead_axis, live_axis],
            &ArtifactDir::new("/"),
        );

        let s = scalars(&store, "storm", "luexact-b", "b1");
        assert_eq!(s, ErrorScalars::uniform(0.0));
    }
}
