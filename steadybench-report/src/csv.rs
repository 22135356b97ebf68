//! CSV emitters for quantile and scatter plots.
//!
//! Semicolon-delimited, one header line, numbers in plain `Display`
//! form. The plotting side treats the configured sentinel values as
//! "timed out" / "no data" markers on a shared numeric scale.

use steadybench_store::{AxisKey, ResultRecord, ResultStore};

const DELIMITER: char = ';';

/// Quantile plot input: column per axis, row `n` holds each axis's
/// n-th smallest value over the benchmarks it solved cleanly.
///
/// Values above `max_value` are dropped (they would be cut off by the
/// plot anyway), values below `min_value` are clamped up to it so log
/// axes stay finite.
pub fn generate_quantile_csv<F>(
    store: &ResultStore,
    benchmark_ids: &[String],
    axes: &[AxisKey],
    min_value: f64,
    max_value: f64,
    value: F,
) -> String
where
    F: Fn(&ResultRecord) -> Option<f64>,
{
    let columns: Vec<Vec<f64>> = axes
        .iter()
        .map(|axis| {
            let mut values: Vec<f64> = benchmark_ids
                .iter()
                .filter_map(|benchmark_id| store.lookup(axis, benchmark_id))
                .filter(|record| record.is_clean())
                .filter_map(&value)
                .filter(|v| *v <= max_value)
                .map(|v| v.max(min_value))
                .collect();
            values.sort_by(|a, b| a.total_cmp(b));
            values
        })
        .collect();

    let mut out = String::from("n");
    for axis in axes {
        out.push(DELIMITER);
        out.push_str(&axis.to_string());
    }
    out.push('\n');

    let rows = columns.iter().map(Vec::len).max().unwrap_or(0);
    for row in 0..rows {
        out.push_str(&(row + 1).to_string());
        for column in &columns {
            out.push(DELIMITER);
            if let Some(v) = column.get(row) {
                out.push_str(&v.to_string());
            }
        }
        out.push('\n');
    }
    out
}

/// Value substitutions for scatter plots.
#[derive(Debug, Clone, Copy)]
pub struct ScatterOptions {
    /// Clamp floor for real values (log-scale plots).
    pub min_value: f64,
    /// Values above this plot as a timeout.
    pub max_value: f64,
    pub timeout_value: f64,
    pub not_available_value: f64,
}

/// Scatter plot input: row per benchmark, column per axis, plus a
/// `best` column with the row minimum over real values.
pub fn generate_scatter_csv<F>(
    store: &ResultStore,
    benchmark_ids: &[String],
    axes: &[AxisKey],
    options: ScatterOptions,
    value: F,
) -> String
where
    F: Fn(&ResultRecord) -> Option<f64>,
{
    let mut out = String::from("benchmark");
    for axis in axes {
        out.push(DELIMITER);
        out.push_str(&axis.to_string());
    }
    out.push_str(&format!("{DELIMITER}best\n"));

    for benchmark_id in benchmark_ids {
        out.push_str(benchmark_id);
        let mut best: Option<f64> = None;
        for axis in axes {
            let cell = match store.lookup(axis, benchmark_id) {
                None => options.not_available_value,
                Some(record) if record.timeout => options.timeout_value,
                Some(record) if record.execution_error => options.not_available_value,
                Some(record) => match value(record) {
                    None => options.not_available_value,
                    Some(v) if v > options.max_value => options.timeout_value,
                    Some(v) => {
                        let v = v.max(options.min_value);
                        best = Some(best.map_or(v, |b: f64| b.min(v)));
                        v
                    }
                },
            };
            out.push(DELIMITER);
            out.push_str(&cell.to_string());
        }
        out.push(DELIMITER);
        out.push_str(&best.unwrap_or(options.not_available_value).to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use steadybench_exec::{Execution, Invocation, Precision};

    fn record(tool: &str, benchmark: &str, wallclock: f64) -> ResultRecord {
        let invocation = Invocation {
            benchmark_id: benchmark.to_string(),
            tool: tool.to_string(),
            configuration_id: "default".to_string(),
            solver_id: "gmres".to_string(),
            export: false,
            note: String::new(),
            command: format!("{tool} run"),
            time_limit: 60.0,
            precision: Precision::Ignored,
        };
        let mut rec = ResultRecord::from_execution(&Execution::new(invocation));
        rec.wallclock_time = wallclock;
        rec
    }

    #[test]
    fn quantile_columns_are_sorted_and_padded() {
        let mut store = ResultStore::default();
        store.insert(record("storm", "b1", 5.0));
        store.insert(record("storm", "b2", 2.0));
        store.insert(record("prism", "b1", 3.0));
        let mut timed_out = record("prism", "b2", 60.0);
        timed_out.timeout = true;
        store.insert(timed_out);

        let axes = store.axes();
        let csv = generate_quantile_csv(
            &store,
            &store.all_benchmark_ids(),
            &axes,
            0.01,
            1800.0,
            |r| Some(r.wallclock_time),
        );
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "n;prism.default.gmres.ignored;storm.default.gmres.ignored");
        // prism solved one benchmark, storm two (sorted: 2, 5).
        assert_eq!(lines[1], "1;3;2");
        assert_eq!(lines[2], "2;;5");
    }

    #[test]
    fn quantile_clamps_small_values() {
        let mut store = ResultStore::default();
        store.insert(record("storm", "b1", 0.0001));
        let axes = store.axes();
        let csv = generate_quantile_csv(&store, &store.all_benchmark_ids(), &axes, 0.01, 100.0, |r| {
            Some(r.wallclock_time)
        });
        assert!(csv.lines().nth(1).unwrap().ends_with(";0.01"));
    }

    #[test]
    fn scatter_substitutes_sentinels_and_tracks_best() {
        let mut store = ResultStore::default();
        store.insert(record("storm", "b1", 2.0));
        let mut timed_out = record("prism", "b1", 1800.0);
        timed_out.timeout = true;
        store.insert(timed_out);

        let axes = store.axes();
        let options = ScatterOptions {
            min_value: 0.01,
            max_value: 1800.0,
            timeout_value: 7200.0,
            not_available_value: 14400.0,
        };
        let csv = generate_scatter_csv(&store, &store.all_benchmark_ids(), &axes, options, |r| {
            Some(r.wallclock_time)
        });
        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[0].ends_with(";best"));
        // prism sorts first: timeout sentinel, then storm's value, best = 2.
        assert_eq!(lines[1], "b1;7200;2;2");
    }
}
