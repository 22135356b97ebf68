//! The `postprocess` subcommand: aggregate recorded results.

use crate::SteadyConfig;
use anyhow::Context;
use std::fs;
use std::path::PathBuf;
use steadybench_compare::generate_comparison_values;
use steadybench_exec::ArtifactDir;
use steadybench_report::{
    generate_quantile_csv, generate_scatter_csv, render_summary, summarize, ScatterOptions,
};
use steadybench_store::{AxisKey, ResultStore};

/// Options for the `postprocess` subcommand.
#[derive(Debug, Clone)]
pub struct PostprocessOptions {
    /// Results directory written by `run`.
    pub results_dir: PathBuf,
    /// Time limit the run used; plot values are cut off here.
    pub time_limit: f64,
    /// Compute baseline-relative accuracy scalars.
    pub compare: bool,
}

/// Rebuilds the store from `<results>/logs`, optionally runs the
/// comparison pass, and writes summary and plot files into
/// `<results>/tables` and `<results>/plots`.
pub fn postprocess(
    options: &PostprocessOptions,
    config: &SteadyConfig,
    artifacts: &ArtifactDir,
) -> anyhow::Result<()> {
    let logs_dir = options.results_dir.join("logs");
    let mut store = ResultStore::build(&logs_dir)
        .with_context(|| format!("cannot scan {}", logs_dir.display()))?;
    anyhow::ensure!(
        !store.is_empty(),
        "no result records found in {}",
        logs_dir.display()
    );

    let axes = store.axes();
    let benchmark_ids = store.all_benchmark_ids();
    println!(
        "Found {} results: {} axes, {} benchmarks.",
        store.len(),
        axes.len(),
        benchmark_ids.len()
    );
    for axis in &axes {
        println!("{axis}: {} supported benchmarks", store.supported_count(axis));
    }

    let plots_dir = options.results_dir.join("plots");
    let tables_dir = options.results_dir.join("tables");
    fs::create_dir_all(&plots_dir)
        .with_context(|| format!("cannot create {}", plots_dir.display()))?;
    fs::create_dir_all(&tables_dir)
        .with_context(|| format!("cannot create {}", tables_dir.display()))?;

    if options.compare {
        let baseline_axes = baseline_axes(&axes, config);
        if baseline_axes.is_empty() {
            tracing::warn!(
                tool = %config.comparison.baseline_tool,
                solver = %config.comparison.baseline_solver,
                "no axes match the baseline selection, all scalars will be no-baseline"
            );
        } else {
            for axis in &baseline_axes {
                println!("Baseline axis: {axis}");
            }
        }
        generate_comparison_values(&mut store, &benchmark_ids, &baseline_axes, artifacts);

        // Sentinels are negative; dropping them here plots the axis as
        // "no data" rather than as a tiny error.
        let error_scatter = generate_scatter_csv(
            &store,
            &benchmark_ids,
            &axes,
            ScatterOptions {
                min_value: 1e-16,
                max_value: 1e9,
                timeout_value: 1e12,
                not_available_value: 1e15,
            },
            |record| record.relative_error_max_norm.filter(|v| *v >= 0.0),
        );
        fs::write(plots_dir.join("relative-error-scatter.csv"), error_scatter)?;
    }

    let quantile = generate_quantile_csv(
        &store,
        &benchmark_ids,
        &axes,
        0.01,
        options.time_limit,
        |record| Some(record.wallclock_time),
    );
    fs::write(plots_dir.join("wallclock-time-quantile.csv"), quantile)?;

    let scatter = generate_scatter_csv(
        &store,
        &benchmark_ids,
        &axes,
        ScatterOptions {
            min_value: 0.01,
            max_value: options.time_limit,
            timeout_value: options.time_limit * 4.0,
            not_available_value: options.time_limit * 8.0,
        },
        |record| Some(record.wallclock_time),
    );
    fs::write(plots_dir.join("wallclock-time-scatter.csv"), scatter)?;

    let summary = render_summary(&summarize(&store, &benchmark_ids, &axes));
    fs::write(tables_dir.join("summary.txt"), &summary)?;
    println!("\n{summary}");
    Ok(())
}

/// Axes qualifying as accuracy baseline, in stable order.
fn baseline_axes(axes: &[AxisKey], config: &SteadyConfig) -> Vec<AxisKey> {
    axes.iter()
        .filter(|axis| {
            axis.tool
                .eq_ignore_ascii_case(&config.comparison.baseline_tool)
                && axis.solver.contains(&config.comparison.baseline_solver)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_selection_matches_tool_and_solver_fragment() {
        let axes = vec![
            AxisKey::new("Storm", "exact", "luexact-topo", "ignored"),
            AxisKey::new("storm", "sparse", "gmres", "0.001"),
            AxisKey::new("prism", "default", "luexact", "ignored"),
        ];
        let config = SteadyConfig::default();
        let selected = baseline_axes(&axes, &config);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].solver, "luexact-topo");
    }
}
