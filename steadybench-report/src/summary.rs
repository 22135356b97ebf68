//! Per-axis summary counts.

use steadybench_store::{AxisKey, ResultStore};
use steadybench_tools::Outcome;

/// Outcome counts for one axis over a benchmark set.
#[derive(Debug, Clone)]
pub struct AxisSummary {
    pub axis: AxisKey,
    pub solved: usize,
    pub not_supported: usize,
    pub timeouts: usize,
    pub memory_exhausted: usize,
    pub errors: usize,
    /// Solved within 1.01x of the best mc-time over all axes.
    pub fastest_101: usize,
    /// Solved within 1.5x of the best mc-time over all axes.
    pub fastest_150: usize,
}

impl AxisSummary {
    fn new(axis: AxisKey) -> Self {
        Self {
            axis,
            solved: 0,
            not_supported: 0,
            timeouts: 0,
            memory_exhausted: 0,
            errors: 0,
            fastest_101: 0,
            fastest_150: 0,
        }
    }
}

/// Counts outcomes per axis. An axis with no record for a benchmark is
/// counted as not-supported there: the invocation generator only omits
/// combinations the tool cannot run.
pub fn summarize(
    store: &ResultStore,
    benchmark_ids: &[String],
    axes: &[AxisKey],
) -> Vec<AxisSummary> {
    let mut summaries: Vec<AxisSummary> =
        axes.iter().map(|axis| AxisSummary::new(axis.clone())).collect();

    for benchmark_id in benchmark_ids {
        // First pass: solving times, to know the best one.
        let times: Vec<Option<f64>> = axes
            .iter()
            .map(|axis| {
                store
                    .lookup(axis, benchmark_id)
                    .filter(|record| record.is_clean())
                    .and_then(|record| record.mc_time.as_ref())
                    .and_then(|time| time.trim().parse::<f64>().ok())
            })
            .collect();
        let best = times
            .iter()
            .flatten()
            .fold(f64::INFINITY, |acc, &t| acc.min(t));

        for (summary, (axis, time)) in summaries.iter_mut().zip(axes.iter().zip(&times)) {
            let Some(record) = store.lookup(axis, benchmark_id) else {
                summary.not_supported += 1;
                continue;
            };
            if record.timeout {
                summary.timeouts += 1;
                continue;
            }
            if record.execution_error {
                match store.outcome(record) {
                    Outcome::NotSupported => summary.not_supported += 1,
                    Outcome::MemoryExhausted => summary.memory_exhausted += 1,
                    Outcome::Success | Outcome::Error => summary.errors += 1,
                }
                continue;
            }
            match time {
                Some(time) => {
                    summary.solved += 1;
                    if *time <= best * 1.01 {
                        summary.fastest_101 += 1;
                    }
                    if *time <= best * 1.5 {
                        summary.fastest_150 += 1;
                    }
                }
                None => summary.errors += 1,
            }
        }
    }
    summaries
}

/// Plain-text summary table.
pub fn render_summary(summaries: &[AxisSummary]) -> String {
    let mut out = String::new();
    out.push_str(
        "axis\tsolved\tnot-supported\ttimeouts\tmemouts\terrors\tfastest(1.01x)\tfastest(1.5x)\n",
    );
    for summary in summaries {
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
            summary.axis,
            summary.solved,
            summary.not_supported,
            summary.timeouts,
            summary.memory_exhausted,
            summary.errors,
            summary.fastest_101,
            summary.fastest_150
        ));
    }
    out
}
