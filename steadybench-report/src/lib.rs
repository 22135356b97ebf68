//! Report boundary: turns the result store into per-cell outcomes,
//! per-axis summary counts, and CSV files for plotting. Everything here
//! is read-only over the store; rendering beyond plain text/CSV lives
//! outside this crate.

mod csv;
mod summary;

pub use csv::{generate_quantile_csv, generate_scatter_csv, ScatterOptions};
pub use summary::{render_summary, summarize, AxisSummary};

use std::fmt;
use steadybench_compare::sentinel;
use steadybench_store::{AxisKey, ResultStore};
use steadybench_tools::Outcome;

/// What one (benchmark, axis) table cell shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Value(f64),
    Timeout,
    MemoryExhausted,
    NotSupported,
    Error,
    NotAvailable,
    NoBaseline,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Value(v) => write!(f, "{v}"),
            Cell::Timeout => f.write_str("TO"),
            Cell::MemoryExhausted => f.write_str("MO"),
            Cell::NotSupported => f.write_str("NS"),
            Cell::Error => f.write_str("ERR"),
            Cell::NotAvailable => f.write_str("NA"),
            Cell::NoBaseline => f.write_str("NO BASELINE"),
        }
    }
}

/// Resolves one table cell; `None` when the axis has no record for the
/// benchmark at all.
///
/// Timeouts win over everything, then log classification for failed
/// runs, then the value with its sentinels decoded.
pub fn resolve_cell<F>(
    store: &ResultStore,
    axis: &AxisKey,
    benchmark_id: &str,
    value: F,
) -> Option<Cell>
where
    F: Fn(&steadybench_store::ResultRecord) -> Option<f64>,
{
    let record = store.lookup(axis, benchmark_id)?;
    if record.timeout {
        return Some(Cell::Timeout);
    }
    if record.execution_error {
        return Some(match store.outcome(record) {
            Outcome::NotSupported => Cell::NotSupported,
            Outcome::MemoryExhausted => Cell::MemoryExhausted,
            Outcome::Success | Outcome::Error => Cell::Error,
        });
    }
    Some(match value(record) {
        None => Cell::NotAvailable,
        Some(v) if v == sentinel::NO_BASELINE => Cell::NoBaseline,
        Some(v) if v == sentinel::NOT_AVAILABLE => Cell::NotAvailable,
        Some(v) => Cell::Value(v),
    })
}
