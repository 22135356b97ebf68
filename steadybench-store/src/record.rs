//! The per-invocation result record.

use crate::axis::AxisKey;
use serde::{Deserialize, Serialize};
use steadybench_exec::{Execution, Invocation, InvocationError};
use steadybench_tools::ToolMetrics;

/// Everything recorded about one finished invocation. Serialized as the
/// flat JSON file sitting next to the log file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(flatten)]
    pub invocation: Invocation,

    /// Total measured wall-clock seconds; always present, 0 when the
    /// process never spawned.
    #[serde(rename = "wallclock-time")]
    pub wallclock_time: f64,
    pub timeout: bool,
    #[serde(rename = "execution-error")]
    pub execution_error: bool,
    #[serde(rename = "return-codes")]
    pub return_codes: Vec<i32>,
    #[serde(default)]
    pub notes: Vec<String>,
    /// Companion log file name, relative to the record's directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,

    /// Model-checking time reported by the tool; only set for runs whose
    /// log carried the tool's result marker.
    #[serde(rename = "mc-time", default, skip_serializing_if = "Option::is_none")]
    pub mc_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub states: Option<u64>,
    #[serde(
        rename = "transient-states",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub transient_states: Option<String>,
    #[serde(
        rename = "non-bottom-SCCs",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub non_bottom_sccs: Option<String>,
    #[serde(rename = "bottom-SCCs", default, skip_serializing_if = "Option::is_none")]
    pub bottom_sccs: Option<String>,
    #[serde(
        rename = "max-non-bottom-SCC-size",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub max_non_bottom_scc_size: Option<String>,
    #[serde(
        rename = "max-bottom-SCC-size",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub max_bottom_scc_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topology: Option<String>,
    #[serde(
        rename = "max-SCC-chain-length",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub max_scc_chain_length: Option<String>,

    /// Path of the exported per-state value file, when the export was
    /// requested and the file exists.
    #[serde(
        rename = "export-value-file",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub export_value_file: Option<String>,

    #[serde(
        rename = "absolute-error-max-norm-value",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub absolute_error_max_norm: Option<f64>,
    #[serde(
        rename = "relative-error-max-norm-value",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub relative_error_max_norm: Option<f64>,
    #[serde(
        rename = "absolute-error-mean-deviation-value",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub absolute_error_mean_deviation: Option<f64>,
    #[serde(
        rename = "relative-error-mean-deviation-value",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub relative_error_mean_deviation: Option<f64>,
}

impl ResultRecord {
    /// Builds the record from a finished execution; tool metrics and
    /// notes are filled in afterwards by the caller.
    pub fn from_execution(execution: &Execution) -> Self {
        Self {
            invocation: execution.invocation().clone(),
            wallclock_time: execution.wall_time,
            timeout: execution.timeout,
            execution_error: execution.error,
            return_codes: execution.return_codes.clone(),
            notes: Vec::new(),
            log: None,
            mc_time: None,
            states: None,
            transient_states: None,
            non_bottom_sccs: None,
            bottom_sccs: None,
            max_non_bottom_scc_size: None,
            max_bottom_scc_size: None,
            topology: None,
            max_scc_chain_length: None,
            export_value_file: None,
            absolute_error_max_norm: None,
            relative_error_max_norm: None,
            absolute_error_mean_deviation: None,
            relative_error_mean_deviation: None,
        }
    }

    /// Neither timed out nor flagged as an execution error.
    pub fn is_clean(&self) -> bool {
        !self.timeout && !self.execution_error
    }

    pub fn axis(&self) -> AxisKey {
        AxisKey::new(
            self.invocation.tool.clone(),
            self.invocation.configuration_id.clone(),
            self.invocation.solver_id.clone(),
            self.invocation.precision.key(),
        )
    }

    pub fn identifier(&self) -> Result<String, InvocationError> {
        self.invocation.identifier()
    }

    /// Copies scraped log metrics onto the record. `mc_time` is taken
    /// only from successful runs; a partial time from a failed run would
    /// look like a result in the tables.
    pub fn apply_metrics(&mut self, metrics: &ToolMetrics, success: bool) {
        if success {
            self.mc_time = metrics.mc_time.clone();
        }
        self.states = metrics.states;
        self.transient_states = metrics.transient_states.clone();
        self.non_bottom_sccs = metrics.non_bottom_sccs.clone();
        self.bottom_sccs = metrics.bottom_sccs.clone();
        self.max_non_bottom_scc_size = metrics.max_non_bottom_scc_size.clone();
        self.max_bottom_scc_size = metrics.max_bottom_scc_size.clone();
        self.topology = metrics.topology.clone();
        self.max_scc_chain_length = metrics.max_scc_chain_length.clone();
    }
}
