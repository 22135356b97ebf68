//! Directory-backed result store.

use crate::axis::AxisKey;
use crate::record::ResultRecord;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use steadybench_tools::{classify, Outcome, ToolKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("record {path} has no companion log file")]
    MissingLog { path: PathBuf },
}

/// All records of a benchmark run, keyed by axis and benchmark id.
///
/// Duplicate (axis, benchmark) pairs overwrite with a warning; a re-run
/// of a single invocation replaces its stale record.
#[derive(Debug, Default)]
pub struct ResultStore {
    records: BTreeMap<AxisKey, BTreeMap<String, ResultRecord>>,
    root: PathBuf,
    duplicates: usize,
}

impl ResultStore {
    /// Scans `dir` for `*.json` record files.
    ///
    /// An unparsable record is logged and skipped so one corrupt file
    /// never hides the rest of the run.
    pub fn build(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        let mut store = Self {
            records: BTreeMap::new(),
            root: dir.to_path_buf(),
            duplicates: 0,
        };

        let entries = fs::read_dir(dir).map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        for path in paths {
            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable record");
                    continue;
                }
            };
            match serde_json::from_str::<ResultRecord>(&text) {
                Ok(record) => store.insert(record),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping malformed record");
                }
            }
        }
        Ok(store)
    }

    pub fn insert(&mut self, record: ResultRecord) {
        let axis = record.axis();
        let benchmark_id = record.invocation.benchmark_id.clone();
        let slot = self.records.entry(axis.clone()).or_default();
        if slot.insert(benchmark_id.clone(), record).is_some() {
            self.duplicates += 1;
            tracing::warn!(%axis, %benchmark_id, "duplicate result record, keeping the later one");
        }
    }

    pub fn lookup(&self, axis: &AxisKey, benchmark_id: &str) -> Option<&ResultRecord> {
        self.records.get(axis)?.get(benchmark_id)
    }

    pub fn record_mut(&mut self, axis: &AxisKey, benchmark_id: &str) -> Option<&mut ResultRecord> {
        self.records.get_mut(axis)?.get_mut(benchmark_id)
    }

    /// All axes, in stable order.
    pub fn axes(&self) -> Vec<AxisKey> {
        self.records.keys().cloned().collect()
    }

    /// Sorted union of all benchmark ids across axes.
    pub fn all_benchmark_ids(&self) -> Vec<String> {
        let ids: BTreeSet<&String> = self
            .records
            .values()
            .flat_map(|by_benchmark| by_benchmark.keys())
            .collect();
        ids.into_iter().cloned().collect()
    }

    pub fn records_for(&self, axis: &AxisKey) -> impl Iterator<Item = &ResultRecord> {
        self.records.get(axis).into_iter().flat_map(BTreeMap::values)
    }

    pub fn len(&self) -> usize {
        self.records.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// How many duplicate (axis, benchmark) inserts were overwritten.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Reads a record's companion log from the store directory.
    pub fn read_log(&self, record: &ResultRecord) -> Result<String, StoreError> {
        let name = record.log.as_ref().ok_or_else(|| StoreError::MissingLog {
            path: self.root.clone(),
        })?;
        let path = self.root.join(name);
        fs::read_to_string(&path).map_err(|source| StoreError::Io { path, source })
    }

    /// Classifies a record, reading its log on demand for failed runs.
    ///
    /// Unknown tools and unreadable logs degrade to [`Outcome::Error`]
    /// with a diagnostic.
    pub fn outcome(&self, record: &ResultRecord) -> Outcome {
        if !record.execution_error {
            return Outcome::Success;
        }
        let Some(tool) = ToolKind::detect(&record.invocation.tool) else {
            tracing::warn!(tool = %record.invocation.tool, "unknown tool, leaving outcome as error");
            return Outcome::Error;
        };
        match self.read_log(record) {
            Ok(log) => classify(tool, &log, true),
            Err(e) => {
                tracing::warn!(error = %e, "cannot read log for classification");
                Outcome::Error
            }
        }
    }

    /// Number of benchmarks on this axis the tool did not reject as
    /// unsupported.
    pub fn supported_count(&self, axis: &AxisKey) -> usize {
        self.records_for(axis)
            .filter(|record| self.outcome(record) != Outcome::NotSupported)
            .count()
    }
}
