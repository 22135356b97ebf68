//! Per-tool knowledge: how each supported verification tool signals
//! unsupported inputs, memory exhaustion, and success in its log, which
//! metrics can be scraped from it, and how its result export is requested.
//!
//! Classification works on the captured log text only; the tools give no
//! machine-readable outcome, so fragment matching against known messages
//! is the interface we have.

mod greatspn;
mod prism;
mod scrape;
mod sds;
mod storm;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use scrape::ToolMetrics;

/// The fixed set of supported tools.
///
/// Dispatch is by this enum everywhere; tool name strings from invocation
/// files are resolved once via [`ToolKind::detect`] and unknown names are
/// rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Storm,
    Prism,
    Sds,
    GreatSpn,
}

/// Classified outcome of a finished, non-timeout execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    NotSupported,
    MemoryExhausted,
    Error,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Outcome::Success => "success",
            Outcome::NotSupported => "not-supported",
            Outcome::MemoryExhausted => "memory-exhausted",
            Outcome::Error => "error",
        };
        f.write_str(text)
    }
}

impl ToolKind {
    /// Resolves a free-form tool name from an invocation file.
    ///
    /// Matching is by case-insensitive substring so variants like
    /// `Storm-evt` or `prism-4.7` map to their base tool.
    pub fn detect(tool_name: &str) -> Option<ToolKind> {
        let lower = tool_name.to_lowercase();
        if lower.contains("storm") {
            Some(ToolKind::Storm)
        } else if lower.contains("prism") {
            Some(ToolKind::Prism)
        } else if lower.contains("sds") {
            Some(ToolKind::Sds)
        } else if lower.contains("greatspn") {
            Some(ToolKind::GreatSpn)
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Storm => "storm",
            ToolKind::Prism => "prism",
            ToolKind::Sds => "sds",
            ToolKind::GreatSpn => "greatspn",
        }
    }

    /// File extension of the tool's result export, if it supports one.
    pub fn export_format(self) -> Option<&'static str> {
        match self {
            ToolKind::Storm => Some(".json"),
            ToolKind::Prism => Some(".txt"),
            ToolKind::Sds | ToolKind::GreatSpn => None,
        }
    }

    /// Command-line argument requesting a result export into `filename`.
    pub fn export_command(self, filename: &str) -> Option<String> {
        match self {
            ToolKind::Storm => Some(format!("--exportresult {filename}")),
            ToolKind::Prism => Some(format!("--exportss {filename}")),
            ToolKind::Sds | ToolKind::GreatSpn => None,
        }
    }

    /// Values at or above this threshold in an exported vector stand in
    /// for infinity and are mapped to IEEE +∞ when parsing.
    pub fn infinity_threshold(self) -> Option<f64> {
        match self {
            ToolKind::Storm => Some(1.0e11),
            ToolKind::Prism | ToolKind::Sds | ToolKind::GreatSpn => None,
        }
    }

    /// Whether the log shows the tool rejecting the input as unsupported.
    pub fn is_not_supported(self, log: &str) -> bool {
        match self {
            ToolKind::Storm => storm::is_not_supported(log),
            ToolKind::Prism => prism::is_not_supported(log),
            ToolKind::Sds => sds::is_not_supported(log),
            ToolKind::GreatSpn => greatspn::is_not_supported(log),
        }
    }

    /// Whether the log shows the tool dying from memory pressure.
    pub fn is_memory_exhausted(self, log: &str) -> bool {
        match self {
            ToolKind::Storm => storm::is_memory_exhausted(log),
            ToolKind::Prism => prism::is_memory_exhausted(log),
            ToolKind::Sds => sds::is_memory_exhausted(log),
            ToolKind::GreatSpn => greatspn::is_memory_exhausted(log),
        }
    }

    /// Whether the log contains the tool's result marker.
    pub fn found_result(self, log: &str) -> bool {
        match self {
            ToolKind::Storm => storm::found_result(log),
            ToolKind::Prism => prism::found_result(log),
            ToolKind::Sds => sds::found_result(log),
            ToolKind::GreatSpn => greatspn::found_result(log),
        }
    }

    /// Scrapes whatever metrics the tool prints into its log.
    pub fn scrape_metrics(self, log: &str) -> ToolMetrics {
        match self {
            ToolKind::Storm => storm::scrape_metrics(log),
            ToolKind::Prism => prism::scrape_metrics(log),
            ToolKind::Sds | ToolKind::GreatSpn => ToolMetrics::default(),
        }
    }
}

/// Classifies a finished execution from its log.
///
/// A run that did not raise the execution-error flag is a success without
/// looking at the log. For failed runs, not-supported takes precedence
/// over memory-exhausted; anything unmatched stays a plain error.
pub fn classify(tool: ToolKind, log: &str, execution_error: bool) -> Outcome {
    if !execution_error {
        return Outcome::Success;
    }
    if tool.is_not_supported(log) {
        Outcome::NotSupported
    } else if tool.is_memory_exhausted(log) {
        Outcome::MemoryExhausted
    } else {
        Outcome::Error
    }
}
