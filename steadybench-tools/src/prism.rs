//! PRISM log knowledge.

use crate::scrape::{field_after, ToolMetrics};

const NOT_SUPPORTED_FRAGMENTS: &[&str] = &[
    "Error: Syntax error (",
    "Cannot read the input file ",
    " not supported",
    "Invalid (or unsupported) ",
    "Unsupported operator in label expression: ",
    "unsupported model type: ",
    "Unsupported type for constant ",
    "Unsupported expression ",
];

const MEMORY_EXHAUSTED_FRAGMENTS: &[&str] =
    &["java.lang.OutOfMemory", "java.lang.StackOverflowError"];

const STEADY_STATE_BANNER: &str = "Printing steady-state probabilities in plain text format below:";

pub(crate) fn is_not_supported(log: &str) -> bool {
    NOT_SUPPORTED_FRAGMENTS
        .iter()
        .any(|fragment| log.contains(fragment))
}

pub(crate) fn is_memory_exhausted(log: &str) -> bool {
    MEMORY_EXHAUSTED_FRAGMENTS
        .iter()
        .any(|fragment| log.contains(fragment))
}

pub(crate) fn found_result(log: &str) -> bool {
    log.contains("Result: ") || log.contains(STEADY_STATE_BANNER)
}

pub(crate) fn scrape_metrics(log: &str) -> ToolMetrics {
    ToolMetrics {
        mc_time: field_after(
            log,
            "Time for steady-state probability computation: ",
            " seconds.\n",
        )
        .map(str::to_string),
        states: field_after(log, "States:      ", " (").and_then(|s| s.parse().ok()),
        transient_states: field_after(log, "non-BSCC states: ", "\n").map(str::to_string),
        ..ToolMetrics::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_errors_are_not_supported() {
        assert!(is_not_supported("Error: Syntax error (line 3)\n"));
        assert!(is_not_supported("Unsupported type for constant k\n"));
        assert!(!is_not_supported("Error: numeric instability\n"));
    }

    #[test]
    fn jvm_memory_failures_are_memout() {
        assert!(is_memory_exhausted("java.lang.OutOfMemoryError: heap\n"));
        assert!(is_memory_exhausted("java.lang.StackOverflowError\n"));
        // Unlike storm, a silent prism failure is a plain error.
        assert!(!is_memory_exhausted("killed without a message"));
    }

    #[test]
    fn either_result_marker_counts() {
        assert!(found_result("Result: 0.25\n"));
        assert!(found_result(&format!("{STEADY_STATE_BANNER}\n0:0.5\n")));
        assert!(!found_result("Computing...\n"));
    }

    #[test]
    fn scrapes_time_and_states() {
        let log = "States:      4096 (1 initial)\n\
                   non-BSCC states: 4000\n\
                   Time for steady-state probability computation: 3.21 seconds.\n";
        let metrics = scrape_metrics(log);
        assert_eq!(metrics.mc_time.as_deref(), Some("3.21"));
        assert_eq!(metrics.states, Some(4096));
        assert_eq!(metrics.transient_states.as_deref(), Some("4000"));
        assert_eq!(metrics.topology, None);
    }
}
