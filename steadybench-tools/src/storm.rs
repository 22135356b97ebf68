//! Storm log knowledge.

use crate::scrape::{field_after, ToolMetrics};

const NOT_SUPPORTED_FRAGMENTS: &[&str] = &[
    "The model type Markov Automaton is not supported by the hybrid engine.",
    "The model type Markov Automaton is not supported by the dd engine.",
    "The model type CTMC is not supported by the dd engine.",
    "Cannot build symbolic model from JANI model whose system composition that refers to the automaton ",
    "Cannot build symbolic model from JANI model whose system composition refers to the automaton ",
    "The symbolic JANI model builder currently does not support assignment levels.",
];

const MEMORY_EXHAUSTED_FRAGMENTS: &[&str] = &["Maximum memory exceeded.", "BDD Unique table full"];

const INSPECTIONS_MARKER: &str = "Inspections (defined in line ";
const INSPECTIONS_SUFFIX: &str = ") are not supported.";
const UNSUPPORTED_PROPERTY: &str = "Property is unsupported by selected engine/settings.";

pub(crate) fn is_not_supported(log: &str) -> bool {
    if NOT_SUPPORTED_FRAGMENTS
        .iter()
        .any(|fragment| log.contains(fragment))
    {
        return true;
    }

    // "Inspections (defined in line N) are not supported." with the line
    // number in the middle: match the prefix, then the end of that line.
    if let Some(pos) = log.find(INSPECTIONS_MARKER) {
        let line_end = log[pos..]
            .find('\n')
            .map(|offset| pos + offset)
            .unwrap_or(log.len());
        if log[pos..line_end].ends_with(INSPECTIONS_SUFFIX) {
            return true;
        }
    }

    // The generic unsupported-property message also shows up after real
    // errors; it only counts when no ERROR precedes it and it directly
    // follows the "Model checking property" line.
    if let Some(pos) = log.find(UNSUPPORTED_PROPERTY) {
        if let Some(line_end_before) = log[..pos].rfind('\n') {
            let head = &log[..line_end_before];
            if !head.contains("ERROR") {
                let line_start = head.rfind('\n').map(|p| p + 1).unwrap_or(0);
                if head[line_start..].starts_with("Model checking property") {
                    return true;
                }
            }
        }
    }

    false
}

pub(crate) fn is_memory_exhausted(log: &str) -> bool {
    if MEMORY_EXHAUSTED_FRAGMENTS
        .iter()
        .any(|fragment| log.contains(fragment))
    {
        return true;
    }
    // A failing storm run that never printed an ERROR line was almost
    // certainly killed by the OOM killer before it could report anything.
    !log.contains("ERROR")
}

pub(crate) fn found_result(log: &str) -> bool {
    log.contains("\nResult (")
}

pub(crate) fn scrape_metrics(log: &str) -> ToolMetrics {
    ToolMetrics {
        mc_time: field_after(log, "Time for model checking: ", "s.\n").map(str::to_string),
        states: field_after(log, "States: \t", "\n").and_then(|s| s.parse().ok()),
        transient_states: field_after(log, "# Number of non-BSCC states: ", "\n")
            .map(str::to_string),
        non_bottom_sccs: field_after(log, "# Number of non-bottom SCCs: ", "\n")
            .map(str::to_string),
        bottom_sccs: field_after(log, "# Number of BSCCs: ", "\n").map(str::to_string),
        max_non_bottom_scc_size: field_after(log, "# Size of largest non-bottom SCC: ", " states\n")
            .map(str::to_string),
        max_bottom_scc_size: field_after(log, "# Size of largest BSCC: ", " states\n")
            .map(str::to_string),
        topology: field_after(
            log,
            "# Topology of the input model without BSCCs (acyclic = only non-bottom SCCs of size 1): ",
            "\n",
        )
        .map(str::to_string),
        max_scc_chain_length: field_after(log, "# Length of max SCC chain: ", "\n")
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_fragments_classify_as_not_supported() {
        let log = "ERROR (whatever): The model type CTMC is not supported by the dd engine.\n";
        assert!(is_not_supported(log));
    }

    #[test]
    fn inspections_rule_requires_matching_line_suffix() {
        assert!(is_not_supported(
            "Inspections (defined in line 17) are not supported.\n"
        ));
        assert!(!is_not_supported(
            "Inspections (defined in line 17) are great.\n"
        ));
    }

    #[test]
    fn unsupported_property_needs_clean_preceding_context() {
        let clean = "Model checking property P1\nProperty is unsupported by selected engine/settings.\n";
        assert!(is_not_supported(clean));

        let after_error =
            "ERROR: bad model\nModel checking property P1\nProperty is unsupported by selected engine/settings.\n";
        assert!(!is_not_supported(after_error));

        let wrong_context =
            "Building model\nProperty is unsupported by selected engine/settings.\n";
        assert!(!is_not_supported(wrong_context));
    }

    #[test]
    fn silent_failure_counts_as_memout() {
        assert!(is_memory_exhausted("storm started\nand then nothing"));
        assert!(is_memory_exhausted("ERROR: x\nMaximum memory exceeded.\n"));
        assert!(!is_memory_exhausted("ERROR: segfault in solver\n"));
    }

    #[test]
    fn result_marker_detection() {
        assert!(found_result("...\nResult (for initial states): 0.5\n"));
        assert!(!found_result("no result here"));
    }

    #[test]
    fn scrapes_time_states_and_topology() {
        let log = "Time for model checking: 12.345s.\n\
                   States: \t1024\n\
                   # Number of non-BSCC states: 1000\n\
                   # Number of non-bottom SCCs: 3\n\
                   # Number of BSCCs: 2\n\
                   # Size of largest non-bottom SCC: 12 states\n\
                   # Size of largest BSCC: 24 states\n\
                   # Topology of the input model without BSCCs (acyclic = only non-bottom SCCs of size 1): acyclic\n\
                   # Length of max SCC chain: 4\n";
        let metrics = scrape_metrics(log);
        assert_eq!(metrics.mc_time.as_deref(), Some("12.345"));
        assert_eq!(metrics.states, Some(1024));
        assert_eq!(metrics.transient_states.as_deref(), Some("1000"));
        assert_eq!(metrics.non_bottom_sccs.as_deref(), Some("3"));
        assert_eq!(metrics.bottom_sccs.as_deref(), Some("2"));
        assert_eq!(metrics.max_non_bottom_scc_size.as_deref(), Some("12"));
        assert_eq!(metrics.max_bottom_scc_size.as_deref(), Some("24"));
        assert_eq!(metrics.topology.as_deref(), Some("acyclic"));
        assert_eq!(metrics.max_scc_chain_length.as_deref(), Some("4"));
    }

    #[test]
    fn empty_log_scrapes_to_defaults() {
        assert_eq!(scrape_metrics(""), ToolMetrics::default());
    }
}
