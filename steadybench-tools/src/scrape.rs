//! Shared helpers for scraping metrics out of tool logs.

/// Metrics a tool may print into its log. Everything is optional; tools
/// differ in what they report and failed runs report nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolMetrics {
    /// Model-checking time as reported by the tool, seconds (kept as the
    /// tool's own string to avoid re-rounding).
    pub mc_time: Option<String>,
    pub states: Option<u64>,
    pub transient_states: Option<String>,
    pub non_bottom_sccs: Option<String>,
    pub bottom_sccs: Option<String>,
    pub max_non_bottom_scc_size: Option<String>,
    pub max_bottom_scc_size: Option<String>,
    pub topology: Option<String>,
    pub max_scc_chain_length: Option<String>,
}

/// Returns the text between `marker` and the next `terminator`.
///
/// With no terminator after the marker, the rest of the log is returned;
/// logs cut off mid-line (killed processes) still yield their last value.
pub(crate) fn field_after<'a>(log: &'a str, marker: &str, terminator: &str) -> Option<&'a str> {
    let start = log.find(marker)? + marker.len();
    let rest = &log[start..];
    let end = rest.find(terminator).unwrap_or(rest.len());
    Some(&rest[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_between_marker_and_terminator() {
        let log = "prelude\nStates: \t42\nrest";
        assert_eq!(field_after(log, "States: \t", "\n"), Some("42"));
    }

    #[test]
    fn missing_marker_yields_none() {
        assert_eq!(field_after("nothing here", "States: \t", "\n"), None);
    }

    #[test]
    fn missing_terminator_takes_the_tail() {
        let log = "Time for model checking: 1.234";
        assert_eq!(
            field_after(log, "Time for model checking: ", "s.\n"),
            Some("1.234")
        );
    }
}
