//! Axis combinations: the columnar unit of every report.

use std::fmt;

/// One (tool, configuration, solver, precision) combination.
///
/// A single composite key rather than nested maps; ordering is the
/// lexicographic tuple order, which gives reports their stable column
/// order for free.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AxisKey {
    pub tool: String,
    pub configuration: String,
    pub solver: String,
    /// Stable string form of the precision (`"ignored"` or the number).
    pub precision: String,
}

impl AxisKey {
    pub fn new(
        tool: impl Into<String>,
        configuration: impl Into<String>,
        solver: impl Into<String>,
        precision: impl Into<String>,
    ) -> Self {
        Self {
            tool: tool.into(),
            configuration: configuration.into(),
            solver: solver.into(),
            precision: precision.into(),
        }
    }
}

impl fmt::Display for AxisKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.tool, self.configuration, self.solver, self.precision
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_with_dots() {
        let axis = AxisKey::new("storm", "sparse", "gmres", "0.001");
        assert_eq!(axis.to_string(), "storm.sparse.gmres.0.001");
    }

    #[test]
    fn ordering_is_tuple_lexicographic() {
        let a = AxisKey::new("prism", "default", "power", "ignored");
        let b = AxisKey::new("storm", "default", "power", "ignored");
        assert!(a < b);
    }
}
