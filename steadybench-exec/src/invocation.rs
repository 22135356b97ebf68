//! Benchmark invocation identity and JSON model.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Joins the axis fields and the benchmark id into an identifier.
///
/// Identifiers double as log and record file names, so the axis fields
/// must not contain the separator themselves. Benchmark ids may.
pub const IDENTIFIER_SEPARATOR: char = '.';

/// Numerical precision requested from the tool, or `"ignored"` for
/// configurations where precision has no meaning (e.g. exact solvers).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Precision {
    Ignored,
    Value(f64),
}

impl Precision {
    /// Stable string form used inside identifiers and axis keys.
    pub fn key(&self) -> String {
        match self {
            Precision::Ignored => "ignored".to_string(),
            Precision::Value(v) => format!("{v}"),
        }
    }
}

impl Serialize for Precision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Precision::Ignored => serializer.serialize_str("ignored"),
            Precision::Value(v) => serializer.serialize_f64(*v),
        }
    }
}

struct PrecisionVisitor;

impl<'de> Visitor<'de> for PrecisionVisitor {
    type Value = Precision;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or the string \"ignored\"")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Precision, E> {
        Ok(Precision::Value(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Precision, E> {
        Ok(Precision::Value(v as f64))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Precision, E> {
        Ok(Precision::Value(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Precision, E> {
        if v == "ignored" {
            Ok(Precision::Ignored)
        } else {
            Err(de::Error::invalid_value(de::Unexpected::Str(v), &self))
        }
    }
}

impl<'de> Deserialize<'de> for Precision {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Precision, D::Error> {
        deserializer.deserialize_any(PrecisionVisitor)
    }
}

/// One benchmark invocation: which tool runs which command on which
/// benchmark, under which configuration/solver/precision axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invocation {
    #[serde(rename = "benchmark-id")]
    pub benchmark_id: String,
    pub tool: String,
    #[serde(rename = "configuration-id")]
    pub configuration_id: String,
    #[serde(rename = "solver-id")]
    pub solver_id: String,
    /// Whether the per-state result vector should be exported to a file.
    pub export: bool,
    #[serde(rename = "invocation-note", default)]
    pub note: String,
    pub command: String,
    /// Wall-clock budget in seconds for the whole command sequence.
    #[serde(rename = "time-limit")]
    pub time_limit: f64,
    pub precision: Precision,
}

#[derive(Debug, thiserror::Error)]
pub enum InvocationError {
    #[error("{field} '{value}' must not contain '{IDENTIFIER_SEPARATOR}'")]
    SeparatorInField { field: &'static str, value: String },
}

impl Invocation {
    /// `tool.configuration.solver.precision.benchmark` identifier.
    ///
    /// Fails if any axis field contains the separator; the benchmark id is
    /// last and may contain dots (it frequently does).
    pub fn identifier(&self) -> Result<String, InvocationError> {
        for (field, value) in [
            ("tool", &self.tool),
            ("configuration-id", &self.configuration_id),
            ("solver-id", &self.solver_id),
        ] {
            if value.contains(IDENTIFIER_SEPARATOR) {
                return Err(InvocationError::SeparatorInField {
                    field,
                    value: value.clone(),
                });
            }
        }
        let precision = self.precision.key();
        Ok([
            self.tool.as_str(),
            self.configuration_id.as_str(),
            self.solver_id.as_str(),
            precision.as_str(),
            self.benchmark_id.as_str(),
        ]
        .join(&IDENTIFIER_SEPARATOR.to_string()))
    }

    /// The commands executed for this invocation, in order.
    pub fn command_sequence(&self) -> Vec<String> {
        vec![self.command.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_invocation() -> Invocation {
        Invocation {
            benchmark_id: "ctmc.polling.3".to_string(),
            tool: "storm".to_string(),
            configuration_id: "sparse".to_string(),
            solver_id: "gmres".to_string(),
            export: true,
            note: String::new(),
            command: "storm --steadystate model.jani".to_string(),
            time_limit: 1800.0,
            precision: Precision::Value(1e-3),
        }
    }

    #[test]
    fn identifier_joins_all_axes() {
        let inv = dummy_invocation();
        assert_eq!(
            inv.identifier().unwrap(),
            "storm.sparse.gmres.0.001.ctmc.polling.3"
        );
    }

    #[test]
    fn identifier_rejects_separator_in_axis_fields() {
        let mut inv = dummy_invocation();
        inv.solver_id = "power.exact".to_string();
        assert!(inv.identifier().is_err());
    }

    #[test]
    fn benchmark_id_may_contain_dots() {
        let mut inv = dummy_invocation();
        inv.benchmark_id = "dtmc.brp.16-2".to_string();
        assert!(inv.identifier().is_ok());
    }

    #[test]
    fn precision_round_trips_both_forms() {
        let ignored: Precision = serde_json::from_str("\"ignored\"").unwrap();
        assert_eq!(ignored, Precision::Ignored);
        assert_eq!(serde_json::to_string(&ignored).unwrap(), "\"ignored\"");

        let numeric: Precision = serde_json::from_str("0.001").unwrap();
        assert_eq!(numeric, Precision::Value(0.001));
        assert_eq!(numeric.key(), "0.001");
    }

    #[test]
    fn invocation_uses_kebab_case_keys() {
        let json = serde_json::to_value(dummy_invocation()).unwrap();
        assert!(json.get("benchmark-id").is_some());
        assert!(json.get("configuration-id").is_some());
        assert!(json.get("time-limit").is_some());
        assert!(json.get("invocation-note").is_some());
    }
}
