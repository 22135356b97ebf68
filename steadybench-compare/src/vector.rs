//! Streaming parser for exported per-state value files.
//!
//! The export format is a JSON array of `{"s": <state index>, "v":
//! <value|null>}` records in ascending state order; states the tool
//! considered exactly zero are omitted. Files can be large (one entry per
//! reachable state), so parsing pulls entries straight off the reader and
//! never materializes the document.

use serde::de::{DeserializeSeed, Deserializer, Error as _, SeqAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VectorError {
    #[error("failed to open export file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed export file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct StateEntry {
    s: u64,
    #[serde(default)]
    v: Option<f64>,
}

/// Parses an export file into a dense vector of length `num_states`.
///
/// Gaps below a present index fill with 0.0; a `null` value means the
/// state's value is infinite. With an `infinity_threshold`, finite values
/// at or above it are the tool's infinity stand-in and map to +∞ too.
///
/// Out-of-order indices, indices beyond `num_states`, and an uncovered
/// tail (fewer entries than states without an explicit final entry) are
/// hard failures: such a file cannot be trusted as a dense vector.
pub fn parse_state_vector(
    path: &Path,
    num_states: usize,
    infinity_threshold: Option<f64>,
) -> Result<Vec<f64>, VectorError> {
    let file = File::open(path).map_err(|source| VectorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut deserializer = serde_json::Deserializer::from_reader(BufReader::new(file));
    let seed = DenseVectorSeed {
        num_states,
        infinity_threshold,
    };
    let vector = seed
        .deserialize(&mut deserializer)
        .map_err(|source| VectorError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    deserializer.end().map_err(|source| VectorError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(vector)
}

struct DenseVectorSeed {
    num_states: usize,
    infinity_threshold: Option<f64>,
}

impl DenseVectorSeed {
    fn map_value(&self, value: Option<f64>) -> f64 {
        match value {
            None => f64::INFINITY,
            Some(v) => match self.infinity_threshold {
                Some(threshold) if v >= threshold => f64::INFINITY,
                _ => v,
            },
        }
    }
}

impl<'de> DeserializeSeed<'de> for DenseVectorSeed {
    type Value = Vec<f64>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Vec<f64>, D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for DenseVectorSeed {
    type Value = Vec<f64>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array of {\"s\": index, \"v\": value} entries in ascending state order")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Vec<f64>, A::Error> {
        let mut vector: Vec<f64> = Vec::with_capacity(self.num_states);
        while let Some(entry) = seq.next_element::<StateEntry>()? {
            let index = entry.s as usize;
            if index < vector.len() {
                return Err(A::Error::custom(format!(
                    "state index {} repeats or runs backwards",
                    entry.s
                )));
            }
            if index >= self.num_states {
                return Err(A::Error::custom(format!(
                    "state index {} exceeds the reported state count {}",
                    entry.s, self.num_states
                )));
            }
            // Omitted states below this index are exact zeros.
            vector.resize(index, 0.0);
            vector.push(self.map_value(entry.v));
        }
        if vector.len() < self.num_states {
            return Err(A::Error::custom(format!(
                "export covers only {} of {} states",
                vector.len(),
                self.num_states
            )));
        }
        Ok(vector)
    }
}
