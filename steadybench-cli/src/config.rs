//! Configuration loading from steadybench.toml
//!
//! The configuration file is discovered by walking up from the current
//! directory. Command-line flags override it.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level steadybench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SteadyConfig {
    /// Root of the artifact tree substituted for `$ARTIFACT_DIR`.
    /// Defaults to the current directory when unset.
    #[serde(default)]
    pub artifact_dir: Option<String>,
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Baseline selection for the comparison pass
    #[serde(default)]
    pub comparison: ComparisonConfig,
}

/// Runner configuration for invocation execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Run each command once under a short limit before measuring
    #[serde(default = "default_warm_up")]
    pub warm_up: bool,
    /// Override for the per-invocation time limit, in seconds
    #[serde(default)]
    pub time_limit: Option<f64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            warm_up: default_warm_up(),
            time_limit: None,
        }
    }
}

fn default_warm_up() -> bool {
    true
}

/// Which axes qualify as the accuracy baseline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonConfig {
    /// Baseline tool name (case-insensitive exact match)
    #[serde(default = "default_baseline_tool")]
    pub baseline_tool: String,
    /// Substring the baseline axis's solver id must contain
    #[serde(default = "default_baseline_solver")]
    pub baseline_solver: String,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            baseline_tool: default_baseline_tool(),
            baseline_solver: default_baseline_solver(),
        }
    }
}

fn default_baseline_tool() -> String {
    "storm".to_string()
}
fn default_baseline_solver() -> String {
    "luexact".to_string()
}

impl SteadyConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("steadybench.toml");
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# steadybench configuration

# Root substituted for $ARTIFACT_DIR in commands and stored paths
# (uncomment to enable; defaults to the current directory)
# artifact_dir = "/data/artifacts"

[runner]
# Discarded warm-up run before each measured command
warm_up = true
# Override the per-invocation time limit in seconds (uncomment to enable)
# time_limit = 1800.0

[comparison]
# The baseline axis: this tool, with this substring in the solver id
baseline_tool = "storm"
baseline_solver = "luexact"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SteadyConfig::default();
        assert!(config.runner.warm_up);
        assert_eq!(config.runner.time_limit, None);
        assert_eq!(config.comparison.baseline_tool, "storm");
        assert_eq!(config.comparison.baseline_solver, "luexact");
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            artifact_dir = "/data/artifacts"

            [runner]
            warm_up = false
            time_limit = 900.0
        "#;

        let config: SteadyConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.artifact_dir.as_deref(), Some("/data/artifacts"));
        assert!(!config.runner.warm_up);
        assert_eq!(config.runner.time_limit, Some(900.0));
        // Defaults should still apply
        assert_eq!(config.comparison.baseline_tool, "storm");
    }

    #[test]
    fn test_default_toml_parses() {
        let default_toml = SteadyConfig::default_toml();
        let config: SteadyConfig = toml::from_str(&default_toml).unwrap();
        assert!(config.runner.warm_up);
        assert_eq!(config.comparison.baseline_solver, "luexact");
    }
}
