//! Artifact directory substitution.
//!
//! Invocation commands and stored file paths may reference the shared
//! artifact tree (models, property files, export files) through the
//! `$ARTIFACT_DIR` placeholder. The root is an explicit value threaded in
//! from configuration, never read from the process environment, so two
//! runs in one process can use different roots.

use std::path::{Path, PathBuf};

const PLACEHOLDER: &str = "$ARTIFACT_DIR";

/// Root of the artifact tree, used to expand `$ARTIFACT_DIR` placeholders.
#[derive(Debug, Clone)]
pub struct ArtifactDir {
    root: PathBuf,
}

impl ArtifactDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Replaces every `$ARTIFACT_DIR` occurrence with the configured root.
    pub fn expand(&self, text: &str) -> String {
        text.replace(PLACEHOLDER, &self.root.to_string_lossy())
    }

    /// Expands a stored path string into a usable filesystem path.
    pub fn expand_path(&self, text: &str) -> PathBuf {
        PathBuf::from(self.expand(text))
    }
}
