//! Cursor packs: curated progressions of generated cursor values.
//!
//! Packs are defined in YAML and reference generated identifiers. Resolving
//! a pack against the published exports swaps each identifier for its
//! cursor value.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Packs that ship with the generator
const BUILTIN_PACKS_YAML: &str = r#"
packs:
  - name: Coins
    icon: "💰"
    import_name: coinsPack
    description: Stack grows from 1gp to 10,000gp, great for progress or score displays
    stage_labels: ["1", "2", "3", "4", "5", "25", "100", "250", "1K", "10K"]
    stages:
      - coins1
      - coins2
      - coins3
      - coins4
      - coins5
      - coins25
      - coins100
      - coins250
      - coins1000
      - coins10000

  - name: Bucket
    icon: "🪣"
    import_name: bucketPack
    description: Empty to full, for loading indicators or upload progress
    stage_labels: ["Empty", "1/5", "2/5", "3/5", "4/5", "Full"]
    stages:
      - bucket
      - _15thsFullBucket
      - _25thsFullBucket
      - _35thsFullBucket
      - _45thsFullBucket
      - bucketOfWater
"#;

/// Pack validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackError {
    #[error("Pack '{pack}' has {stages} stages but {labels} labels")]
    LabelMismatch {
        pack: String,
        stages: usize,
        labels: usize,
    },

    #[error("Pack '{pack}' needs at least 2 stages, has {stages}")]
    TooFewStages { pack: String, stages: usize },

    #[error("Pack '{pack}' references unknown icon '{identifier}'")]
    UnknownIcon { pack: String, identifier: String },
}

/// A named, ordered progression of cursors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackInfo {
    /// Display name
    pub name: String,

    /// Display glyph
    #[serde(default)]
    pub icon: String,

    /// Export name consumers import (e.g. `coinsPack`)
    pub import_name: String,

    pub description: String,

    /// One label per stage
    pub stage_labels: Vec<String>,

    /// Identifiers in a definition, cursor values once resolved
    pub stages: Vec<String>,
}

impl PackInfo {
    /// Check the stage/label invariants
    pub fn validate(&self) -> Result<(), PackError> {
        if self.stages.len() != self.stage_labels.len() {
            return Err(PackError::LabelMismatch {
                pack: self.name.clone(),
                stages: self.stages.len(),
                labels: self.stage_labels.len(),
            });
        }
        if self.stages.len() < 2 {
            return Err(PackError::TooFewStages {
                pack: self.name.clone(),
                stages: self.stages.len(),
            });
        }
        Ok(())
    }

    /// Replace every stage identifier with its published cursor value
    pub fn resolve(&self, published: &BTreeMap<String, String>) -> Result<PackInfo, PackError> {
        self.validate()?;

        let stages = self
            .stages
            .iter()
            .map(|identifier| {
                published
                    .get(identifier)
                    .cloned()
                    .ok_or_else(|| PackError::UnknownIcon {
                        pack: self.name.clone(),
                        identifier: identifier.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PackInfo {
            stages,
            ..self.clone()
        })
    }

    /// Iterate `(label, stage)` pairs in order
    pub fn labeled_stages(&self) -> impl Iterator<Item = (&str, &str)> {
        self.stage_labels
            .iter()
            .map(String::as_str)
            .zip(self.stages.iter().map(String::as_str))
    }
}

/// Pack definition file schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackFile {
    #[serde(default)]
    pub packs: Vec<PackInfo>,
}

impl PackFile {
    /// Parse pack definitions from YAML content
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse pack YAML")
    }

    /// Load pack definitions from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pack file: {}", path.display()))?;

        Self::from_yaml(&content)
    }

    /// The built-in coins and bucket packs
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN_PACKS_YAML).context("Built-in pack definitions are malformed")
    }

    /// Load from `path` when it exists, otherwise use the built-ins
    pub fn load_or_builtin(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Self::builtin()
        }
    }

    /// Validate every pack, collecting all errors
    pub fn validate(&self) -> Vec<PackError> {
        self.packs
            .iter()
            .filter_map(|pack| pack.validate().err())
            .collect()
    }
}
