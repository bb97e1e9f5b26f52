//! Pre-trained regression model: artifact format, validation, inference.
//!
//! The artifact is a JSON document tagged by `kind`:
//! - `linear`: intercept plus one coefficient per feature
//! - `tree_ensemble`: flat-array regression trees, averaged or summed
//!
//! Every artifact declares `feature_names` in training order; inference
//! input must match that list exactly (see `crate::features`).

pub mod forest;
pub mod linear;
pub mod store;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use forest::{Aggregation, Tree, TreeEnsemble, TreeNode};
pub use linear::LinearModel;
pub use store::{LoadedModel, ModelStore, PredictError};

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Failed to read model file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),
    #[error("Feature vector has {found} columns, but the model was trained on {expected}")]
    ShapeMismatch { found: usize, expected: usize },
    #[error(
        "Feature columns [{}] do not match the model's training columns [{}]",
        .found.join(", "),
        .expected.join(", ")
    )]
    SchemaMismatch {
        found: Vec<String>,
        expected: Vec<String>,
    },
    #[error("Model produced a non-finite prediction")]
    NonFinite,
}

/// A fitted regressor: declared training columns plus a scalar prediction.
pub trait Regressor: Send + Sync {
    /// Input column names, in training order.
    fn feature_names(&self) -> &[String];

    /// Predict from one row whose values follow `feature_names()` order.
    fn predict(&self, row: &[f64]) -> Result<f64, ModelError>;

    fn kind(&self) -> &'static str;
}

/// Serialized model artifact, as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

impl ModelArtifact {
    /// Parse and validate an artifact from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let artifact: ModelArtifact = serde_json::from_str(json)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Read, parse and validate an artifact file.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let json = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Structural checks that make inference panic-free.
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_feature_names(self.feature_names())?;
        match self {
            ModelArtifact::Linear(model) => model.validate(),
            ModelArtifact::TreeEnsemble(model) => model.validate(),
        }
    }

    fn inner(&self) -> &dyn Regressor {
        match self {
            ModelArtifact::Linear(model) => model,
            ModelArtifact::TreeEnsemble(model) => model,
        }
    }
}

impl Regressor for ModelArtifact {
    fn feature_names(&self) -> &[String] {
        self.inner().feature_names()
    }

    fn predict(&self, row: &[f64]) -> Result<f64, ModelError> {
        self.inner().predict(row)
    }

    fn kind(&self) -> &'static str {
        self.inner().kind()
    }
}

fn validate_feature_names(names: &[String]) -> Result<(), ModelError> {
    if names.is_empty() {
        return Err(ModelError::InvalidArtifact(
            "feature_names must not be empty".into(),
        ));
    }
    let mut seen = HashSet::with_capacity(names.len());
    for name in names {
        if name.is_empty() {
            return Err(ModelError::InvalidArtifact(
                "feature_names contains an empty name".into(),
            ));
        }
        if !seen.insert(name.as_str()) {
            return Err(ModelError::InvalidArtifact(format!(
                "duplicate feature name '{name}'"
            )));
        }
    }
    Ok(())
}

/// Reject rows whose width differs from the model's column count.
pub(crate) fn check_width(row: &[f64], expected: usize) -> Result<(), ModelError> {
    if row.len() != expected {
        return Err(ModelError::ShapeMismatch {
            found: row.len(),
            expected,
        });
    }
    Ok(())
}
