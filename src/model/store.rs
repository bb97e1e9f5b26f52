//! Process-wide model handle.
//!
//! The artifact is loaded and validated exactly once, before the server
//! accepts traffic, and the resulting `Arc<LoadedModel>` is injected into
//! every request. There is no reload path: a new artifact means a restart.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::{ModelArtifact, ModelError, Regressor};
use crate::features::{AlignError, AlignmentPolicy, FeatureLayout};
use crate::models::PatientRecord;
use crate::predictor::{self, Prediction};

#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error(transparent)]
    Alignment(#[from] AlignError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Loaded artifact plus everything derived from it once at startup.
#[derive(Debug)]
pub struct LoadedModel {
    artifact: ModelArtifact,
    layout: FeatureLayout,
    policy: AlignmentPolicy,
    source: PathBuf,
    loaded_at: DateTime<Utc>,
}

impl LoadedModel {
    pub fn new(artifact: ModelArtifact, policy: AlignmentPolicy, source: PathBuf) -> Self {
        let layout = FeatureLayout::new(artifact.feature_names());
        Self {
            artifact,
            layout,
            policy,
            source,
            loaded_at: Utc::now(),
        }
    }

    pub fn regressor(&self) -> &dyn Regressor {
        &self.artifact
    }

    pub fn layout(&self) -> &FeatureLayout {
        &self.layout
    }

    pub fn policy(&self) -> AlignmentPolicy {
        self.policy
    }

    pub fn kind(&self) -> &'static str {
        self.artifact.kind()
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Align `record` to the training schema and run one prediction.
    pub fn predict_record(&self, record: &PatientRecord) -> Result<Prediction, PredictError> {
        let aligned = self.layout.align(record, self.policy)?;
        let months = predictor::predict(self.regressor(), &aligned.vector)?;
        Ok(Prediction {
            months,
            warnings: aligned.report.warnings(),
        })
    }
}

/// Owner of the single loaded model for the process lifetime.
#[derive(Debug, Clone)]
pub struct ModelStore {
    model: Arc<LoadedModel>,
}

impl ModelStore {
    /// Read, validate and index the artifact at `path`.
    pub fn load(path: &Path, policy: AlignmentPolicy) -> Result<Self, ModelError> {
        let artifact = ModelArtifact::load(path)?;
        let model = LoadedModel::new(artifact, policy, path.to_path_buf());

        tracing::info!(
            path = %path.display(),
            kind = model.kind(),
            features = model.layout().width(),
            policy = policy.as_str(),
            "Model loaded"
        );
        if !model.layout().unmapped_columns().is_empty() {
            tracing::warn!(
                columns = ?model.layout().unmapped_columns(),
                "Model expects columns no form input can produce; they will always be 0"
            );
        }

        Ok(Self {
            model: Arc::new(model),
        })
    }

    /// Wrap an already-built model (embedding and tests).
    pub fn from_model(model: LoadedModel) -> Self {
        Self {
            model: Arc::new(model),
        }
    }

    /// Shared handle to the loaded model. Always the same instance.
    pub fn handle(&self) -> Arc<LoadedModel> {
        Arc::clone(&self.model)
    }
}

/// The artifact bundled under `assets/`, for tests across the crate.
#[cfg(test)]
pub(crate) fn sample_artifact() -> ModelArtifact {
    ModelArtifact::from_json(include_str!("../../assets/survival_model.json"))
        .expect("bundled artifact is valid")
}

#[cfg(test)]
pub(crate) fn sample_model(policy: AlignmentPolicy) -> LoadedModel {
    LoadedModel::new(sample_artifact(), policy, PathBuf::from("assets/survival_model.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CancerType, Gender, Stage, Treatment};

    fn breast_record() -> PatientRecord {
        PatientRecord {
            age: 55.0,
            gender: Gender::Female,
            cancer_type: CancerType::Breast,
            tumor_size_cm: 3.2,
            stage: Stage::II,
            treatment: Treatment::Surgery,
        }
    }

    #[test]
    fn bundled_artifact_has_training_columns() {
        let artifact = sample_artifact();
        assert_eq!(artifact.feature_names().len(), 17);
        assert_eq!(artifact.feature_names()[0], "Age");
        assert_eq!(artifact.feature_names()[1], "Tumor_Size (cm)");
        assert_eq!(artifact.feature_names()[2], "Stage");
    }

    #[test]
    fn breast_scenario_prediction() {
        let model = sample_model(AlignmentPolicy::Strict);
        let prediction = model.predict_record(&breast_record()).unwrap();
        // 78 - 0.35*55 - 2.1*3.2 - 9.5*2 + 14 + 9 = 56.03
        assert_eq!(prediction.months, 56.0);
        assert!(prediction.warnings.is_empty());
    }

    #[test]
    fn prediction_is_idempotent() {
        let model = sample_model(AlignmentPolicy::Strict);
        let first = model.predict_record(&breast_record()).unwrap();
        let second = model.predict_record(&breast_record()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn load_from_disk_and_share_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survival_model.json");
        std::fs::write(&path, include_str!("../../assets/survival_model.json")).unwrap();

        let store = ModelStore::load(&path, AlignmentPolicy::Lenient).unwrap();
        let a = store.handle();
        let b = store.clone().handle();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.source(), path.as_path());
        assert_eq!(a.policy(), AlignmentPolicy::Lenient);
        assert_eq!(a.kind(), "linear");
    }

    #[test]
    fn corrupt_artifact_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survival_model.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            ModelStore::load(&path, AlignmentPolicy::Strict),
            Err(ModelError::Parse(_))
        ));
    }

    #[test]
    fn strict_alignment_error_surfaces() {
        let mut artifact = sample_artifact();
        if let ModelArtifact::Linear(linear) = &mut artifact {
            linear.feature_names.truncate(16);
            linear.coefficients.truncate(16);
        }
        // Treatment_Surgery was the last column
        let model = LoadedModel::new(artifact, AlignmentPolicy::Strict, PathBuf::new());
        let err = model.predict_record(&breast_record()).unwrap_err();
        assert!(matches!(err, PredictError::Alignment(_)));
        assert!(err.to_string().contains("Treatment_Surgery"));
    }
}
