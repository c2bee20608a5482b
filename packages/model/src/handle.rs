use std::path::{Path, PathBuf};

use rent_predictor_property_models::{FeatureColumn, FeatureKind, FeatureRow, FeatureValue};

use crate::artifact::{ArtifactFeature, ModelArtifact};
use crate::{ModelError, RentOracle};

/// File looked up when [`ModelHandle::load`] is given a directory.
pub const ARTIFACT_FILE_NAME: &str = "model.json";

/// A loaded, validated, immutable rent model.
#[derive(Debug, Clone)]
pub struct ModelHandle {
    artifact: ModelArtifact,
}

impl ModelHandle {
    /// Loads a model artifact from a file, or from [`ARTIFACT_FILE_NAME`]
    /// inside a directory.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Io`] if the artifact cannot be read,
    /// [`ModelError::Json`] if it is malformed, or
    /// [`ModelError::Incompatible`] if it fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = resolve_artifact_path(path.as_ref());
        log::info!("Loading model artifact from {}", path.display());

        let json = std::fs::read_to_string(&path).map_err(|source| ModelError::Io {
            path: path.clone(),
            source,
        })?;

        let handle = Self::from_json_str(&json)?;
        log::info!(
            "Loaded model with {} features and {} trees",
            handle.artifact.features.len(),
            handle.artifact.trees.len()
        );
        Ok(handle)
    }

    /// Parses and validates an artifact from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Json`] or [`ModelError::Incompatible`].
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        let artifact: ModelArtifact = serde_json::from_str(json)?;
        Self::from_artifact(artifact)
    }

    /// Wraps an already-deserialized artifact after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Incompatible`] if validation fails.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelError> {
        artifact.validate()?;
        Ok(Self { artifact })
    }

    /// Returns the training columns in order.
    #[must_use]
    pub fn features(&self) -> &[ArtifactFeature] {
        &self.artifact.features
    }

    /// Returns the name of the predicted column, if recorded.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.artifact.target.as_deref()
    }

    /// Checks that the model was trained on exactly `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::SchemaMismatch`] describing the first column
    /// that differs.
    pub fn ensure_schema(&self, schema: &[FeatureColumn]) -> Result<(), ModelError> {
        let expected = self
            .artifact
            .features
            .iter()
            .map(|f| (f.name.as_str(), f.kind));
        let actual = schema.iter().map(|c| (c.name, c.kind));
        compare_columns(expected, actual)
    }

    /// Encodes a row into the numeric layout the trees split on.
    fn encode(&self, row: &FeatureRow) -> Result<Vec<Option<f64>>, ModelError> {
        let expected = self
            .artifact
            .features
            .iter()
            .map(|f| (f.name.as_str(), f.kind));
        let actual = row
            .columns()
            .iter()
            .map(|(name, value)| (name.as_str(), value.kind()));
        compare_columns(expected, actual)?;

        Ok(row
            .columns()
            .iter()
            .zip(&self.artifact.features)
            .map(|((_, value), feature)| encode_value(value, feature))
            .collect())
    }
}

impl RentOracle for ModelHandle {
    fn predict(&self, row: &FeatureRow) -> Result<f64, ModelError> {
        let encoded = self.encode(row)?;

        let value = self
            .artifact
            .trees
            .iter()
            .enumerate()
            .try_fold(self.artifact.base_score, |acc, (idx, tree)| {
                tree.evaluate(&encoded)
                    .map(|leaf| acc + leaf)
                    .ok_or_else(|| ModelError::Incompatible {
                        message: format!("tree {idx} cannot be evaluated"),
                    })
            })?;

        if !value.is_finite() {
            return Err(ModelError::InvalidOutput { value });
        }

        Ok(value.max(0.0))
    }

    fn feature_importance(&self) -> Result<Vec<(String, f64)>, ModelError> {
        self.artifact
            .feature_importance
            .as_ref()
            .map(|entries| {
                entries
                    .iter()
                    .map(|e| (e.feature.clone(), e.importance))
                    .collect()
            })
            .ok_or(ModelError::InsufficientData)
    }
}

fn resolve_artifact_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(ARTIFACT_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}

fn compare_columns<'a>(
    expected: impl ExactSizeIterator<Item = (&'a str, FeatureKind)>,
    actual: impl ExactSizeIterator<Item = (&'a str, FeatureKind)>,
) -> Result<(), ModelError> {
    if expected.len() != actual.len() {
        return Err(ModelError::SchemaMismatch {
            message: format!(
                "model expects {} columns, got {}",
                expected.len(),
                actual.len()
            ),
        });
    }

    for (idx, ((exp_name, exp_kind), (act_name, act_kind))) in expected.zip(actual).enumerate() {
        if exp_name != act_name {
            return Err(ModelError::SchemaMismatch {
                message: format!("column {idx}: expected '{exp_name}', got '{act_name}'"),
            });
        }
        if exp_kind != act_kind {
            return Err(ModelError::SchemaMismatch {
                message: format!("column '{exp_name}': expected {exp_kind}, got {act_kind}"),
            });
        }
    }

    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn encode_value(value: &FeatureValue, feature: &ArtifactFeature) -> Option<f64> {
    match value {
        FeatureValue::Number(n) => Some(*n).filter(|n| n.is_finite()),
        FeatureValue::Category(category) => feature
            .categories
            .iter()
            .position(|c| c == category)
            .map(|idx| idx as f64),
    }
}
