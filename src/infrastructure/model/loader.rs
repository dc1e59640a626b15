use crate::application::ml::{Classifier, ForestClassifier};
use crate::config::ModelEnvConfig;
use crate::domain::errors::{ArtifactError, PredictionError};
use crate::domain::metadata::ModelMetadata;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Presence check, independent of whether the file parses.
pub fn file_exists(path: &Path) -> bool {
    path.is_file()
}

fn read_file(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    let display = path.display().to_string();
    if !file_exists(path) {
        return Err(ArtifactError::NotFound { path: display });
    }

    let mut buffer = Vec::new();
    File::open(path)
        .and_then(|mut file| file.read_to_end(&mut buffer))
        .map_err(|source| ArtifactError::Io {
            path: display,
            source,
        })?;
    Ok(buffer)
}

pub fn load_model(path: &Path) -> Result<ForestClassifier, ArtifactError> {
    let buffer = read_file(path)?;
    ForestClassifier::from_slice(&buffer, &path.display().to_string())
}

pub fn load_metadata(path: &Path) -> Result<ModelMetadata, ArtifactError> {
    let buffer = read_file(path)?;
    serde_json::from_slice(&buffer).map_err(|source| ArtifactError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Process-wide model state: built once at startup, read-only afterwards.
pub struct ModelState {
    model: Option<Arc<dyn Classifier>>,
    metadata: Option<ModelMetadata>,
    model_path: PathBuf,
    metadata_path: PathBuf,
}

impl ModelState {
    /// Loads model and metadata. A missing or unparsable file is logged and
    /// leaves the corresponding handle unset; it never aborts startup.
    pub fn load(config: &ModelEnvConfig) -> Self {
        let model = match load_model(&config.model_path) {
            Ok(model) => {
                info!(
                    "Loaded {} model ({} trees, {} classes) from {:?}",
                    model.name(),
                    model.n_trees(),
                    model.classes().len(),
                    config.model_path
                );
                Some(Arc::new(model) as Arc<dyn Classifier>)
            }
            Err(e @ ArtifactError::NotFound { .. }) => {
                warn!("{}. Predictions will be unavailable.", e);
                None
            }
            Err(e) => {
                error!("Failed to load model: {}", e);
                None
            }
        };

        let metadata = match load_metadata(&config.metadata_path) {
            Ok(metadata) => {
                info!(
                    "Loaded metadata for '{}' from {:?}",
                    metadata.model_name(),
                    config.metadata_path
                );
                Some(metadata)
            }
            Err(e @ ArtifactError::NotFound { .. }) => {
                warn!("{}. Model info will be unavailable.", e);
                None
            }
            Err(e) => {
                error!("Failed to load model metadata: {}", e);
                None
            }
        };

        Self {
            model,
            metadata,
            model_path: config.model_path.clone(),
            metadata_path: config.metadata_path.clone(),
        }
    }

    /// Assembles a state from already-loaded parts.
    pub fn from_parts(
        model: Option<Arc<dyn Classifier>>,
        metadata: Option<ModelMetadata>,
        config: &ModelEnvConfig,
    ) -> Self {
        Self {
            model,
            metadata,
            model_path: config.model_path.clone(),
            metadata_path: config.metadata_path.clone(),
        }
    }

    /// True only if the model handle loaded.
    pub fn is_ready(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> Result<&dyn Classifier, PredictionError> {
        self.model.as_deref().ok_or_else(|| {
            PredictionError::unavailable(format!(
                "Model not loaded from {}",
                self.model_path.display()
            ))
        })
    }

    pub fn metadata(&self) -> Option<&ModelMetadata> {
        self.metadata.as_ref()
    }

    pub fn require_metadata(&self) -> Result<&ModelMetadata, PredictionError> {
        self.metadata.as_ref().ok_or_else(|| {
            PredictionError::unavailable(format!(
                "Model metadata not loaded from {}",
                self.metadata_path.display()
            ))
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn model_exists(&self) -> bool {
        file_exists(&self.model_path)
    }

    pub fn metadata_exists(&self) -> bool {
        file_exists(&self.metadata_path)
    }
}
