use thiserror::Error;

/// Errors raised while serving a prediction request
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictionError {
    #[error("Model unavailable: {reason}")]
    ModelUnavailable { reason: String },

    #[error("Malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error("Inference failed: {reason}")]
    InferenceFailure { reason: String },
}

impl PredictionError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::ModelUnavailable {
            reason: reason.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }

    pub fn inference(reason: impl Into<String>) -> Self {
        Self::InferenceFailure {
            reason: reason.into(),
        }
    }

    /// Short machine-readable kind, used in error bodies and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ModelUnavailable { .. } => "model_unavailable",
            Self::MalformedInput { .. } => "malformed_input",
            Self::InferenceFailure { .. } => "inference_failure",
        }
    }
}

/// Errors related to loading the model artifact or its metadata
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid model artifact: {reason}")]
    Invalid { reason: String },
}
