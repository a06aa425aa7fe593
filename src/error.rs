use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or publishing related-document lists
#[derive(Error, Debug)]
pub enum RelatedError {
    /// accuracy must be in (0, 1]
    #[error("invalid accuracy {0}: expected a value in (0, 1]")]
    InvalidAccuracy(f64),

    /// the reduction cutoff computed from the vocabulary size is unusable
    #[error("accuracy {accuracy} leaves no latent dimension for a vocabulary of {vocabulary} terms")]
    InvalidDegree { vocabulary: usize, accuracy: f64 },

    /// any other rejected configuration value
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// singular value decomposition could not be computed
    #[error("decomposition error: {0}")]
    Decomposition(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("render error: {0}")]
    Render(String),
}

impl RelatedError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RelatedError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, RelatedError>;
