//! Error handling

use thiserror::Error;

use crate::logic::model::ClassifierError;

pub type NidsResult<T> = Result<T, NidsError>;

#[derive(Debug, Error)]
pub enum NidsError {
    // Pool errors
    #[error("sample pool is empty")]
    EmptyPool,

    #[error("row {index} has {found} features, expected {expected}")]
    RowWidth {
        index: usize,
        found: usize,
        expected: usize,
    },

    #[error("pool has {rows} rows but {labels} labels")]
    LabelCount { rows: usize, labels: usize },

    #[error("label {value} at row {index} is not 0 or 1")]
    InvalidLabel { index: usize, value: u8 },

    #[error("pool carries no labels, evaluation needs labeled rows")]
    Unlabeled,

    // Model errors
    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("model expects {model} features but pool rows have {pool}")]
    FeatureMismatch { model: usize, pool: usize },

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    // Artifact IO
    #[error("failed to read artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode artifact: {0}")]
    Json(#[from] serde_json::Error),
}
