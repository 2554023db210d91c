//! Error types for CBOW training and queries.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CbowError {
    /// The token stream ended before the context window could be filled.
    #[error("data set is too small: context window needs {required} tokens, stream had {available}")]
    InsufficientData { required: usize, available: usize },

    /// Lookup of a word that was never registered.
    #[error("word not found in vocabulary: {0}")]
    UnknownWord(String),

    /// Registering `word` would need more rows than the weight matrices have.
    #[error("vocabulary capacity of {capacity} exceeded when registering: {word}")]
    CapacityExceeded { capacity: usize, word: String },

    #[error("model is not trained yet")]
    NotTrained,

    #[error("model was already trained, training is single pass")]
    AlreadyTrained,

    /// An earlier training run on this model failed, its state is unusable.
    #[error("training failed earlier, build a new model to train again")]
    TrainingFailed,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, CbowError>;
