use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeyStatError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    #[error("Unknown finger '{0}'")]
    UnknownFinger(String),

    /// A fraction group had nothing to normalize against (e.g. a corpus with no 1-grams).
    #[error("Empty normalization base for {group}")]
    EmptyNormalization { group: &'static str },
}

pub type KsResult<T> = Result<T, KeyStatError>;
