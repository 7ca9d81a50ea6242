use std::path::PathBuf;
use thiserror::Error;

/// Errors raised when a price series violates its ordering or value invariants
#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("Timestamp {timestamp} at bar {index} does not follow {previous}")]
    NonIncreasingTimestamp {
        index: usize,
        timestamp: i64,
        previous: i64,
    },

    #[error("Invalid close at bar {index}: {value} (must be finite and non-negative)")]
    InvalidClose { index: usize, value: f64 },
}

/// Errors related to fitting and running an estimator
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Insufficient data: need at least {required} rows, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Shape mismatch: {rows} feature rows but {labels} labels")]
    ShapeMismatch { rows: usize, labels: usize },

    #[error("Training data contains non-finite values")]
    NonFiniteInput,

    #[error("Linear solver failed: {0}")]
    Solver(String),

    #[error("Estimator backend failed: {0}")]
    Backend(String),
}

/// Errors related to the persisted model blob
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on model file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Model file {path:?} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported model schema version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Feature schema mismatch: model has {found:?}, pipeline produces {expected:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Model expects {found} features, pipeline produces {expected}")]
    WidthMismatch { expected: usize, found: usize },

    #[error("Failed to serialize model: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Bootstrap training failed: {0}")]
    Training(#[from] ModelError),
}

/// Reasons no attribution could be produced.
///
/// `NoFallback` (capability gap) and `FallbackFailed` (computation fault)
/// must render distinct messages; callers display them differently.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AttributionFailure {
    #[error("no data")]
    NoData,

    #[error("Perturbation attribution failed and no fallback importances: {primary}")]
    NoFallback { primary: String },

    #[error("Importance computation failed: {fallback} (after perturbation failure: {primary})")]
    FallbackFailed { primary: String, fallback: String },
}
