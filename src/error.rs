use thiserror::Error;

/// Input outside its allowed domain. Caller-correctable: reported back with
/// the offending field and the accepted range, never crashes the process.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field} must be between {min} and {max} (got {value})")]
pub struct ValidationError {
    pub field: &'static str,
    pub value: f32,
    pub min: f32,
    pub max: f32,
}

/// Failures of the model artifact itself.
///
/// `Unavailable` is raised once, at startup; the process must not serve
/// requests without a loaded model. The other variants are runtime failures
/// of an already-loaded plan. Tract errors are anyhow-based, so their text is
/// captured rather than chained as a source.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model artifact unavailable at {path}: {reason}")]
    Unavailable { path: String, reason: String },
    #[error("model evaluation failed: {reason}")]
    Evaluation { reason: String },
    #[error("model produced no output")]
    EmptyOutput,
}

/// Everything `predict` can fail with: rejected input (no inference was
/// attempted) or a failure of the loaded plan itself.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Model(#[from] ModelError),
}
