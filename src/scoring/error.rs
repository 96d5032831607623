use thiserror::Error;

/// Fatal configuration errors. Any of these aborts the whole scoring call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("criterion '{criterion}' (group '{group}') is not registered in the catalog")]
    MissingCriterion { group: String, criterion: String },

    #[error("group '{group}' has invalid weighting: {reason}")]
    InvalidWeighting { group: String, reason: String },

    #[error("column '{column}' required by '{criterion}' is not in the survey table")]
    MissingColumn { criterion: String, column: String },

    #[error("model '{0}' is not in the survey table")]
    UnknownModel(String),

    #[error("'{0}' lists no survey columns")]
    EmptyRule(String),
}
