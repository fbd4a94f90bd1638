use thiserror::Error;

use crate::fault::Violation;
use crate::schema::FieldId;

/// Main error type for cuttle operations
///
/// Schema construction is the expected-failure surface of this crate;
/// everything inside a segment fails fast through the fault policy
/// instead. [`CuttleError::Violation`] exists for load pipelines that
/// catch an unwinding check at a job boundary and report it uniformly.
#[derive(Error, Debug)]
pub enum CuttleError {
    #[error("duplicate field id {0} in schema")]
    DuplicateFieldId(FieldId),

    #[error("duplicate field name '{0}' in schema")]
    DuplicateFieldName(String),

    #[error("vector field '{name}' must have at least one dimension")]
    ZeroDimensions { name: String },

    #[error("binary vector field '{name}' has {dimensions} dimensions, expected a multiple of 8")]
    UnalignedBinaryDimensions { name: String, dimensions: usize },

    #[error("{0}")]
    Violation(#[from] Violation),
}

/// Result type alias for cuttle operations
pub type Result<T> = std::result::Result<T, CuttleError>;
