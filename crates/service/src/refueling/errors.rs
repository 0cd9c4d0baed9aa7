use thiserror::Error;

use super::domain::ValidationErrors;

#[derive(Debug, Error)]
pub enum RefuelingError {
    #[error("{0}")]
    Invalid(ValidationErrors),
    /// Missing and not-owned records are deliberately indistinguishable.
    #[error("Resource not found!")]
    NotFound,
    #[error("repository error: {0}")]
    Repository(String),
}

/// Field validation happens before the model layer, so anything it reports
/// is a storage failure.
impl From<models::errors::ModelError> for RefuelingError {
    fn from(e: models::errors::ModelError) -> Self {
        RefuelingError::Repository(e.to_string())
    }
}
