use thiserror::Error;
use tracing::error;

use crate::utils::errors::ApiError;

#[derive(Debug, Error)]
pub enum StudentError {
    #[error("Student not found.")]
    StudentNotFound,
    #[error("A student with this admission number already exists.")]
    AdmissionNumberExists,
    #[error("Student is already withdrawn.")]
    StudentAlreadyWithdrawn,
    #[error("New parent contact must be different from the current one.")]
    ParentContactUnchanged,
    #[error("No master data fields were provided. Submit at least one field to update.")]
    NoMasterDataFields,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<StudentError> for ApiError {
    fn from(err: StudentError) -> Self {
        match err {
            StudentError::StudentNotFound => ApiError::not_found(err.to_string()),
            StudentError::AdmissionNumberExists | StudentError::StudentAlreadyWithdrawn => {
                ApiError::conflict(err.to_string())
            }
            StudentError::ParentContactUnchanged | StudentError::NoMasterDataFields => {
                ApiError::bad_request(err.to_string())
            }
            StudentError::Database(e) => {
                error!(error = %e, "student database error");
                ApiError::internal("Failed to process student request.")
            }
        }
    }
}
