use thiserror::Error;
use tracing::error;

use crate::utils::errors::ApiError;

/// Failures the auth service can produce, mapped exhaustively to HTTP
/// statuses by the conversion below.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("A user with that email or phone number already exists.")]
    DuplicateUser,
    #[error("numberPlate is required for Driver and Bus Assistant.")]
    NumberPlateRequired,
    #[error("Selected number plate is not available. Choose an existing number plate.")]
    NumberPlateNotFound,
    #[error("Invalid role selected.")]
    InvalidRole,
    #[error("stored role {0:?} is not a known role")]
    UnknownStoredRole(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Password(#[from] bcrypt::BcryptError),
    #[error(transparent)]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateUser => ApiError::conflict(err.to_string()),
            AuthError::NumberPlateRequired
            | AuthError::NumberPlateNotFound
            | AuthError::InvalidRole => ApiError::bad_request(err.to_string()),
            AuthError::UnknownStoredRole(role) => {
                error!(role = %role, "user row carries an unknown role");
                ApiError::internal("Failed to process authentication request.")
            }
            AuthError::Database(e) => {
                error!(error = %e, "auth database error");
                ApiError::internal("Failed to process authentication request.")
            }
            AuthError::Password(e) => {
                error!(error = %e, "password hashing error");
                ApiError::internal("Failed to process authentication request.")
            }
            AuthError::Token(e) => {
                error!(error = %e, "token creation error");
                ApiError::internal("Failed to process authentication request.")
            }
        }
    }
}
