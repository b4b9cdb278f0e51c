use thiserror::Error;
use tracing::error;

use crate::utils::errors::ApiError;

#[derive(Debug, Error)]
pub enum FuelMaintenanceError {
    #[error("Invalid request type.")]
    InvalidRequestType,
    #[error("Invalid request category.")]
    InvalidRequestCategory,
    #[error("confirmedBy must be one of: Erick, Douglas, James.")]
    InvalidConfirmedBy,
    #[error("amount is required when requestType is Fuel.")]
    AmountRequiredForFuel,
    #[error("amount must be greater than zero for Fuel requests.")]
    InvalidAmountForFuel,
    #[error("Request creator was not found.")]
    RequestCreatorNotFound,
    #[error("No number plate is assigned to this driver account.")]
    DriverNumberPlateNotAssigned,
    #[error("Drivers can only submit requests for their assigned number plate.")]
    DriverNumberPlateMismatch,
    #[error("Selected number plate is not available. Choose an active number plate.")]
    NumberPlateNotFound,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<FuelMaintenanceError> for ApiError {
    fn from(err: FuelMaintenanceError) -> Self {
        match err {
            FuelMaintenanceError::InvalidRequestType
            | FuelMaintenanceError::InvalidRequestCategory
            | FuelMaintenanceError::InvalidConfirmedBy
            | FuelMaintenanceError::AmountRequiredForFuel
            | FuelMaintenanceError::InvalidAmountForFuel
            | FuelMaintenanceError::DriverNumberPlateNotAssigned
            | FuelMaintenanceError::NumberPlateNotFound => ApiError::bad_request(err.to_string()),
            FuelMaintenanceError::DriverNumberPlateMismatch => {
                ApiError::forbidden(err.to_string())
            }
            FuelMaintenanceError::RequestCreatorNotFound => ApiError::not_found(err.to_string()),
            FuelMaintenanceError::Database(e) => {
                error!(error = %e, "fuel maintenance database error");
                ApiError::internal("Failed to process fuel and maintenance request.")
            }
        }
    }
}
