use sqlx::PgPool;
use tracing::instrument;

use crate::modules::auth::model::{User, UserRole};

use super::error::FuelMaintenanceError;
use super::model::{
    ConfirmedBy, CreateFuelMaintenanceRequest, FuelMaintenanceRequest, RequestCategory,
    RequestType,
};

pub struct FuelMaintenanceService;

impl FuelMaintenanceService {
    /// Validates and stores a new request.
    ///
    /// The request type, category, and confirming staff member are closed
    /// sets. Fuel requests must carry a positive amount; every other type
    /// stores NULL no matter what was submitted. A Driver may only file
    /// against the plate on their own user record, and the target plate must
    /// be an active vehicle.
    #[instrument(skip(db, dto), fields(created_by_user_id))]
    pub async fn create_request(
        db: &PgPool,
        dto: CreateFuelMaintenanceRequest,
        created_by_user_id: i64,
    ) -> Result<FuelMaintenanceRequest, FuelMaintenanceError> {
        let number_plate = dto.number_plate.trim().to_uppercase();

        let request_type = RequestType::parse(dto.request_type.trim())
            .ok_or(FuelMaintenanceError::InvalidRequestType)?;
        let category = RequestCategory::parse(dto.category.trim())
            .ok_or(FuelMaintenanceError::InvalidRequestCategory)?;
        let confirmed_by = ConfirmedBy::parse(dto.confirmed_by.trim())
            .ok_or(FuelMaintenanceError::InvalidConfirmedBy)?;

        let amount = match request_type {
            RequestType::Fuel => {
                let amount = dto
                    .amount
                    .ok_or(FuelMaintenanceError::AmountRequiredForFuel)?;
                if !amount.is_finite() || amount <= 0.0 {
                    return Err(FuelMaintenanceError::InvalidAmountForFuel);
                }
                Some(amount)
            }
            // Non-fuel requests never store an amount.
            _ => None,
        };

        let creator = sqlx::query_as::<_, User>(
            "SELECT id, first_name, last_name, email, phone_number, number_plate, role,
                    password, created_at, updated_at
             FROM users
             WHERE id = $1
             LIMIT 1",
        )
        .bind(created_by_user_id)
        .fetch_optional(db)
        .await?
        .ok_or(FuelMaintenanceError::RequestCreatorNotFound)?;

        if UserRole::parse(&creator.role) == Some(UserRole::Driver) {
            let assigned_plate = creator
                .number_plate
                .as_deref()
                .map(|plate| plate.trim().to_uppercase())
                .filter(|plate| !plate.is_empty())
                .ok_or(FuelMaintenanceError::DriverNumberPlateNotAssigned)?;

            if number_plate != assigned_plate {
                return Err(FuelMaintenanceError::DriverNumberPlateMismatch);
            }
        }

        let plate = sqlx::query_scalar::<_, String>(
            "SELECT plate_number FROM number_plates
             WHERE plate_number = $1 AND status = 'active'
             LIMIT 1",
        )
        .bind(&number_plate)
        .fetch_optional(db)
        .await?;

        if plate.is_none() {
            return Err(FuelMaintenanceError::NumberPlateNotFound);
        }

        let request_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO fuel_maintenance_requests (
                 request_date, number_plate, current_mileage, request_type, requested_by,
                 category, description, amount, confirmed_by, created_by_user_id
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING id",
        )
        .bind(dto.request_date)
        .bind(&number_plate)
        .bind(dto.current_mileage)
        .bind(request_type.as_str())
        .bind(dto.requested_by.trim())
        .bind(category.as_str())
        .bind(dto.description.trim())
        .bind(amount)
        .bind(confirmed_by.as_str())
        .bind(created_by_user_id)
        .fetch_one(db)
        .await?;

        let request = sqlx::query_as::<_, FuelMaintenanceRequest>(
            "SELECT id, request_date, number_plate, current_mileage, request_type,
                    requested_by, category, description, amount, confirmed_by,
                    created_by_user_id, created_at, updated_at
             FROM fuel_maintenance_requests
             WHERE id = $1",
        )
        .bind(request_id)
        .fetch_one(db)
        .await?;

        Ok(request)
    }

    /// The caller's own requests, newest request date first, capped at 200.
    #[instrument(skip(db))]
    pub async fn list_requests_by_user(
        db: &PgPool,
        created_by_user_id: i64,
    ) -> Result<Vec<FuelMaintenanceRequest>, FuelMaintenanceError> {
        let requests = sqlx::query_as::<_, FuelMaintenanceRequest>(
            "SELECT id, request_date, number_plate, current_mileage, request_type,
                    requested_by, category, description, amount, confirmed_by,
                    created_by_user_id, created_at, updated_at
             FROM fuel_maintenance_requests
             WHERE created_by_user_id = $1
             ORDER BY request_date DESC, id DESC
             LIMIT 200",
        )
        .bind(created_by_user_id)
        .fetch_all(db)
        .await?;

        Ok(requests)
    }
}
