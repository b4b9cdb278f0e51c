use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::ApiError;
use crate::utils::response::ApiResponse;
use crate::validator::ValidatedJson;

use super::model::{CreateFuelMaintenanceRequest, RequestData, RequestsData};
use super::service::FuelMaintenanceService;

/// Create a fuel or maintenance request
#[utoipa::path(
    post,
    path = "/api/fuel-maintenance/requests",
    request_body = CreateFuelMaintenanceRequest,
    responses(
        (status = 201, description = "Fuel and maintenance request created successfully", body = RequestData),
        (status = 400, description = "Invalid enum value, bad Fuel amount, or inactive plate"),
        (status = 403, description = "Driver filed against a plate other than their own"),
    ),
    security(("bearer_auth" = [])),
    tag = "Fuel & Maintenance"
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_request(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateFuelMaintenanceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RequestData>>), ApiError> {
    let created_by_user_id = auth_user.user_id()?;
    let request =
        FuelMaintenanceService::create_request(&state.db, dto, created_by_user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "Fuel and maintenance request created successfully.",
            RequestData { request },
        )),
    ))
}

/// List the caller's fuel and maintenance requests
#[utoipa::path(
    get,
    path = "/api/fuel-maintenance/requests",
    responses(
        (status = 200, description = "Up to 200 of the caller's requests, newest first", body = RequestsData),
        (status = 401, description = "Missing or invalid access token"),
        (status = 403, description = "Caller is not a Driver"),
    ),
    security(("bearer_auth" = [])),
    tag = "Fuel & Maintenance"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_requests(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<RequestsData>>, ApiError> {
    let created_by_user_id = auth_user.user_id()?;
    let requests =
        FuelMaintenanceService::list_requests_by_user(&state.db, created_by_user_id).await?;

    Ok(Json(ApiResponse::new(
        "Fuel and maintenance requests retrieved successfully.",
        RequestsData { requests },
    )))
}
