use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::ApiError;
use crate::utils::response::ApiResponse;
use crate::validator::ValidatedJson;

use super::model::{
    CreateStudentAdmissionRequest, Student, StudentsDashboardData, UpdateParentContactRequest,
    UpdateStudentMasterDataRequest, WithdrawStudentRequest,
};
use super::service::StudentService;

/// Single-student payloads are wrapped one level deeper, matching what the
/// dashboard expects: `data: { student: {...} }`.
#[derive(Debug, Serialize, ToSchema)]
pub struct StudentData {
    pub student: Student,
}

/// Student dashboard aggregate
#[utoipa::path(
    get,
    path = "/api/students",
    responses(
        (status = 200, description = "Students, withdrawals, and recent contact changes", body = StudentsDashboardData),
        (status = 401, description = "Missing or invalid access token"),
        (status = 403, description = "Caller is not a School Admin"),
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_students_dashboard(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<StudentsDashboardData>>, ApiError> {
    let dashboard = StudentService::list_dashboard_data(&state.db).await?;

    Ok(Json(ApiResponse::new(
        "Student data retrieved successfully.",
        dashboard,
    )))
}

/// Create a student admission
#[utoipa::path(
    post,
    path = "/api/students/admissions",
    request_body = CreateStudentAdmissionRequest,
    responses(
        (status = 201, description = "Student admission created successfully", body = StudentData),
        (status = 409, description = "Admission number already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn admit_student(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateStudentAdmissionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<StudentData>>), ApiError> {
    let student = StudentService::create_admission(&state.db, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "Student admission created successfully.",
            StudentData { student },
        )),
    ))
}

/// Change a student's parent contact
#[utoipa::path(
    patch,
    path = "/api/students/{student_id}/parent-contact",
    params(("student_id" = i64, Path, description = "Student id")),
    request_body = UpdateParentContactRequest,
    responses(
        (status = 200, description = "Parent contact updated successfully", body = StudentData),
        (status = 400, description = "New contact equals the current one"),
        (status = 404, description = "Student not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn change_parent_contact(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(student_id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateParentContactRequest>,
) -> Result<Json<ApiResponse<StudentData>>, ApiError> {
    let changed_by_user_id = auth_user.user_id()?;
    let student =
        StudentService::update_parent_contact(&state.db, student_id, dto, changed_by_user_id)
            .await?;

    Ok(Json(ApiResponse::new(
        "Parent contact updated successfully.",
        StudentData { student },
    )))
}

/// Record a student withdrawal
#[utoipa::path(
    patch,
    path = "/api/students/{student_id}/withdrawal",
    params(("student_id" = i64, Path, description = "Student id")),
    request_body = WithdrawStudentRequest,
    responses(
        (status = 200, description = "Student withdrawal recorded successfully", body = StudentData),
        (status = 404, description = "Student not found"),
        (status = 409, description = "Student is already withdrawn"),
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn mark_student_withdrawal(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<WithdrawStudentRequest>,
) -> Result<Json<ApiResponse<StudentData>>, ApiError> {
    let student = StudentService::withdraw(&state.db, student_id, dto).await?;

    Ok(Json(ApiResponse::new(
        "Student withdrawal recorded successfully.",
        StudentData { student },
    )))
}

/// Update a student's master data
#[utoipa::path(
    patch,
    path = "/api/students/{student_id}/master-data",
    params(("student_id" = i64, Path, description = "Student id")),
    request_body = UpdateStudentMasterDataRequest,
    responses(
        (status = 200, description = "Student master data updated successfully", body = StudentData),
        (status = 400, description = "No usable master data fields in the payload"),
        (status = 404, description = "Student not found"),
        (status = 409, description = "Admission number already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn update_student_master_record(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentMasterDataRequest>,
) -> Result<Json<ApiResponse<StudentData>>, ApiError> {
    let student =
        StudentService::update_master_data(&state.db, student_id, dto.into_changes()).await?;

    Ok(Json(ApiResponse::new(
        "Student master data updated successfully.",
        StudentData { student },
    )))
}
