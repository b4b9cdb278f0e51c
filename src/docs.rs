use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::model::{
    Claims, LoginRequest, NumberPlatesData, RefreshRequest, RegisterRequest, RegisteredUser,
    SessionData, UserRole,
};
use crate::modules::fuel_maintenance::model::{
    ConfirmedBy, CreateFuelMaintenanceRequest, FuelMaintenanceRequest, RequestCategory,
    RequestData, RequestType, RequestsData,
};
use crate::modules::students::controller::StudentData;
use crate::modules::students::model::{
    CreateStudentAdmissionRequest, DashboardSummary, ParentContactChange, Student,
    StudentsDashboardData, UpdateParentContactRequest, UpdateStudentMasterDataRequest,
    WithdrawStudentRequest,
};
use crate::utils::errors::FieldError;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::refresh,
        crate::modules::auth::controller::get_number_plates,
        crate::modules::auth::controller::me,
        crate::modules::auth::controller::logout,
        crate::modules::students::controller::get_students_dashboard,
        crate::modules::students::controller::admit_student,
        crate::modules::students::controller::change_parent_contact,
        crate::modules::students::controller::mark_student_withdrawal,
        crate::modules::students::controller::update_student_master_record,
        crate::modules::fuel_maintenance::controller::create_request,
        crate::modules::fuel_maintenance::controller::get_requests,
    ),
    components(
        schemas(
            UserRole,
            Claims,
            RegisterRequest,
            RegisteredUser,
            LoginRequest,
            RefreshRequest,
            SessionData,
            NumberPlatesData,
            Student,
            StudentData,
            StudentsDashboardData,
            DashboardSummary,
            ParentContactChange,
            CreateStudentAdmissionRequest,
            UpdateParentContactRequest,
            WithdrawStudentRequest,
            UpdateStudentMasterDataRequest,
            RequestType,
            RequestCategory,
            ConfirmedBy,
            CreateFuelMaintenanceRequest,
            FuelMaintenanceRequest,
            RequestData,
            RequestsData,
            FieldError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login, and session refresh"),
        (name = "Students", description = "Student lifecycle management (School Admin)"),
        (name = "Fuel & Maintenance", description = "Vehicle fuel and maintenance requisitions (Driver)")
    ),
    info(
        title = "School Transit API",
        version = "0.1.0",
        description = "REST backend for school-transport management: JWT authentication, \
student lifecycle, and fuel/maintenance requisitions. All responses use the \
`{success, message, data}` envelope.",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
