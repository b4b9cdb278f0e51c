use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

use super::controller::{
    admit_student, change_parent_contact, get_students_dashboard, mark_student_withdrawal,
    update_student_master_record,
};

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_students_dashboard))
        .route("/admissions", post(admit_student))
        .route("/{student_id}/parent-contact", patch(change_parent_contact))
        .route("/{student_id}/withdrawal", patch(mark_student_withdrawal))
        .route(
            "/{student_id}/master-data",
            patch(update_student_master_record),
        )
}
