use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::utils::serde::optional_date;

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_WITHDRAWN: &str = "withdrawn";

/// A row in the `students` table. Students are never deleted; withdrawal
/// flips `status` and fills the withdrawal columns.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub admission_number: String,
    pub first_name: String,
    pub last_name: String,
    pub class_name: String,
    pub grade: String,
    pub parent_contact: String,
    pub admission_date: NaiveDate,
    pub status: String,
    pub withdrawal_date: Option<NaiveDate>,
    pub withdrawal_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One audit entry from `student_parent_contact_changes`, joined with the
/// student's name for the dashboard feed.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParentContactChange {
    pub id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub previous_contact: String,
    pub new_contact: String,
    pub changed_by_user_id: i64,
    pub changed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_students: usize,
    pub active_students: usize,
    pub withdrawn_students: usize,
}

/// Everything the School Admin dashboard renders in one payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentsDashboardData {
    pub students: Vec<Student>,
    pub admissions: Vec<Student>,
    pub withdrawals: Vec<Student>,
    pub parent_contact_changes: Vec<ParentContactChange>,
    pub summary: DashboardSummary,
}

fn validate_numeric_only(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("numeric_only")
            .with_message("must contain numbers only.".into()))
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentAdmissionRequest {
    #[validate(length(
        min = 1,
        max = 50,
        message = "admissionNumber must be between 1 and 50 characters."
    ))]
    pub admission_number: String,
    #[validate(length(min = 1, max = 255, message = "firstName is required."))]
    pub first_name: String,
    #[validate(length(min = 1, max = 255, message = "lastName is required."))]
    pub last_name: String,
    #[validate(length(min = 1, max = 100, message = "className is required."))]
    pub class_name: String,
    #[validate(length(min = 1, max = 50, message = "grade is required."))]
    pub grade: String,
    #[validate(
        custom(function = validate_numeric_only),
        length(min = 9, max = 20, message = "parentContact length is invalid.")
    )]
    pub parent_contact: String,
    /// Defaults to today when absent or blank.
    #[serde(default, deserialize_with = "optional_date")]
    pub admission_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParentContactRequest {
    #[validate(
        custom(function = validate_numeric_only),
        length(min = 9, max = 20, message = "parentContact length is invalid.")
    )]
    pub parent_contact: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawStudentRequest {
    /// Defaults to today when absent or blank.
    #[serde(default, deserialize_with = "optional_date")]
    pub withdrawal_date: Option<NaiveDate>,
    #[validate(length(max = 255, message = "withdrawalReason must be at most 255 characters."))]
    pub withdrawal_reason: Option<String>,
}

/// Partial update of admission-identity fields. Absent fields, nulls, and
/// values that trim to empty are all ignored.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentMasterDataRequest {
    #[validate(length(max = 50, message = "admissionNumber must be at most 50 characters."))]
    pub admission_number: Option<String>,
    #[validate(length(max = 255, message = "firstName is too long."))]
    pub first_name: Option<String>,
    #[validate(length(max = 255, message = "lastName is too long."))]
    pub last_name: Option<String>,
    #[validate(length(max = 100, message = "className is too long."))]
    pub class_name: Option<String>,
    #[validate(length(max = 50, message = "grade is too long."))]
    pub grade: Option<String>,
    #[serde(default, deserialize_with = "optional_date")]
    pub admission_date: Option<NaiveDate>,
}

/// The master-data fields that survived normalization.
#[derive(Debug, Default)]
pub struct MasterDataChanges {
    pub admission_number: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub class_name: Option<String>,
    pub grade: Option<String>,
    pub admission_date: Option<NaiveDate>,
}

impl MasterDataChanges {
    pub fn is_empty(&self) -> bool {
        self.admission_number.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.class_name.is_none()
            && self.grade.is_none()
            && self.admission_date.is_none()
    }
}

impl UpdateStudentMasterDataRequest {
    /// Trims every provided field, dropping the ones that normalize to
    /// empty. The admission number is additionally uppercased.
    pub fn into_changes(self) -> MasterDataChanges {
        let non_blank = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        MasterDataChanges {
            admission_number: non_blank(self.admission_number).map(|v| v.to_uppercase()),
            first_name: non_blank(self.first_name),
            last_name: non_blank(self.last_name),
            class_name: non_blank(self.class_name),
            grade: non_blank(self.grade),
            admission_date: self.admission_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_master_data_fields_are_dropped() {
        let dto = UpdateStudentMasterDataRequest {
            admission_number: Some("  adm-77 ".to_string()),
            first_name: Some("   ".to_string()),
            last_name: None,
            class_name: Some(String::new()),
            grade: Some("Grade 4".to_string()),
            admission_date: None,
        };

        let changes = dto.into_changes();
        assert_eq!(changes.admission_number.as_deref(), Some("ADM-77"));
        assert_eq!(changes.grade.as_deref(), Some("Grade 4"));
        assert!(changes.first_name.is_none());
        assert!(changes.class_name.is_none());
        assert!(!changes.is_empty());
    }

    #[test]
    fn all_blank_payload_is_empty() {
        let dto = UpdateStudentMasterDataRequest {
            first_name: Some("  ".to_string()),
            ..Default::default()
        };

        assert!(dto.into_changes().is_empty());
    }
}
