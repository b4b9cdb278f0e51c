use chrono::{NaiveDate, Utc};
use sqlx::{PgExecutor, PgPool};
use tracing::instrument;

use super::error::StudentError;
use super::model::{
    CreateStudentAdmissionRequest, DashboardSummary, MasterDataChanges, ParentContactChange,
    STATUS_ACTIVE, STATUS_WITHDRAWN, Student, StudentsDashboardData, UpdateParentContactRequest,
    WithdrawStudentRequest,
};

async fn fetch_student<'e, E>(db: E, student_id: i64) -> Result<Option<Student>, StudentError>
where
    E: PgExecutor<'e>,
{
    let student = sqlx::query_as::<_, Student>(
        "SELECT id, admission_number, first_name, last_name, class_name, grade,
                parent_contact, admission_date, status, withdrawal_date, withdrawal_reason,
                created_at, updated_at
         FROM students
         WHERE id = $1",
    )
    .bind(student_id)
    .fetch_optional(db)
    .await?;

    Ok(student)
}

pub struct StudentService;

impl StudentService {
    /// Fetches the full dashboard payload: every student (newest admission
    /// first), the 100 most recent contact changes, and summary counts.
    #[instrument(skip(db))]
    pub async fn list_dashboard_data(db: &PgPool) -> Result<StudentsDashboardData, StudentError> {
        let students = sqlx::query_as::<_, Student>(
            "SELECT id, admission_number, first_name, last_name, class_name, grade,
                    parent_contact, admission_date, status, withdrawal_date, withdrawal_reason,
                    created_at, updated_at
             FROM students
             ORDER BY admission_date DESC, id DESC",
        )
        .fetch_all(db)
        .await?;

        let parent_contact_changes = sqlx::query_as::<_, ParentContactChange>(
            "SELECT
                 c.id,
                 c.student_id,
                 s.first_name || ' ' || s.last_name AS student_name,
                 c.previous_contact,
                 c.new_contact,
                 c.changed_by_user_id,
                 c.changed_at
             FROM student_parent_contact_changes c
             INNER JOIN students s ON s.id = c.student_id
             ORDER BY c.changed_at DESC
             LIMIT 100",
        )
        .fetch_all(db)
        .await?;

        let admissions: Vec<Student> = students
            .iter()
            .filter(|s| s.status == STATUS_ACTIVE)
            .cloned()
            .collect();
        let withdrawals: Vec<Student> = students
            .iter()
            .filter(|s| s.status == STATUS_WITHDRAWN)
            .cloned()
            .collect();

        let summary = DashboardSummary {
            total_students: students.len(),
            active_students: admissions.len(),
            withdrawn_students: withdrawals.len(),
        };

        Ok(StudentsDashboardData {
            students,
            admissions,
            withdrawals,
            parent_contact_changes,
            summary,
        })
    }

    /// Creates an admission with status `active`. The admission date
    /// defaults to today when the payload leaves it blank.
    #[instrument(skip(db, dto), fields(admission_number))]
    pub async fn create_admission(
        db: &PgPool,
        dto: CreateStudentAdmissionRequest,
    ) -> Result<Student, StudentError> {
        let admission_number = dto.admission_number.trim().to_uppercase();
        let admission_date = dto
            .admission_date
            .unwrap_or_else(|| Utc::now().date_naive());

        let duplicate = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM students WHERE admission_number = $1 LIMIT 1",
        )
        .bind(&admission_number)
        .fetch_optional(db)
        .await?;

        if duplicate.is_some() {
            return Err(StudentError::AdmissionNumberExists);
        }

        let student_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO students (
                 admission_number, first_name, last_name, class_name, grade,
                 parent_contact, admission_date, status, withdrawal_date, withdrawal_reason
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, 'active', NULL, NULL)
             RETURNING id",
        )
        .bind(&admission_number)
        .bind(dto.first_name.trim())
        .bind(dto.last_name.trim())
        .bind(dto.class_name.trim())
        .bind(dto.grade.trim())
        .bind(dto.parent_contact.trim())
        .bind(admission_date)
        .fetch_one(db)
        .await?;

        fetch_student(db, student_id)
            .await?
            .ok_or(StudentError::StudentNotFound)
    }

    /// Replaces the parent contact and appends one audit record, atomically.
    ///
    /// The student row is locked for the duration of the transaction so
    /// concurrent edits serialize; the comparison against the stored value is
    /// an exact string match on the trimmed input.
    #[instrument(skip(db, dto))]
    pub async fn update_parent_contact(
        db: &PgPool,
        student_id: i64,
        dto: UpdateParentContactRequest,
        changed_by_user_id: i64,
    ) -> Result<Student, StudentError> {
        let new_contact = dto.parent_contact.trim().to_string();

        let mut tx = db.begin().await?;

        let current = sqlx::query_scalar::<_, String>(
            "SELECT parent_contact FROM students WHERE id = $1 LIMIT 1 FOR UPDATE",
        )
        .bind(student_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(previous_contact) = current else {
            return Err(StudentError::StudentNotFound);
        };

        if previous_contact == new_contact {
            return Err(StudentError::ParentContactUnchanged);
        }

        sqlx::query("UPDATE students SET parent_contact = $1, updated_at = now() WHERE id = $2")
            .bind(&new_contact)
            .bind(student_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO student_parent_contact_changes (
                 student_id, previous_contact, new_contact, changed_by_user_id
             )
             VALUES ($1, $2, $3, $4)",
        )
        .bind(student_id)
        .bind(&previous_contact)
        .bind(&new_contact)
        .bind(changed_by_user_id)
        .execute(&mut *tx)
        .await?;

        let student = fetch_student(&mut *tx, student_id)
            .await?
            .ok_or(StudentError::StudentNotFound)?;

        tx.commit().await?;

        Ok(student)
    }

    /// Marks an active student withdrawn. Withdrawal is terminal: a second
    /// attempt fails.
    #[instrument(skip(db, dto))]
    pub async fn withdraw(
        db: &PgPool,
        student_id: i64,
        dto: WithdrawStudentRequest,
    ) -> Result<Student, StudentError> {
        let withdrawal_date: NaiveDate = dto
            .withdrawal_date
            .unwrap_or_else(|| Utc::now().date_naive());
        let withdrawal_reason = dto
            .withdrawal_reason
            .map(|reason| reason.trim().to_string())
            .filter(|reason| !reason.is_empty());

        let status = sqlx::query_scalar::<_, String>(
            "SELECT status FROM students WHERE id = $1 LIMIT 1",
        )
        .bind(student_id)
        .fetch_optional(db)
        .await?;

        match status.as_deref() {
            None => return Err(StudentError::StudentNotFound),
            Some(STATUS_WITHDRAWN) => return Err(StudentError::StudentAlreadyWithdrawn),
            Some(_) => {}
        }

        sqlx::query(
            "UPDATE students
             SET status = 'withdrawn', withdrawal_date = $1, withdrawal_reason = $2,
                 updated_at = now()
             WHERE id = $3",
        )
        .bind(withdrawal_date)
        .bind(&withdrawal_reason)
        .bind(student_id)
        .execute(db)
        .await?;

        fetch_student(db, student_id)
            .await?
            .ok_or(StudentError::StudentNotFound)
    }

    /// Applies a partial update to the admission-identity fields. Only the
    /// provided columns change; everything else keeps its stored value.
    #[instrument(skip(db, changes))]
    pub async fn update_master_data(
        db: &PgPool,
        student_id: i64,
        changes: MasterDataChanges,
    ) -> Result<Student, StudentError> {
        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM students WHERE id = $1 LIMIT 1")
            .bind(student_id)
            .fetch_optional(db)
            .await?;

        if exists.is_none() {
            return Err(StudentError::StudentNotFound);
        }

        if changes.is_empty() {
            return Err(StudentError::NoMasterDataFields);
        }

        if let Some(admission_number) = &changes.admission_number {
            let taken = sqlx::query_scalar::<_, i64>(
                "SELECT id FROM students WHERE admission_number = $1 AND id <> $2 LIMIT 1",
            )
            .bind(admission_number)
            .bind(student_id)
            .fetch_optional(db)
            .await?;

            if taken.is_some() {
                return Err(StudentError::AdmissionNumberExists);
            }
        }

        sqlx::query(
            "UPDATE students
             SET admission_number = COALESCE($1, admission_number),
                 first_name = COALESCE($2, first_name),
                 last_name = COALESCE($3, last_name),
                 class_name = COALESCE($4, class_name),
                 grade = COALESCE($5, grade),
                 admission_date = COALESCE($6, admission_date),
                 updated_at = now()
             WHERE id = $7",
        )
        .bind(&changes.admission_number)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.class_name)
        .bind(&changes.grade)
        .bind(changes.admission_date)
        .bind(student_id)
        .execute(db)
        .await?;

        fetch_student(db, student_id)
            .await?
            .ok_or(StudentError::StudentNotFound)
    }
}
