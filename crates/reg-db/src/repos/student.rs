//! Student repository: insert-once and read-back.

use chrono::{DateTime, Utc};

use reg_core::entities::{NewStudent, Student};
use reg_core::ids::PREFIX_STUDENT;

use crate::error::DatabaseError;
use crate::helpers::{DATE_FORMAT, get_i32, parse_date, parse_datetime};
use crate::service::RegService;

const STUDENT_COLUMNS: &str = "id, name, dob, father_name, address, student_class, percentage_10th, marksheet_pdf, created_at";

fn row_to_student(row: &libsql::Row) -> Result<Student, DatabaseError> {
    Ok(Student {
        id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        dob: parse_date(&row.get::<String>(2)?)?,
        father_name: row.get::<String>(3)?,
        address: row.get::<String>(4)?,
        student_class: get_i32(row, 5)?,
        percentage_10th: row.get::<f64>(6)?,
        marksheet_pdf: row.get::<String>(7)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

/// Fresh IDs drawn before giving up on an insert.
const MAX_ID_ATTEMPTS: usize = 8;

impl RegService {
    /// Insert a validated registration whose marksheet is already stored.
    ///
    /// Every call inserts a new row; identical submissions are not merged.
    /// A generated ID that is already taken is replaced with a fresh one.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if ID generation or the insert fails, or
    /// `DatabaseError::IdExhausted` if every drawn ID was taken.
    pub async fn create_student(
        &self,
        student: &NewStudent,
        marksheet_path: &str,
    ) -> Result<Student, DatabaseError> {
        let db = self.db();
        self.create_student_with_ids(student, marksheet_path, move || {
            db.generate_id(PREFIX_STUDENT)
        })
        .await
    }

    /// Insert under the first ID from `next_id` that is not already taken.
    async fn create_student_with_ids<F, Fut>(
        &self,
        student: &NewStudent,
        marksheet_path: &str,
        mut next_id: F,
    ) -> Result<Student, DatabaseError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<String, DatabaseError>>,
    {
        let now = Utc::now();

        for _ in 0..MAX_ID_ATTEMPTS {
            let id = next_id().await?;
            if self.insert_student(&id, student, marksheet_path, now).await? {
                tracing::info!(student_id = %id, marksheet = marksheet_path, "student registered");
                return Ok(Student {
                    id,
                    name: student.name.clone(),
                    dob: student.dob,
                    father_name: student.father_name.clone(),
                    address: student.address.clone(),
                    student_class: student.student_class,
                    percentage_10th: student.percentage_10th,
                    marksheet_pdf: marksheet_path.to_string(),
                    created_at: now,
                });
            }
            tracing::warn!(student_id = %id, "generated ID already taken, drawing another");
        }

        Err(DatabaseError::IdExhausted {
            prefix: PREFIX_STUDENT,
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    /// Insert one row under `id`. Returns `false` if the ID is already taken.
    async fn insert_student(
        &self,
        id: &str,
        student: &NewStudent,
        marksheet_path: &str,
        created_at: DateTime<Utc>,
    ) -> Result<bool, DatabaseError> {
        let inserted = self
            .db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO students ({STUDENT_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                     ON CONFLICT(id) DO NOTHING"
                ),
                libsql::params![
                    id,
                    student.name.as_str(),
                    student.dob.format(DATE_FORMAT).to_string(),
                    student.father_name.as_str(),
                    student.address.as_str(),
                    i64::from(student.student_class),
                    student.percentage_10th,
                    marksheet_path,
                    created_at.to_rfc3339()
                ],
            )
            .await?;
        Ok(inserted == 1)
    }

    /// Fetch one registration by ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no row has this ID.
    pub async fn get_student(&self, id: &str) -> Result<Student, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_student(&row)
    }

    /// Number of stored registrations.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the count query fails.
    pub async fn count_students(&self) -> Result<u64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT COUNT(*) FROM students", ())
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let count = row.get::<i64>(0)?;
        u64::try_from(count)
            .map_err(|_| DatabaseError::InvalidState(format!("negative row count: {count}")))
    }
}
