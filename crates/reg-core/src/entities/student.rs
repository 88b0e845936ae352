use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::input::UploadedFile;

/// A persisted student registration. Created once, never updated.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub dob: NaiveDate,
    pub father_name: String,
    pub address: String,
    pub student_class: i32,
    pub percentage_10th: f64,
    /// Stored path of the marksheet, relative to the upload store root.
    pub marksheet_pdf: String,
    pub created_at: DateTime<Utc>,
}

/// A registration that passed validation but has not been stored yet.
///
/// Holds the uploaded marksheet in memory; the file store turns it into a
/// path before the record is inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub name: String,
    pub dob: NaiveDate,
    pub father_name: String,
    pub address: String,
    pub student_class: i32,
    pub percentage_10th: f64,
    pub marksheet: UploadedFile,
}
