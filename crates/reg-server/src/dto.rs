//! Response bodies.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use reg_config::StorageConfig;
use reg_core::Student;

/// Body of a 201 response: the stored record with its marksheet as a URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationResponse {
    pub id: String,
    pub name: String,
    pub dob: NaiveDate,
    pub father_name: String,
    pub address: String,
    pub student_class: i32,
    pub percentage_10th: f64,
    pub marksheet_pdf: String,
    pub created_at: DateTime<Utc>,
}

impl RegistrationResponse {
    pub fn new(student: Student, storage: &StorageConfig) -> Self {
        Self {
            marksheet_pdf: storage.public_url(&student.marksheet_pdf),
            id: student.id,
            name: student.name,
            dob: student.dob,
            father_name: student.father_name,
            address: student.address,
            student_class: student.student_class,
            percentage_10th: student.percentage_10th,
            created_at: student.created_at,
        }
    }
}
