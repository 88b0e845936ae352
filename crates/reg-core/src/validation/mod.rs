//! Stateless registration validator.
//!
//! [`validate_registration`] checks every declared field of a [`RawRecord`]
//! in a single pass and returns either a typed [`NewStudent`] or the full map
//! of per-field messages. Unknown keys, including a client-supplied `id`, are
//! ignored.

pub mod fields;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::NewStudent;
use crate::input::RawRecord;

pub const FIELD_NAME: &str = "name";
pub const FIELD_DOB: &str = "dob";
pub const FIELD_FATHER_NAME: &str = "father_name";
pub const FIELD_ADDRESS: &str = "address";
pub const FIELD_STUDENT_CLASS: &str = "student_class";
pub const FIELD_PERCENTAGE_10TH: &str = "percentage_10th";
pub const FIELD_MARKSHEET: &str = "marksheet_pdf";

/// Declared fields, in declaration order.
pub const REGISTRATION_FIELDS: [&str; 7] = [
    FIELD_NAME,
    FIELD_DOB,
    FIELD_FATHER_NAME,
    FIELD_ADDRESS,
    FIELD_STUDENT_CLASS,
    FIELD_PERCENTAGE_10TH,
    FIELD_MARKSHEET,
];

/// Maximum characters for `name` and `father_name`.
pub const MAX_NAME_CHARS: usize = 100;

/// Maximum characters for the uploaded marksheet's filename.
pub const MAX_FILENAME_CHARS: usize = 100;

/// Field name to human-readable messages. Serializes as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(transparent)]
#[error("registration rejected: {} invalid field(s)", .0.len())]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    /// Record the messages of a failed field rule and pass a success through.
    pub fn check<T>(&mut self, field: &str, result: Result<T, Vec<String>>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(messages) => {
                self.0
                    .entry(field.to_string())
                    .or_default()
                    .extend(messages);
                None
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Validate a candidate registration.
///
/// # Errors
///
/// Returns [`FieldErrors`] with one entry per failing field when any declared
/// field is missing, mistyped, or out of bounds.
pub fn validate_registration(raw: &RawRecord) -> Result<NewStudent, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = errors.check(
        FIELD_NAME,
        fields::text(raw.get(FIELD_NAME), Some(MAX_NAME_CHARS)),
    );
    let dob = errors.check(FIELD_DOB, fields::date(raw.get(FIELD_DOB)));
    let father_name = errors.check(
        FIELD_FATHER_NAME,
        fields::text(raw.get(FIELD_FATHER_NAME), Some(MAX_NAME_CHARS)),
    );
    let address = errors.check(FIELD_ADDRESS, fields::text(raw.get(FIELD_ADDRESS), None));
    let student_class = errors.check(
        FIELD_STUDENT_CLASS,
        fields::integer(raw.get(FIELD_STUDENT_CLASS)),
    );
    let percentage_10th = errors.check(
        FIELD_PERCENTAGE_10TH,
        fields::float(raw.get(FIELD_PERCENTAGE_10TH)),
    );
    let marksheet = errors.check(
        FIELD_MARKSHEET,
        fields::file(raw.get(FIELD_MARKSHEET), MAX_FILENAME_CHARS),
    );

    match (
        name,
        dob,
        father_name,
        address,
        student_class,
        percentage_10th,
        marksheet,
    ) {
        (
            Some(name),
            Some(dob),
            Some(father_name),
            Some(address),
            Some(student_class),
            Some(percentage_10th),
            Some(marksheet),
        ) => Ok(NewStudent {
            name,
            dob,
            father_name,
            address,
            student_class,
            percentage_10th,
            marksheet,
        }),
        _ => Err(errors),
    }
}
