//! Entity structs for the registrar domain.
//!
//! `Student` maps to the `students` table in the libSQL database. It derives
//! `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip and schema
//! validation.

mod student;

pub use student::{NewStudent, Student};
