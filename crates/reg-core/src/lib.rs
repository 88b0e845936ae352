//! # reg-core
//!
//! Core types for the student registration service.
//!
//! This crate provides the types shared across all registrar crates:
//! - The persisted `Student` entity and the validated `NewStudent` draft
//! - Untyped request input (`RawRecord`, `RawValue`, `UploadedFile`)
//! - The stateless registration validator and its per-field error map
//! - ID prefix constants

pub mod entities;
pub mod ids;
pub mod input;
pub mod validation;

pub use entities::{NewStudent, Student};
pub use input::{RawRecord, RawValue, UploadedFile};
pub use validation::{FieldErrors, validate_registration};
