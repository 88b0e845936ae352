//! Serde roundtrip and JsonSchema validation tests for the student entity.

use chrono::{NaiveDate, TimeZone, Utc};
use schemars::schema_for;

use reg_core::Student;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

fn sample_student() -> Student {
    Student {
        id: "stu-a3f8b2c1".into(),
        name: "Asha".into(),
        dob: NaiveDate::from_ymd_opt(2005, 4, 1).unwrap(),
        father_name: "Ramesh".into(),
        address: "12 MG Road".into(),
        student_class: 10,
        percentage_10th: 92.5,
        marksheet_pdf: "marksheets/asha.pdf".into(),
        created_at: Utc.with_ymd_and_hms(2026, 2, 9, 14, 30, 0).unwrap(),
    }
}

#[test]
fn student_roundtrip() {
    let student = sample_student();
    let json_str = serde_json::to_string_pretty(&student).unwrap();
    let recovered: Student = serde_json::from_str(&json_str).unwrap();
    assert_eq!(recovered, student);
}

#[test]
fn student_matches_schema() {
    let schema = serde_json::to_value(schema_for!(Student)).unwrap();
    let instance = serde_json::to_value(sample_student()).unwrap();
    let errors = validate_against_schema(&schema, &instance);
    assert!(errors.is_empty(), "Schema validation failed: {errors:?}");
}

#[test]
fn schema_rejects_missing_field() {
    let schema = serde_json::to_value(schema_for!(Student)).unwrap();
    let mut instance = serde_json::to_value(sample_student()).unwrap();
    instance.as_object_mut().unwrap().remove("dob");
    let errors = validate_against_schema(&schema, &instance);
    assert!(!errors.is_empty());
}

#[test]
fn dob_serializes_as_iso_date() {
    let value = serde_json::to_value(sample_student()).unwrap();
    assert_eq!(value["dob"], "2005-04-01");
    assert_eq!(value["student_class"], 10);
    assert_eq!(value["percentage_10th"], 92.5);
}
