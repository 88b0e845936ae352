//! Per-type coercion rules.
//!
//! Each rule takes the raw value (or `None` when the key was absent) and
//! returns the typed value or the list of messages for that field.

use std::borrow::Cow;

use chrono::NaiveDate;
use serde_json::Value;

use crate::input::{RawValue, UploadedFile};

pub const REQUIRED: &str = "This field is required.";
pub const NULL: &str = "This field may not be null.";
pub const BLANK: &str = "This field may not be blank.";
pub const NOT_A_STRING: &str = "Not a valid string.";
pub const NULL_CHARACTERS: &str = "Null characters are not allowed.";
pub const INVALID_DATE: &str = "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";
pub const INVALID_INTEGER: &str = "A valid integer is required.";
pub const INVALID_NUMBER: &str = "A valid number is required.";
pub const NO_FILE: &str = "No file was submitted.";
pub const NOT_A_FILE: &str =
    "The submitted data was not a file. Check the encoding type on the form.";
pub const NO_FILENAME: &str = "No filename could be determined.";
pub const EMPTY_FILE: &str = "The submitted file is empty.";

type FieldResult<T> = Result<T, Vec<String>>;

fn fail<T>(message: impl Into<String>) -> FieldResult<T> {
    Err(vec![message.into()])
}

/// Resolve a raw value to scalar text, or fail with `invalid`.
///
/// Absent and `null` values report the required/null messages. JSON numbers
/// are rendered with serde's formatting.
fn scalar_text<'a>(value: Option<&'a RawValue>, invalid: &str) -> FieldResult<Cow<'a, str>> {
    match value {
        None => fail(REQUIRED),
        Some(RawValue::Text(text)) => Ok(Cow::Borrowed(text.as_str())),
        Some(RawValue::Json(Value::Null)) => fail(NULL),
        Some(RawValue::Json(Value::String(text))) => Ok(Cow::Borrowed(text.as_str())),
        Some(RawValue::Json(Value::Number(number))) => Ok(Cow::Owned(number.to_string())),
        Some(RawValue::Json(_) | RawValue::File(_)) => fail(invalid),
    }
}

/// Required text, trimmed, non-blank, optionally capped in characters.
///
/// Length and NUL checks both run, so one value can carry both messages.
pub fn text(value: Option<&RawValue>, max_chars: Option<usize>) -> FieldResult<String> {
    let raw = scalar_text(value, NOT_A_STRING)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return fail(BLANK);
    }

    let mut messages = Vec::new();
    if let Some(max) = max_chars {
        if trimmed.chars().count() > max {
            messages.push(format!("Ensure this field has no more than {max} characters."));
        }
    }
    if trimmed.contains('\0') {
        messages.push(NULL_CHARACTERS.to_string());
    }

    if messages.is_empty() {
        Ok(trimmed.to_string())
    } else {
        Err(messages)
    }
}

/// Split `YYYY-M-D` into its parts. Digits only, no padding or signs.
fn date_parts(raw: &str) -> Option<(i32, u32, u32)> {
    fn digits(part: &str, min: usize, max: usize) -> Option<&str> {
        (part.len() >= min && part.len() <= max && part.bytes().all(|b| b.is_ascii_digit()))
            .then_some(part)
    }

    let mut parts = raw.split('-');
    let year = digits(parts.next()?, 4, 4)?.parse().ok()?;
    let month = digits(parts.next()?, 1, 2)?.parse().ok()?;
    let day = digits(parts.next()?, 1, 2)?.parse().ok()?;
    parts.next().is_none().then_some((year, month, day))
}

/// Required ISO 8601 calendar date (`YYYY-MM-DD`).
///
/// The text is matched as-is; surrounding whitespace is a format error.
pub fn date(value: Option<&RawValue>) -> FieldResult<NaiveDate> {
    let raw = scalar_text(value, INVALID_DATE)?;
    if matches!(value, Some(RawValue::Json(Value::Number(_)))) {
        return fail(INVALID_DATE);
    }
    date_parts(&raw)
        .and_then(|(year, month, day)| NaiveDate::from_ymd_opt(year, month, day))
        .map_or_else(|| fail(INVALID_DATE), Ok)
}

/// Strip a trailing all-zero fraction, so `"10.0"` reads as `"10"`.
fn strip_zero_fraction(text: &str) -> &str {
    match text.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
        _ => text,
    }
}

/// Required integer within the 32-bit signed column range.
pub fn integer(value: Option<&RawValue>) -> FieldResult<i32> {
    let raw = scalar_text(value, INVALID_INTEGER)?;
    let digits = strip_zero_fraction(raw.trim());
    let parsed: i128 = digits.parse().or_else(|_| fail(INVALID_INTEGER))?;
    if parsed < i128::from(i32::MIN) {
        return fail(format!(
            "Ensure this value is greater than or equal to {}.",
            i32::MIN
        ));
    }
    if parsed > i128::from(i32::MAX) {
        return fail(format!(
            "Ensure this value is less than or equal to {}.",
            i32::MAX
        ));
    }
    i32::try_from(parsed).or_else(|_| fail(INVALID_INTEGER))
}

/// Required finite floating-point number.
pub fn float(value: Option<&RawValue>) -> FieldResult<f64> {
    let parsed = match value {
        Some(RawValue::Json(Value::Number(number))) => number.as_f64(),
        other => scalar_text(other, INVALID_NUMBER)?.trim().parse::<f64>().ok(),
    };
    match parsed {
        Some(number) if number.is_finite() => Ok(number),
        _ => fail(INVALID_NUMBER),
    }
}

/// Required uploaded file with a usable name and non-empty content.
pub fn file(value: Option<&RawValue>, max_name_chars: usize) -> FieldResult<UploadedFile> {
    let upload = match value {
        None => return fail(NO_FILE),
        Some(RawValue::Json(Value::Null)) => return fail(NULL),
        Some(RawValue::File(upload)) => upload,
        Some(RawValue::Text(_) | RawValue::Json(_)) => return fail(NOT_A_FILE),
    };

    let name = upload.basename();
    if name.is_empty() {
        return fail(NO_FILENAME);
    }
    if upload.size() == 0 {
        return fail(EMPTY_FILE);
    }
    let name_chars = name.chars().count();
    if name_chars > max_name_chars {
        return fail(format!(
            "Ensure this filename has at most {max_name_chars} characters (it has {name_chars})."
        ));
    }
    Ok(upload.clone())
}
