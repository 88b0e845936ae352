//! ID prefix constants.
//!
//! Record IDs are `{prefix}-{8 hex chars}`, generated by the database layer.

/// Prefix for student registration records.
pub const PREFIX_STUDENT: &str = "stu";

/// Every prefix in use, for exhaustive ID generation tests.
pub const ALL_PREFIXES: &[&str] = &[PREFIX_STUDENT];

/// Check that `id` looks like `{prefix}-{8 lowercase hex chars}`.
#[must_use]
pub fn has_prefix_format(id: &str, prefix: &str) -> bool {
    id.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|hex| {
            hex.len() == 8 && hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        })
}
