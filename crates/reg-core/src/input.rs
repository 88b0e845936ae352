//! Untyped request input.
//!
//! The HTTP layer flattens multipart, urlencoded, and JSON bodies into a
//! `RawRecord` before anything is validated. Values keep the shape they
//! arrived in so the validator can report type mismatches per field.

use std::collections::BTreeMap;

use bytes::Bytes;

/// A file part received with the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Filename as sent by the client. May include directory components.
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, content_type: Option<String>, bytes: Bytes) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            bytes,
        }
    }

    /// Final path component of the client filename.
    ///
    /// Browsers on Windows have been known to send the full local path.
    #[must_use]
    pub fn basename(&self) -> &str {
        self.filename
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// One untyped input value.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// A plain form field (multipart text part or urlencoded pair).
    Text(String),
    /// A value taken from a JSON object body.
    Json(serde_json::Value),
    /// A multipart file part.
    File(UploadedFile),
}

/// An untyped candidate record: field name to raw value.
///
/// Repeated keys keep the last value seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: BTreeMap<String, RawValue>,
}

impl RawRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: RawValue) {
        self.fields.insert(key.into(), value);
    }

    /// Builder-style insert of a text value.
    #[must_use]
    pub fn with_text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, RawValue::Text(value.into()));
        self
    }

    /// Builder-style insert of a file value.
    #[must_use]
    pub fn with_file(mut self, key: impl Into<String>, file: UploadedFile) -> Self {
        self.insert(key, RawValue::File(file));
        self
    }

    /// Remove a field, returning its value if present.
    pub fn remove(&mut self, key: &str) -> Option<RawValue> {
        self.fields.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.fields.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for RawRecord {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter()
            .map(|(key, value)| (key, RawValue::Json(value)))
            .collect()
    }
}

impl FromIterator<(String, RawValue)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (String, RawValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
