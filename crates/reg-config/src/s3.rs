//! S3-compatible bucket configuration for the `s3` storage backend.

use serde::{Deserialize, Serialize};

/// Default region.
fn default_region() -> String {
    String::from("us-east-1")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct S3Config {
    /// Bucket that receives uploaded marksheets.
    #[serde(default)]
    pub bucket: String,

    #[serde(default = "default_region")]
    pub region: String,

    /// Custom endpoint URL (MinIO, R2). Empty means AWS.
    #[serde(default)]
    pub endpoint: String,

    #[serde(default)]
    pub access_key_id: String,

    #[serde(default)]
    pub secret_access_key: String,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: default_region(),
            endpoint: String::new(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
        }
    }
}

impl S3Config {
    /// Check if the S3 config has the minimum required fields.
    pub fn is_configured(&self) -> bool {
        !self.bucket.is_empty() && !self.access_key_id.is_empty() && !self.secret_access_key.is_empty()
    }

    /// Whether a non-AWS endpoint was configured.
    pub fn has_custom_endpoint(&self) -> bool {
        !self.endpoint.is_empty()
    }
}
