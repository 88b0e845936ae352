//! Upload storage configuration.

use serde::{Deserialize, Serialize};

/// Where uploaded files are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Local filesystem under `storage.root`.
    #[default]
    Local,
    /// Process memory. Files are lost on exit.
    Memory,
    /// S3-compatible bucket, see the `s3` section.
    S3,
}

impl StorageBackend {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Memory => "memory",
            Self::S3 => "s3",
        }
    }
}

/// Default local media root.
fn default_root() -> String {
    String::from("media")
}

/// Default upload prefix for marksheets.
fn default_upload_dir() -> String {
    String::from("marksheets")
}

/// Default public URL prefix for stored files.
fn default_media_url() -> String {
    String::from("/media/")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Local directory for the `local` backend.
    #[serde(default = "default_root")]
    pub root: String,

    /// Prefix under which marksheets are stored.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,

    /// URL prefix prepended to stored paths in API responses.
    #[serde(default = "default_media_url")]
    pub media_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            root: default_root(),
            upload_dir: default_upload_dir(),
            media_url: default_media_url(),
        }
    }
}

impl StorageConfig {
    /// Public URL for a stored path, e.g. `/media/marksheets/asha.pdf`.
    pub fn public_url(&self, stored_path: &str) -> String {
        let base = self.media_url.trim_end_matches('/');
        let path = stored_path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Upload prefix with surrounding slashes removed.
    pub fn upload_prefix(&self) -> &str {
        self.upload_dir.trim_matches('/')
    }
}
