//! # reg-storage
//!
//! Upload storage for registration marksheets.
//!
//! [`UploadStore`] is the `store(bytes, filename) -> reference` capability the
//! registration endpoint depends on. It wraps any `object_store` backend, so
//! local disk, process memory, and S3-compatible buckets behave the same to
//! callers. Stored files are never overwritten: a name collision picks an
//! alternate name instead.

pub mod error;
pub mod filename;

use std::sync::Arc;

use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutMode, PutOptions, PutPayload};
use reg_config::{S3Config, StorageBackend, StorageConfig};

pub use error::StorageError;
use filename::{MAX_PATH_CHARS, fit_path, random_suffix, sanitize_filename, split_extension};

/// Alternate names tried after the first collision before giving up.
const MAX_ATTEMPTS: usize = 16;

/// Writes uploads under a fixed directory prefix of an object store.
#[derive(Clone)]
pub struct UploadStore {
    store: Arc<dyn ObjectStore>,
    upload_dir: String,
    max_path_chars: usize,
}

impl std::fmt::Debug for UploadStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadStore")
            .field("store", &self.store.to_string())
            .field("upload_dir", &self.upload_dir)
            .finish_non_exhaustive()
    }
}

impl UploadStore {
    /// Wrap an existing object store.
    pub fn new(store: Arc<dyn ObjectStore>, upload_dir: &str) -> Self {
        Self {
            store,
            upload_dir: upload_dir.trim_matches('/').to_string(),
            max_path_chars: MAX_PATH_CHARS,
        }
    }

    /// A store that keeps files in process memory.
    pub fn in_memory(upload_dir: &str) -> Self {
        Self::new(Arc::new(InMemory::new()), upload_dir)
    }

    /// Build the backend selected by configuration.
    ///
    /// The `local` backend creates `storage.root` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the media root cannot be created or the
    /// backend rejects its settings.
    pub async fn from_config(
        storage: &StorageConfig,
        s3: &S3Config,
    ) -> Result<Self, StorageError> {
        let store: Arc<dyn ObjectStore> = match storage.backend {
            StorageBackend::Local => {
                tokio::fs::create_dir_all(&storage.root).await?;
                Arc::new(LocalFileSystem::new_with_prefix(&storage.root)?)
            }
            StorageBackend::Memory => Arc::new(InMemory::new()),
            StorageBackend::S3 => {
                let mut builder = AmazonS3Builder::new()
                    .with_bucket_name(&s3.bucket)
                    .with_region(&s3.region)
                    .with_access_key_id(&s3.access_key_id)
                    .with_secret_access_key(&s3.secret_access_key);
                if s3.has_custom_endpoint() {
                    builder = builder
                        .with_endpoint(&s3.endpoint)
                        .with_allow_http(s3.endpoint.starts_with("http://"));
                }
                Arc::new(builder.build()?)
            }
        };

        tracing::info!(
            backend = storage.backend.as_str(),
            upload_dir = storage.upload_prefix(),
            "upload store ready"
        );
        Ok(Self::new(store, storage.upload_prefix()))
    }

    /// Directory prefix every stored path starts with.
    #[must_use]
    pub fn upload_dir(&self) -> &str {
        &self.upload_dir
    }

    /// Store `bytes` under a name derived from `filename`.
    ///
    /// Returns the stored path (e.g. `marksheets/asha.pdf`), which is the
    /// reference kept in the record. An existing object is never replaced.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails, no free name is found, or
    /// the name cannot be cut to fit the path limit.
    pub async fn store(&self, bytes: Bytes, filename: &str) -> Result<String, StorageError> {
        let clean = sanitize_filename(filename);
        let (stem, ext) = split_extension(&clean);
        let payload = PutPayload::from(bytes);

        let plain = format!("{}/{clean}", self.upload_dir);
        let mut candidate = if plain.chars().count() <= self.max_path_chars {
            plain
        } else {
            self.alternate(stem, ext)?
        };

        for _ in 0..MAX_ATTEMPTS {
            let location = ObjectPath::from(candidate.as_str());
            match self
                .store
                .put_opts(&location, payload.clone(), PutOptions::from(PutMode::Create))
                .await
            {
                Ok(_) => {
                    tracing::debug!(path = %location, size = payload.content_length(), "upload stored");
                    return Ok(location.to_string());
                }
                Err(object_store::Error::AlreadyExists { .. }) => {
                    tracing::debug!(path = %location, "upload name taken, trying alternate");
                    candidate = self.alternate(stem, ext)?;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(StorageError::NameExhausted {
            name: clean,
            attempts: MAX_ATTEMPTS,
        })
    }

    /// Read a stored file back.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ObjectStore` if the path does not exist or the
    /// read fails.
    pub async fn read(&self, stored_path: &str) -> Result<Bytes, StorageError> {
        let result = self.store.get(&ObjectPath::from(stored_path)).await?;
        Ok(result.bytes().await?)
    }

    /// Whether a stored path exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ObjectStore` for failures other than not-found.
    pub async fn exists(&self, stored_path: &str) -> Result<bool, StorageError> {
        match self.store.head(&ObjectPath::from(stored_path)).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn alternate(&self, stem: &str, ext: &str) -> Result<String, StorageError> {
        let suffix = random_suffix()?;
        fit_path(&self.upload_dir, stem, Some(&suffix), ext, self.max_path_chars)
    }
}
