//! Upload storage error types.

/// Errors from writing or reading uploaded files.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The object store rejected the operation.
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    /// The local media root could not be prepared.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The OS random source failed while picking an alternate name.
    #[error("Random source unavailable: {0}")]
    Random(String),

    /// No stem is left once the stored path is cut to the length limit.
    #[error("Stored path for '{name}' cannot fit in {max} characters")]
    NameTooLong { name: String, max: usize },

    /// Every alternate name tried was already taken.
    #[error("No free name for '{name}' after {attempts} attempts")]
    NameExhausted { name: String, attempts: usize },
}
