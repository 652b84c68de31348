//! Configuration Store Error Hierarchy
//!
//! Defines the error types surfaced by the versioned configuration store,
//! categorized into caller-actionable validation failures and
//! infrastructure failures (durable storage, secret key material).

use std::path::PathBuf;

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Validation failures of a mutation against the current snapshot
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Infrastructure-level failures (storage, secret key material)
    #[error(transparent)]
    System(#[from] SystemError),

    /// Store settings loading or validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Caller's prior version no longer matches the current one.
    /// Recoverable: re-read the current value and retry with its version.
    #[error("Optimistic lock failure on {section} (expected version {expected}, found {actual})")]
    OptimisticLock {
        section: &'static str,
        expected: String,
        actual: String,
    },

    /// Update or delete referenced a version or plugin id absent from the collection
    #[error("{section} not found: {key}")]
    NotFound { section: &'static str, key: String },

    /// Gauge insert/update would reuse an existing mbean object name
    #[error("Duplicate mbean object name: {mbean_object_name}")]
    DuplicateKey { mbean_object_name: String },

    /// Submitted value cannot be persisted faithfully (e.g. NaN or infinite numbers)
    #[error("Invalid {section} value: {reason}")]
    InvalidValue { section: &'static str, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    // Durable configuration storage
    #[error("Storage operation failed: {0}")]
    Storage(#[from] StorageError),

    // Secret key material
    #[error("Secret key access failed: {0}")]
    Secret(#[from] SecretError),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O failure bound to a concrete path
    #[error("Error occurred at path: {path}")]
    PathError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Serialization failures for persisted snapshots
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    /// Persisted content that cannot be turned into a snapshot
    #[error("Data corruption detected at {location}")]
    DataCorruption { location: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    /// Reading or writing the key file failed
    #[error("Key file {path} inaccessible: {source}")]
    KeyFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Key file content is not a usable key
    #[error("Invalid key length: {0} bytes")]
    InvalidKeyLength(usize),

    /// Random source failed while generating a new key
    #[error("Key generation failed: {0}")]
    Generation(String),
}

impl Error {
    pub fn is_optimistic_lock(&self) -> bool {
        matches!(self, Error::Store(StoreError::OptimisticLock { .. }))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Store(StoreError::NotFound { .. }))
    }

    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Error::Store(StoreError::DuplicateKey { .. }))
    }

    pub fn is_invalid_value(&self) -> bool {
        matches!(self, Error::Store(StoreError::InvalidValue { .. }))
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, Error::System(SystemError::Storage(_)))
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, Error::System(SystemError::Secret(_)))
    }
}

// ============== Conversion Implementations ============== //
impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Error::System(SystemError::Storage(e))
    }
}

impl From<SecretError> for Error {
    fn from(e: SecretError) -> Self {
        Error::System(SystemError::Secret(e))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        StorageError::JsonError(e).into()
    }
}
