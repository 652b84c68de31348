use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;
use tracing::error;
use tracing::info;

use super::KeyProvider;
use super::SecretKey;
use crate::file_io::write_atomically;
use crate::Result;
use crate::SecretError;
use crate::StorageError;

/// Lazily materializes the store's secret key.
///
/// The first call loads the key file, or generates a key and writes it
/// when the file is absent. Later calls return the cached key. The guard
/// is independent of the configuration write lock and never nests with it.
pub struct SecretKeyManager {
    path: PathBuf,
    provider: Arc<dyn KeyProvider>,
    key: Mutex<Option<SecretKey>>,
}

impl std::fmt::Debug for SecretKeyManager {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("SecretKeyManager")
            .field("path", &self.path)
            .field("materialized", &self.key.lock().is_some())
            .finish()
    }
}

impl SecretKeyManager {
    pub fn new(
        path: impl Into<PathBuf>,
        provider: Arc<dyn KeyProvider>,
    ) -> Self {
        Self {
            path: path.into(),
            provider,
            key: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the key, materializing it on first use.
    ///
    /// Failures are returned to the caller and leave the slot empty, so a
    /// later call tries again from scratch.
    pub fn secret_key(&self) -> Result<SecretKey> {
        let mut slot = self.key.lock();
        if let Some(key) = slot.as_ref() {
            return Ok(key.clone());
        }

        // a path that cannot be inspected is fatal, never "absent"
        let exists = self.path.try_exists().map_err(|source| {
            error!("failed to inspect secret key file {:?}: {}", self.path, source);
            SecretError::KeyFile {
                path: self.path.clone(),
                source,
            }
        })?;
        let key = if exists {
            debug!("loading secret key from {:?}", self.path);
            self.provider.load_key(&self.path)?
        } else {
            let key = self.provider.generate_key()?;
            write_atomically(&self.path, key.encoded()).map_err(|e| {
                error!("failed to write secret key file {:?}: {}", self.path, e);
                self.key_file_error(e)
            })?;
            info!("generated new secret key at {:?}", self.path);
            key
        };

        *slot = Some(key.clone());
        Ok(key)
    }

    fn key_file_error(
        &self,
        e: StorageError,
    ) -> SecretError {
        match e {
            StorageError::PathError { path, source } => SecretError::KeyFile { path, source },
            other => SecretError::KeyFile {
                path: self.path.clone(),
                source: std::io::Error::other(other.to_string()),
            },
        }
    }
}
