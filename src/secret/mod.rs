//! Symmetric key material used to protect secrets inside the configuration
//! (e.g. the SMTP password).
//!
//! [`KeyProvider`] is the cryptographic collaborator; [`SecretKeyManager`]
//! materializes exactly one key per store lifetime on top of it.

mod manager;


pub use manager::*;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::constants::GENERATED_KEY_LEN;
use crate::constants::VALID_KEY_LENS;
use crate::Result;
use crate::SecretError;

/// Opaque symmetric key, cheap to clone.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(Arc<[u8]>);

impl SecretKey {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        SecretKey(Arc::from(bytes))
    }

    /// Raw encoded form, as written to the key file
    pub fn encoded(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("SecretKey").field("len", &self.0.len()).finish()
    }
}

#[cfg_attr(test, automock)]
pub trait KeyProvider: Send + Sync + 'static {
    fn generate_key(&self) -> Result<SecretKey>;

    fn load_key(
        &self,
        path: &Path,
    ) -> Result<SecretKey>;
}

/// AES key material drawn from the operating system's RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomKeyProvider;

impl KeyProvider for RandomKeyProvider {
    fn generate_key(&self) -> Result<SecretKey> {
        let mut bytes = [0u8; GENERATED_KEY_LEN];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| SecretError::Generation(e.to_string()))?;
        Ok(SecretKey::from_bytes(&bytes))
    }

    fn load_key(
        &self,
        path: &Path,
    ) -> Result<SecretKey> {
        let bytes = std::fs::read(path).map_err(|source| SecretError::KeyFile {
            path: path.to_path_buf(),
            source,
        })?;
        if !VALID_KEY_LENS.contains(&bytes.len()) {
            return Err(SecretError::InvalidKeyLength(bytes.len()).into());
        }
        Ok(SecretKey::from_bytes(&bytes))
    }
}
