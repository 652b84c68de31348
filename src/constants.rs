// -
// On-disk layout

/// Default data directory holding the persisted snapshot and the key file
pub(crate) const DEFAULT_DATA_DIR: &str = "./data";

/// Persisted snapshot file name inside the data directory
pub(crate) const DEFAULT_CONFIG_FILE_NAME: &str = "config.json";

/// Secret key file name inside the data directory
pub(crate) const DEFAULT_SECRET_FILE_NAME: &str = "secret";

/// Suffix of the sibling file used while atomically replacing a file
pub(crate) const TEMP_FILE_SUFFIX: &str = ".tmp";

// -
// Settings sources

/// Environment variable naming an optional settings file
pub(crate) const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

/// Prefix of environment variable overrides, e.g. `CONFSTORE__DATA_DIR`
pub(crate) const ENV_PREFIX: &str = "CONFSTORE";

// -
// Secret keys

/// Length in bytes of freshly generated keys (AES-128)
pub(crate) const GENERATED_KEY_LEN: usize = 16;

/// Accepted AES key lengths when loading an existing key file
pub(crate) const VALID_KEY_LENS: [usize; 3] = [16, 24, 32];

// -
// Transaction types

/// Fallback when neither plugins nor instrumentation declare a transaction type
pub(crate) const FALLBACK_TRANSACTION_TYPE: &str = "Web";
