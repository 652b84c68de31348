//! Settings of the configuration store itself (where it keeps its files).
//!
//! Provides hierarchical loading with:
//! - Default values as code base
//! - Configuration file named by `CONFIG_PATH`
//! - Environment variable overrides (`CONFSTORE__` prefix)

use std::env;
use std::path::Path;
use std::path::PathBuf;

use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::CONFIG_PATH_ENV;
use crate::constants::DEFAULT_CONFIG_FILE_NAME;
use crate::constants::DEFAULT_DATA_DIR;
use crate::constants::DEFAULT_SECRET_FILE_NAME;
use crate::constants::ENV_PREFIX;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StoreSettings {
    /// Directory holding the persisted snapshot and the key file
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Snapshot file name inside `data_dir`
    #[serde(default = "default_config_file_name")]
    pub config_file_name: String,

    /// Secret key file name inside `data_dir`
    #[serde(default = "default_secret_file_name")]
    pub secret_file_name: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            config_file_name: default_config_file_name(),
            secret_file_name: default_secret_file_name(),
        }
    }
}

impl StoreSettings {
    /// Loads settings from hierarchical sources without validation.
    ///
    /// Sources are merged in the following order (later sources override earlier):
    /// 1. Type defaults (lowest priority)
    /// 2. Configuration file from `CONFIG_PATH` environment variable (if set)
    /// 3. Environment variables with `CONFSTORE__` prefix (highest priority)
    ///
    /// # Note
    /// Callers MUST call `validate()` once all overrides are applied.
    ///
    /// # Examples
    /// ```ignore
    /// std::env::set_var("CONFSTORE__DATA_DIR", "/var/lib/agent");
    /// let settings = StoreSettings::new()?.validate()?;
    /// ```
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(Self::environment());

        let settings: Self = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    /// Applies additional overrides from file without validation.
    ///
    /// Merging order (later sources override earlier):
    /// 1. Current values
    /// 2. New configuration file
    /// 3. Latest environment variables (highest priority)
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let settings: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(Self::environment())
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Validates settings and returns the validated instance.
    ///
    /// # Errors
    /// - empty `data_dir`
    /// - empty file names, or file names containing a path separator
    /// - snapshot and key sharing one file
    pub fn validate(self) -> Result<Self> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Message("data_dir cannot be empty".into()).into());
        }
        validate_file_name(&self.config_file_name, "config_file_name")?;
        validate_file_name(&self.secret_file_name, "secret_file_name")?;
        if self.config_file_name == self.secret_file_name {
            return Err(ConfigError::Message(format!(
                "config_file_name and secret_file_name must differ (both {})",
                self.config_file_name
            ))
            .into());
        }
        Ok(self)
    }

    pub fn config_file_path(&self) -> PathBuf {
        self.data_dir.join(&self.config_file_name)
    }

    pub fn secret_file_path(&self) -> PathBuf {
        self.data_dir.join(&self.secret_file_name)
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .ignore_empty(true)
            .try_parsing(true)
    }
}

fn validate_file_name(
    name: &str,
    field: &str,
) -> Result<()> {
    if name.is_empty() {
        return Err(ConfigError::Message(format!("{} cannot be empty", field)).into());
    }
    let plain = name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && Path::new(name).components().count() == 1;
    if !plain {
        return Err(ConfigError::Message(format!(
            "{} must be a plain file name, got {}",
            field, name
        ))
        .into());
    }
    Ok(())
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}
fn default_config_file_name() -> String {
    DEFAULT_CONFIG_FILE_NAME.to_string()
}
fn default_secret_file_name() -> String {
    DEFAULT_SECRET_FILE_NAME.to_string()
}
