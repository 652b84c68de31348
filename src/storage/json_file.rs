use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::info;
use tracing::warn;

use super::ConfigPersistence;
use crate::constants::FALLBACK_TRANSACTION_TYPE;
use crate::file_io::read_if_exists;
use crate::file_io::remove_if_exists;
use crate::file_io::write_atomically;
use crate::model::InstrumentationConfig;
use crate::model::PluginConfig;
use crate::model::PluginDescriptor;
use crate::model::Snapshot;
use crate::model::Versioned;
use crate::Result;
use crate::StorageError;

/// Snapshot persisted as one pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonConfigFile {
    path: PathBuf,
    plugin_descriptors: Vec<PluginDescriptor>,
}

impl JsonConfigFile {
    pub fn new(
        path: impl Into<PathBuf>,
        plugin_descriptors: Vec<PluginDescriptor>,
    ) -> Self {
        Self {
            path: path.into(),
            plugin_descriptors,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// One plugin config per descriptor, in catalog order. Stored entries
    /// keep their version and are aligned with their descriptor; entries of
    /// unknown plugins are dropped.
    fn reconcile_plugins(
        &self,
        stored: &[Versioned<PluginConfig>],
    ) -> Vec<Versioned<PluginConfig>> {
        for orphan in stored
            .iter()
            .filter(|p| !self.plugin_descriptors.iter().any(|d| d.id == p.id))
        {
            warn!("dropping config of unknown plugin: {}", orphan.id);
        }

        self.plugin_descriptors
            .iter()
            .map(|descriptor| match stored.iter().find(|p| p.id == descriptor.id) {
                Some(p) => Versioned::with_version(descriptor.reconcile(p), p.version().clone()),
                None => Versioned::new(descriptor.default_config()),
            })
            .collect()
    }
}

impl ConfigPersistence for JsonConfigFile {
    fn load(&self) -> Result<Snapshot> {
        let bytes = match read_if_exists(&self.path)? {
            Some(bytes) => bytes,
            None => {
                info!("no config file at {:?}, using defaults", self.path);
                return Ok(self.default_snapshot());
            }
        };

        let snapshot: Snapshot =
            serde_json::from_slice(&bytes).map_err(|e| StorageError::DataCorruption {
                location: format!("{}: {}", self.path.display(), e),
            })?;
        debug!("loaded config from {:?}", self.path);

        let plugins = self.reconcile_plugins(snapshot.plugin_configs());
        Ok(snapshot.with_plugin_configs(plugins))
    }

    fn write(
        &self,
        snapshot: &Snapshot,
    ) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        write_atomically(&self.path, &bytes)?;
        debug!("persisted config ({} bytes) to {:?}", bytes.len(), self.path);
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        remove_if_exists(&self.path)?;
        info!("deleted config file {:?}", self.path);
        Ok(())
    }

    fn default_snapshot(&self) -> Snapshot {
        Snapshot::default_for(&self.plugin_descriptors)
    }

    fn infer_default_transaction_type(
        &self,
        instrumentation: &[Versioned<InstrumentationConfig>],
    ) -> String {
        self.plugin_descriptors
            .iter()
            .flat_map(|d| d.transaction_types.iter())
            .chain(instrumentation.iter().map(|c| &c.transaction_type))
            .find(|t| !t.is_empty())
            .cloned()
            .unwrap_or_else(|| FALLBACK_TRANSACTION_TYPE.to_string())
    }
}
