use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::collection::appended;
use super::collection::find_by_version;
use super::collection::fresh_version;
use super::collection::key_taken;
use super::collection::removed;
use super::collection::replaced;
use super::collection::require_position;
use crate::metrics;
use crate::model::AdvancedConfig;
use crate::model::AlertConfig;
use crate::model::GaugeConfig;
use crate::model::GeneralConfig;
use crate::model::InstrumentationConfig;
use crate::model::PluginConfig;
use crate::model::PluginDescriptor;
use crate::model::PropertyValue;
use crate::model::SmtpConfig;
use crate::model::Snapshot;
use crate::model::StorageConfig;
use crate::model::UserInterfaceConfig;
use crate::model::UserRecordingConfig;
use crate::model::Version;
use crate::model::Versioned;
use crate::ConfigListener;
use crate::ConfigPersistence;
use crate::Error;
use crate::JsonConfigFile;
use crate::KeyProvider;
use crate::ListenerRegistry;
use crate::RandomKeyProvider;
use crate::Result;
use crate::SecretKey;
use crate::SecretKeyManager;
use crate::StoreError;
use crate::StoreSettings;

const GENERAL: &str = "general";
const USER_INTERFACE: &str = "user_interface";
const STORAGE: &str = "storage";
const SMTP: &str = "smtp";
const USER_RECORDING: &str = "user_recording";
const ADVANCED: &str = "advanced";
const PLUGIN: &str = "plugin";
const INSTRUMENTATION: &str = "instrumentation";
const GAUGE: &str = "gauge";
const ALERT: &str = "alert";

/// Single authority over the current configuration [`Snapshot`].
///
/// Getters never block. Mutations are serialized by one write lock covering
/// validation, snapshot construction, durable persistence and publication;
/// listeners are notified after the lock is released, on the writer's
/// thread, before the mutating call returns.
pub struct ConfigStore {
    persistence: Arc<dyn ConfigPersistence>,
    plugin_descriptors: Vec<PluginDescriptor>,
    current: ArcSwap<Snapshot>,
    write_lock: Mutex<()>,
    listeners: ListenerRegistry,
    secret: SecretKeyManager,
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("plugins", &self.plugin_descriptors.len())
            .field("listeners", &self.listeners)
            .field("secret", &self.secret)
            .finish()
    }
}

impl ConfigStore {
    /// Builds a store over injected collaborators.
    ///
    /// A snapshot that cannot be loaded is replaced by the persistence's
    /// default snapshot; start-up never fails on it.
    pub fn new(
        persistence: Arc<dyn ConfigPersistence>,
        key_provider: Arc<dyn KeyProvider>,
        secret_path: impl Into<PathBuf>,
        plugin_descriptors: Vec<PluginDescriptor>,
    ) -> Self {
        metrics::init_default_registry();

        let snapshot = match persistence.load() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("failed to load config, falling back to defaults: {}", e);
                persistence.default_snapshot()
            }
        };
        info!(
            "config store initialized with {} plugins, {} instrumentation, {} gauges, {} alerts",
            snapshot.plugin_configs().len(),
            snapshot.instrumentation_configs().len(),
            snapshot.gauge_configs().len(),
            snapshot.alert_configs().len()
        );

        Self {
            persistence,
            plugin_descriptors,
            current: ArcSwap::from_pointee(snapshot),
            write_lock: Mutex::new(()),
            listeners: ListenerRegistry::new(),
            secret: SecretKeyManager::new(secret_path, key_provider),
        }
    }

    /// Opens the JSON-file backed store described by `settings`
    pub fn open(
        settings: &StoreSettings,
        plugin_descriptors: Vec<PluginDescriptor>,
    ) -> Result<Self> {
        let settings = settings.clone().validate()?;
        let persistence = JsonConfigFile::new(settings.config_file_path(), plugin_descriptors.clone());
        Ok(Self::new(
            Arc::new(persistence),
            Arc::new(RandomKeyProvider),
            settings.secret_file_path(),
            plugin_descriptors,
        ))
    }

    //-----------------------------------------------------------
    // Reads

    /// Consistent handle on the whole current snapshot
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    pub fn plugin_descriptors(&self) -> &[PluginDescriptor] {
        &self.plugin_descriptors
    }

    pub fn get_general_config(&self) -> Versioned<GeneralConfig> {
        self.current.load().general_config().clone()
    }

    pub fn get_user_interface_config(&self) -> Versioned<UserInterfaceConfig> {
        self.current.load().user_interface_config().clone()
    }

    pub fn get_storage_config(&self) -> Versioned<StorageConfig> {
        self.current.load().storage_config().clone()
    }

    pub fn get_smtp_config(&self) -> Versioned<SmtpConfig> {
        self.current.load().smtp_config().clone()
    }

    pub fn get_user_recording_config(&self) -> Versioned<UserRecordingConfig> {
        self.current.load().user_recording_config().clone()
    }

    pub fn get_advanced_config(&self) -> Versioned<AdvancedConfig> {
        self.current.load().advanced_config().clone()
    }

    pub fn get_plugin_config(
        &self,
        plugin_id: &str,
    ) -> Option<Versioned<PluginConfig>> {
        self.current
            .load()
            .plugin_configs()
            .iter()
            .find(|p| p.id == plugin_id)
            .cloned()
    }

    pub fn get_plugin_configs(&self) -> Vec<Versioned<PluginConfig>> {
        self.current.load().plugin_configs().to_vec()
    }

    pub fn get_instrumentation_configs(&self) -> Vec<Versioned<InstrumentationConfig>> {
        self.current.load().instrumentation_configs().to_vec()
    }

    pub fn get_instrumentation_config(
        &self,
        version: &Version,
    ) -> Option<Versioned<InstrumentationConfig>> {
        find_by_version(self.current.load().instrumentation_configs(), version).cloned()
    }

    pub fn get_gauge_configs(&self) -> Vec<Versioned<GaugeConfig>> {
        self.current.load().gauge_configs().to_vec()
    }

    pub fn get_gauge_config(
        &self,
        version: &Version,
    ) -> Option<Versioned<GaugeConfig>> {
        find_by_version(self.current.load().gauge_configs(), version).cloned()
    }

    pub fn get_alert_configs(&self) -> Vec<Versioned<AlertConfig>> {
        self.current.load().alert_configs().to_vec()
    }

    pub fn get_alert_config(
        &self,
        version: &Version,
    ) -> Option<Versioned<AlertConfig>> {
        find_by_version(self.current.load().alert_configs(), version).cloned()
    }

    /// General section's value when set, otherwise inferred from the
    /// current instrumentation rules
    pub fn get_default_transaction_type(&self) -> String {
        let snapshot = self.current.load();
        let configured = &snapshot.general_config().default_transaction_type;
        if !configured.is_empty() {
            return configured.clone();
        }
        debug!("no default transaction type configured, inferring one");
        self.persistence
            .infer_default_transaction_type(snapshot.instrumentation_configs())
    }

    /// Plugin-declared transaction types followed by those of instrumentation
    /// rules, in first-seen order without duplicates
    pub fn get_all_transaction_types(&self) -> Vec<String> {
        let snapshot = self.current.load();
        let mut seen = HashSet::new();
        self.plugin_descriptors
            .iter()
            .flat_map(|d| d.transaction_types.iter())
            .chain(
                snapshot
                    .instrumentation_configs()
                    .iter()
                    .map(|c| &c.transaction_type)
                    .filter(|t| !t.is_empty()),
            )
            .filter(|t| seen.insert(t.as_str()))
            .cloned()
            .collect()
    }

    /// Returns the store's secret key, creating the key file on first use
    pub fn get_secret_key(&self) -> Result<SecretKey> {
        self.secret.secret_key()
    }

    //-----------------------------------------------------------
    // Listeners

    /// Notified after every successful mutation
    pub fn add_listener(
        &self,
        listener: Arc<dyn ConfigListener>,
    ) {
        self.listeners.add_listener(listener);
    }

    /// Notified after mutations of `plugin_id`'s config, and whenever the
    /// agent is switched on or off
    pub fn add_keyed_listener(
        &self,
        plugin_id: impl Into<String>,
        listener: Arc<dyn ConfigListener>,
    ) {
        self.listeners.add_keyed_listener(plugin_id, listener);
    }

    //-----------------------------------------------------------
    // Sections

    /// Updates the general section.
    ///
    /// Besides the global listeners, flipping `enabled` notifies every
    /// keyed listener.
    pub fn update_general_config(
        &self,
        value: GeneralConfig,
        prior_version: &Version,
    ) -> Result<Version> {
        let (version, toggled) = self.mutate(GENERAL, |current| {
            let prior = current.general_config();
            check_versions_equal(GENERAL, prior.version(), prior_version)?;
            let toggled = prior.enabled != value.enabled;
            let version = fresh_version(prior_version);
            let updated = current
                .clone()
                .with_general_config(Versioned::with_version(value, version.clone()));
            Ok((updated, (version, toggled)))
        })?;

        self.listeners.notify_global();
        if toggled {
            debug!("agent enabled flag changed, notifying all plugin listeners");
            self.listeners.notify_all_keyed();
        }
        Ok(version)
    }

    pub fn update_user_interface_config(
        &self,
        value: UserInterfaceConfig,
        prior_version: &Version,
    ) -> Result<Version> {
        self.update_section(
            USER_INTERFACE,
            value,
            prior_version,
            Snapshot::user_interface_config,
            Snapshot::with_user_interface_config,
            |ui| {
                ensure_finite(
                    USER_INTERFACE,
                    "default_percentiles",
                    ui.default_percentiles.iter().copied(),
                )
            },
        )
    }

    pub fn update_storage_config(
        &self,
        value: StorageConfig,
        prior_version: &Version,
    ) -> Result<Version> {
        self.update_section(
            STORAGE,
            value,
            prior_version,
            Snapshot::storage_config,
            Snapshot::with_storage_config,
            |_| Ok(()),
        )
    }

    pub fn update_smtp_config(
        &self,
        value: SmtpConfig,
        prior_version: &Version,
    ) -> Result<Version> {
        self.update_section(
            SMTP,
            value,
            prior_version,
            Snapshot::smtp_config,
            Snapshot::with_smtp_config,
            |_| Ok(()),
        )
    }

    pub fn update_user_recording_config(
        &self,
        value: UserRecordingConfig,
        prior_version: &Version,
    ) -> Result<Version> {
        self.update_section(
            USER_RECORDING,
            value,
            prior_version,
            Snapshot::user_recording_config,
            Snapshot::with_user_recording_config,
            |_| Ok(()),
        )
    }

    pub fn update_advanced_config(
        &self,
        value: AdvancedConfig,
        prior_version: &Version,
    ) -> Result<Version> {
        self.update_section(
            ADVANCED,
            value,
            prior_version,
            Snapshot::advanced_config,
            Snapshot::with_advanced_config,
            |_| Ok(()),
        )
    }

    //-----------------------------------------------------------
    // Plugins (closed set, update only)

    /// Updates the config of a known plugin, located by id and checked
    /// against `prior_version`. The stored id is always `plugin_id`.
    ///
    /// Properties are aligned with the plugin's descriptor the same way a
    /// load does: undeclared ones are dropped, mistyped ones reset to the
    /// default. Non-finite numbers are rejected.
    pub fn update_plugin_config(
        &self,
        plugin_id: &str,
        value: PluginConfig,
        prior_version: &Version,
    ) -> Result<Version> {
        let version = self.mutate(PLUGIN, |current| {
            let plugins = current.plugin_configs();
            let index = plugins.iter().position(|p| p.id == plugin_id).ok_or_else(|| {
                Error::from(StoreError::NotFound {
                    section: PLUGIN,
                    key: plugin_id.to_string(),
                })
            })?;
            check_versions_equal(PLUGIN, plugins[index].version(), prior_version)?;

            let value = PluginConfig {
                id: plugin_id.to_string(),
                ..value
            };
            let value = match self.plugin_descriptors.iter().find(|d| d.id == plugin_id) {
                Some(descriptor) => descriptor.reconcile(&value),
                None => value,
            };
            ensure_finite(
                PLUGIN,
                "properties",
                value.properties.values().filter_map(|v| match v {
                    PropertyValue::Double(d) => Some(*d),
                    _ => None,
                }),
            )?;

            let version = fresh_version(prior_version);
            let mut updated = plugins.to_vec();
            updated[index] = Versioned::with_version(value, version.clone());
            Ok((current.clone().with_plugin_configs(updated), version))
        })?;

        self.listeners.notify_keyed(plugin_id);
        self.listeners.notify_global();
        Ok(version)
    }

    //-----------------------------------------------------------
    // Instrumentation

    pub fn insert_instrumentation_config(
        &self,
        value: InstrumentationConfig,
    ) -> Result<Version> {
        self.insert_item(
            INSTRUMENTATION,
            value,
            Snapshot::instrumentation_configs,
            Snapshot::with_instrumentation_configs,
            |_, _| Ok(()),
        )
    }

    pub fn update_instrumentation_config(
        &self,
        value: InstrumentationConfig,
        prior_version: &Version,
    ) -> Result<Version> {
        self.update_item(
            INSTRUMENTATION,
            value,
            prior_version,
            Snapshot::instrumentation_configs,
            Snapshot::with_instrumentation_configs,
            |_, _| Ok(()),
        )
    }

    pub fn delete_instrumentation_config(
        &self,
        prior_version: &Version,
    ) -> Result<()> {
        self.delete_item(
            INSTRUMENTATION,
            prior_version,
            Snapshot::instrumentation_configs,
            Snapshot::with_instrumentation_configs,
        )
    }

    //-----------------------------------------------------------
    // Gauges (unique by mbean object name)

    /// Appends a gauge; fails with `DuplicateKey` when its mbean object
    /// name is already in use
    pub fn insert_gauge_config(
        &self,
        value: GaugeConfig,
    ) -> Result<Version> {
        self.insert_item(
            GAUGE,
            value,
            Snapshot::gauge_configs,
            Snapshot::with_gauge_configs,
            |gauges, gauge| ensure_unique_gauge(gauges, gauge, None),
        )
    }

    /// Replaces the gauge carrying `prior_version`; keeping its own mbean
    /// object name is allowed, taking another entry's is not
    pub fn update_gauge_config(
        &self,
        value: GaugeConfig,
        prior_version: &Version,
    ) -> Result<Version> {
        self.update_item(
            GAUGE,
            value,
            prior_version,
            Snapshot::gauge_configs,
            Snapshot::with_gauge_configs,
            |gauges, gauge| ensure_unique_gauge(gauges, gauge, Some(prior_version)),
        )
    }

    pub fn delete_gauge_config(
        &self,
        prior_version: &Version,
    ) -> Result<()> {
        self.delete_item(
            GAUGE,
            prior_version,
            Snapshot::gauge_configs,
            Snapshot::with_gauge_configs,
        )
    }

    //-----------------------------------------------------------
    // Alerts

    pub fn insert_alert_config(
        &self,
        value: AlertConfig,
    ) -> Result<Version> {
        self.insert_item(
            ALERT,
            value,
            Snapshot::alert_configs,
            Snapshot::with_alert_configs,
            |_, alert| ensure_finite(ALERT, "percentile", [alert.percentile]),
        )
    }

    pub fn update_alert_config(
        &self,
        value: AlertConfig,
        prior_version: &Version,
    ) -> Result<Version> {
        self.update_item(
            ALERT,
            value,
            prior_version,
            Snapshot::alert_configs,
            Snapshot::with_alert_configs,
            |_, alert| ensure_finite(ALERT, "percentile", [alert.percentile]),
        )
    }

    pub fn delete_alert_config(
        &self,
        prior_version: &Version,
    ) -> Result<()> {
        self.delete_item(
            ALERT,
            prior_version,
            Snapshot::alert_configs,
            Snapshot::with_alert_configs,
        )
    }

    //-----------------------------------------------------------
    // Test support

    /// Deletes persisted state, reloads defaults and notifies every
    /// listener, global and keyed.
    #[doc(hidden)]
    pub fn reset_all(&self) -> Result<()> {
        {
            let _guard = self.write_lock.lock();
            self.persistence.delete()?;
            let snapshot = match self.persistence.load() {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    error!("failed to reload config after reset, using defaults: {}", e);
                    self.persistence.default_snapshot()
                }
            };
            self.current.store(Arc::new(snapshot));
            info!("config reset to defaults");
        }
        self.listeners.notify_global();
        self.listeners.notify_all_keyed();
        Ok(())
    }

    //-----------------------------------------------------------
    // Check-and-swap machinery

    /// Runs `derive` against the current snapshot under the write lock,
    /// persists its result and publishes it. Nothing is published when
    /// `derive` or the durable write fails.
    fn mutate<R>(
        &self,
        section: &'static str,
        derive: impl FnOnce(&Snapshot) -> Result<(Snapshot, R)>,
    ) -> Result<R> {
        let _guard = self.write_lock.lock();
        let current = self.current.load_full();

        let (updated, out) = derive(current.as_ref()).map_err(|e| {
            record_rejection(section, &e);
            e
        })?;

        let started = Instant::now();
        if let Err(e) = self.persistence.write(&updated) {
            error!("failed to persist {} config: {}", section, e);
            return Err(e);
        }
        metrics::record_mutation(section, started.elapsed().as_secs_f64() * 1000.0);

        self.current.store(Arc::new(updated));
        Ok(out)
    }

    fn update_section<T: Clone>(
        &self,
        section: &'static str,
        value: T,
        prior_version: &Version,
        get: fn(&Snapshot) -> &Versioned<T>,
        set: fn(Snapshot, Versioned<T>) -> Snapshot,
        validate: impl FnOnce(&T) -> Result<()>,
    ) -> Result<Version> {
        let version = self.mutate(section, |current| {
            check_versions_equal(section, get(current).version(), prior_version)?;
            validate(&value)?;
            let version = fresh_version(prior_version);
            let updated = set(current.clone(), Versioned::with_version(value, version.clone()));
            Ok((updated, version))
        })?;
        info!("updated {} config, version {}", section, version);

        self.listeners.notify_global();
        Ok(version)
    }

    fn insert_item<T: Clone>(
        &self,
        section: &'static str,
        value: T,
        get: fn(&Snapshot) -> &[Versioned<T>],
        set: fn(Snapshot, Vec<Versioned<T>>) -> Snapshot,
        validate: impl FnOnce(&[Versioned<T>], &T) -> Result<()>,
    ) -> Result<Version> {
        let version = self.mutate(section, |current| {
            let items = get(current);
            validate(items, &value)?;
            let item = Versioned::new(value);
            let version = item.version().clone();
            Ok((set(current.clone(), appended(items, item)), version))
        })?;
        info!("inserted {} config, version {}", section, version);

        self.listeners.notify_global();
        Ok(version)
    }

    fn update_item<T: Clone>(
        &self,
        section: &'static str,
        value: T,
        prior_version: &Version,
        get: fn(&Snapshot) -> &[Versioned<T>],
        set: fn(Snapshot, Vec<Versioned<T>>) -> Snapshot,
        validate: impl FnOnce(&[Versioned<T>], &T) -> Result<()>,
    ) -> Result<Version> {
        let version = self.mutate(section, |current| {
            let items = get(current);
            require_position(section, items, prior_version)?;
            validate(items, &value)?;
            let version = fresh_version(prior_version);
            let item = Versioned::with_version(value, version.clone());
            Ok((set(current.clone(), replaced(section, items, prior_version, item)?), version))
        })?;
        info!(
            "updated {} config, version {} -> {}",
            section, prior_version, version
        );

        self.listeners.notify_global();
        Ok(version)
    }

    fn delete_item<T: Clone>(
        &self,
        section: &'static str,
        prior_version: &Version,
        get: fn(&Snapshot) -> &[Versioned<T>],
        set: fn(Snapshot, Vec<Versioned<T>>) -> Snapshot,
    ) -> Result<()> {
        self.mutate(section, |current| {
            let items = removed(section, get(current), prior_version)?;
            Ok((set(current.clone(), items), ()))
        })?;
        info!("deleted {} config, version {}", section, prior_version);

        self.listeners.notify_global();
        Ok(())
    }
}

fn check_versions_equal(
    section: &'static str,
    current: &Version,
    prior_version: &Version,
) -> Result<()> {
    if current != prior_version {
        return Err(StoreError::OptimisticLock {
            section,
            expected: prior_version.to_string(),
            actual: current.to_string(),
        }
        .into());
    }
    Ok(())
}

fn ensure_unique_gauge(
    gauges: &[Versioned<GaugeConfig>],
    gauge: &GaugeConfig,
    excluding: Option<&Version>,
) -> Result<()> {
    let name = gauge.mbean_object_name.as_str();
    if key_taken(gauges, |g| g.mbean_object_name.as_str(), name, excluding) {
        return Err(StoreError::DuplicateKey {
            mbean_object_name: name.to_string(),
        }
        .into());
    }
    Ok(())
}

/// JSON has no encoding for NaN or infinities; they would not survive a reload
fn ensure_finite(
    section: &'static str,
    field: &str,
    values: impl IntoIterator<Item = f64>,
) -> Result<()> {
    if let Some(bad) = values.into_iter().find(|v| !v.is_finite()) {
        return Err(StoreError::InvalidValue {
            section,
            reason: format!("{} must be finite, got {}", field, bad),
        }
        .into());
    }
    Ok(())
}

fn record_rejection(
    section: &'static str,
    e: &Error,
) {
    let kind = match e {
        Error::Store(StoreError::OptimisticLock { .. }) => "optimistic_lock",
        Error::Store(StoreError::NotFound { .. }) => "not_found",
        Error::Store(StoreError::DuplicateKey { .. }) => "duplicate_key",
        Error::Store(StoreError::InvalidValue { .. }) => "invalid_value",
        _ => "other",
    };
    warn!("rejected {} mutation: {}", section, e);
    metrics::record_rejection(section, kind);
}
