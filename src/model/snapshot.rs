//! Immutable aggregate of the whole configuration at one point in time.
//!
//! A published [`Snapshot`] is never mutated. Every successful write derives
//! a new snapshot through one of the `with_*` builders, which replace exactly
//! one section or collection and leave everything else untouched.

use serde::Deserialize;
use serde::Serialize;

use super::AdvancedConfig;
use super::AlertConfig;
use super::GaugeConfig;
use super::GeneralConfig;
use super::InstrumentationConfig;
use super::PluginConfig;
use super::PluginDescriptor;
use super::SmtpConfig;
use super::StorageConfig;
use super::UserInterfaceConfig;
use super::UserRecordingConfig;
use super::Versioned;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    general: Versioned<GeneralConfig>,
    user_interface: Versioned<UserInterfaceConfig>,
    storage: Versioned<StorageConfig>,
    smtp: Versioned<SmtpConfig>,
    user_recording: Versioned<UserRecordingConfig>,
    advanced: Versioned<AdvancedConfig>,
    plugins: Vec<Versioned<PluginConfig>>,
    instrumentation: Vec<Versioned<InstrumentationConfig>>,
    gauges: Vec<Versioned<GaugeConfig>>,
    alerts: Vec<Versioned<AlertConfig>>,
}

impl Snapshot {
    /// Default snapshot with one default plugin config per descriptor
    pub fn default_for(descriptors: &[PluginDescriptor]) -> Self {
        Snapshot {
            plugins: descriptors
                .iter()
                .map(|d| Versioned::new(d.default_config()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn general_config(&self) -> &Versioned<GeneralConfig> {
        &self.general
    }

    pub fn user_interface_config(&self) -> &Versioned<UserInterfaceConfig> {
        &self.user_interface
    }

    pub fn storage_config(&self) -> &Versioned<StorageConfig> {
        &self.storage
    }

    pub fn smtp_config(&self) -> &Versioned<SmtpConfig> {
        &self.smtp
    }

    pub fn user_recording_config(&self) -> &Versioned<UserRecordingConfig> {
        &self.user_recording
    }

    pub fn advanced_config(&self) -> &Versioned<AdvancedConfig> {
        &self.advanced
    }

    pub fn plugin_configs(&self) -> &[Versioned<PluginConfig>] {
        &self.plugins
    }

    pub fn instrumentation_configs(&self) -> &[Versioned<InstrumentationConfig>] {
        &self.instrumentation
    }

    pub fn gauge_configs(&self) -> &[Versioned<GaugeConfig>] {
        &self.gauges
    }

    pub fn alert_configs(&self) -> &[Versioned<AlertConfig>] {
        &self.alerts
    }

    pub fn with_general_config(
        self,
        general: Versioned<GeneralConfig>,
    ) -> Self {
        Snapshot { general, ..self }
    }

    pub fn with_user_interface_config(
        self,
        user_interface: Versioned<UserInterfaceConfig>,
    ) -> Self {
        Snapshot {
            user_interface,
            ..self
        }
    }

    pub fn with_storage_config(
        self,
        storage: Versioned<StorageConfig>,
    ) -> Self {
        Snapshot { storage, ..self }
    }

    pub fn with_smtp_config(
        self,
        smtp: Versioned<SmtpConfig>,
    ) -> Self {
        Snapshot { smtp, ..self }
    }

    pub fn with_user_recording_config(
        self,
        user_recording: Versioned<UserRecordingConfig>,
    ) -> Self {
        Snapshot {
            user_recording,
            ..self
        }
    }

    pub fn with_advanced_config(
        self,
        advanced: Versioned<AdvancedConfig>,
    ) -> Self {
        Snapshot { advanced, ..self }
    }

    pub fn with_plugin_configs(
        self,
        plugins: Vec<Versioned<PluginConfig>>,
    ) -> Self {
        Snapshot { plugins, ..self }
    }

    pub fn with_instrumentation_configs(
        self,
        instrumentation: Vec<Versioned<InstrumentationConfig>>,
    ) -> Self {
        Snapshot {
            instrumentation,
            ..self
        }
    }

    pub fn with_gauge_configs(
        self,
        gauges: Vec<Versioned<GaugeConfig>>,
    ) -> Self {
        Snapshot { gauges, ..self }
    }

    pub fn with_alert_configs(
        self,
        alerts: Vec<Versioned<AlertConfig>>,
    ) -> Self {
        Snapshot { alerts, ..self }
    }
}
