//! The six singleton configuration sections.
//!
//! Every field has a default so partially written snapshot files still load.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Master switch of the agent
    pub enabled: bool,

    /// Traces slower than this are stored (unit: milliseconds)
    pub trace_store_threshold_millis: u32,

    /// Stack trace sampling interval (unit: milliseconds)
    pub profiling_interval_millis: u32,

    /// Empty means "infer from plugins and instrumentation"
    pub default_transaction_type: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            trace_store_threshold_millis: 1000,
            profiling_interval_millis: 1000,
            default_transaction_type: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInterfaceConfig {
    pub port: u16,
    pub default_percentiles: Vec<f64>,
    pub session_timeout_minutes: u32,
}

impl Default for UserInterfaceConfig {
    fn default() -> Self {
        Self {
            port: 4000,
            default_percentiles: vec![50.0, 95.0, 99.0],
            session_timeout_minutes: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub aggregate_expiration_hours: u32,
    pub trace_expiration_hours: u32,
    pub capped_database_size_mb: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            aggregate_expiration_hours: 24 * 7,
            trace_expiration_hours: 24 * 7,
            capped_database_size_mb: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub from_email_address: String,
    pub from_display_name: String,
    pub host: String,
    pub port: Option<u16>,
    pub ssl: bool,
    pub username: String,
    /// Encrypted with the store's secret key, never plain text
    pub encrypted_password: String,
    pub additional_properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRecordingConfig {
    pub enabled: bool,
    pub user: String,
    pub profile_interval_millis: u32,
}

impl Default for UserRecordingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            user: String::new(),
            profile_interval_millis: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedConfig {
    pub timer_wrapper_methods: bool,
    pub weaving_timer: bool,
    pub immediate_partial_store_threshold_seconds: u32,
    pub max_aggregate_transactions_per_transaction_type: u32,
    pub max_aggregate_queries_per_query_type: u32,
    pub max_trace_entries_per_transaction: u32,
    pub max_stack_trace_samples_per_transaction: u32,
    pub capture_thread_info: bool,
    pub capture_gc_info: bool,
    pub mbean_gauge_notification: bool,
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            timer_wrapper_methods: false,
            weaving_timer: false,
            immediate_partial_store_threshold_seconds: 60,
            max_aggregate_transactions_per_transaction_type: 500,
            max_aggregate_queries_per_query_type: 500,
            max_trace_entries_per_transaction: 2000,
            max_stack_trace_samples_per_transaction: 10000,
            capture_thread_info: true,
            capture_gc_info: true,
            mbean_gauge_notification: false,
        }
    }
}
