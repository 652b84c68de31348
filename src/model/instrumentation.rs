use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureKind {
    Metric,
    TraceEntry,
    #[default]
    Transaction,
    Other,
}

/// One user-defined instrumentation rule
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentationConfig {
    pub class_name: String,
    pub method_name: String,
    pub method_parameter_types: Vec<String>,
    pub method_return_type: String,
    pub capture_kind: CaptureKind,
    pub timer_name: String,
    pub trace_entry_template: String,
    /// Empty when the rule does not start transactions
    pub transaction_type: String,
    pub transaction_name_template: String,
    /// Plugin property gating this rule, empty for always-on
    pub enabled_property: String,
    pub trace_store_threshold_millis: Option<u32>,
}
