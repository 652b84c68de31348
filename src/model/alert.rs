use serde::Deserialize;
use serde::Serialize;

/// Fires when the given percentile of a transaction type exceeds a threshold
/// over a trailing time period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub transaction_type: String,
    pub percentile: f64,
    pub time_period_minutes: u32,
    pub threshold_millis: u32,
    pub min_transaction_count: u32,
    pub email_addresses: Vec<String>,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            transaction_type: String::new(),
            percentile: 95.0,
            time_period_minutes: 15,
            threshold_millis: 1000,
            min_transaction_count: 1,
            email_addresses: Vec::new(),
        }
    }
}
