use std::sync::Once;

use lazy_static::lazy_static;
use prometheus::exponential_buckets;
use prometheus::HistogramOpts;
use prometheus::HistogramVec;
use prometheus::IntCounterVec;
use prometheus::Opts;
use prometheus::Registry;
use tracing::warn;

lazy_static! {
    pub static ref CONFIG_MUTATIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("config_mutations_total", "Successful configuration mutations"),
        &["section"]
    )
    .expect("metric can not be created");

    pub static ref CONFIG_CONFLICTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "config_conflicts_total",
            "Rejected configuration mutations (optimistic lock, not found, duplicate key)"
        ),
        &["section", "kind"]
    )
    .expect("metric can not be created");

    pub static ref CONFIG_PERSIST_DURATION_MS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "config_persist_duration_ms",
            "Histogram of durable snapshot write latency in ms"
        )
        .buckets(exponential_buckets(0.5, 2.0, 14).expect("valid bucket layout")),
        &["section"]
    )
    .expect("metric can not be created");

    pub static ref REGISTRY: Registry = Registry::new();
}

static REGISTER_DEFAULT: Once = Once::new();

/// Registers the store's collectors into `registry`
pub fn register_custom_metrics(registry: &Registry) {
    let collectors: [Box<dyn prometheus::core::Collector>; 3] = [
        Box::new(CONFIG_MUTATIONS_TOTAL.clone()),
        Box::new(CONFIG_CONFLICTS_TOTAL.clone()),
        Box::new(CONFIG_PERSIST_DURATION_MS.clone()),
    ];
    for collector in collectors {
        if let Err(e) = registry.register(collector) {
            warn!("collector can not be registered: {}", e);
        }
    }
}

/// Registers into the crate-wide [`REGISTRY`] once per process
pub(crate) fn init_default_registry() {
    REGISTER_DEFAULT.call_once(|| register_custom_metrics(&REGISTRY));
}

pub(crate) fn record_mutation(
    section: &str,
    persist_ms: f64,
) {
    CONFIG_MUTATIONS_TOTAL.with_label_values(&[section]).inc();
    CONFIG_PERSIST_DURATION_MS
        .with_label_values(&[section])
        .observe(persist_ms);
}

pub(crate) fn record_rejection(
    section: &str,
    kind: &str,
) {
    CONFIG_CONFLICTS_TOTAL.with_label_values(&[section, kind]).inc();
}
