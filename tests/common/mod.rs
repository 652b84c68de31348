use std::path::Path;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Once;

use confstore::model::GaugeConfig;
use confstore::model::InstrumentationConfig;
use confstore::model::PluginDescriptor;
use confstore::model::PropertyValue;
use confstore::ConfigListener;
use confstore::ConfigStore;
use confstore::StoreSettings;

static LOGGER_INIT: Once = Once::new();

pub fn enable_logger() {
    LOGGER_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

pub fn plugin_descriptors() -> Vec<PluginDescriptor> {
    vec![
        PluginDescriptor::new("servlet")
            .with_transaction_types(["Web"])
            .with_property("captureRequestHeaders", PropertyValue::Bool(false)),
        PluginDescriptor::new("jdbc").with_property("stackTraceThresholdMillis", PropertyValue::Double(1000.0)),
    ]
}

pub fn settings(data_dir: &Path) -> StoreSettings {
    StoreSettings {
        data_dir: data_dir.to_path_buf(),
        ..Default::default()
    }
}

pub fn open_store(data_dir: &Path) -> ConfigStore {
    enable_logger();
    ConfigStore::open(&settings(data_dir), plugin_descriptors()).expect("open store")
}

pub fn instrumentation(transaction_type: &str) -> InstrumentationConfig {
    InstrumentationConfig {
        class_name: "com.example.Checkout".into(),
        method_name: "submit".into(),
        transaction_type: transaction_type.into(),
        ..Default::default()
    }
}

pub fn gauge(mbean_object_name: &str) -> GaugeConfig {
    GaugeConfig::new(mbean_object_name).with_attribute("Value", false)
}

pub fn counting_listener() -> (Arc<AtomicUsize>, Arc<dyn ConfigListener>) {
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    let listener: Arc<dyn ConfigListener> = Arc::new(move || {
        c.fetch_add(1, Ordering::SeqCst);
    });
    (count, listener)
}
