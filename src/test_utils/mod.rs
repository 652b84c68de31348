//! Fixtures shared by unit tests across modules
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::model::AlertConfig;
use crate::model::CaptureKind;
use crate::model::GaugeConfig;
use crate::model::InstrumentationConfig;
use crate::model::PluginDescriptor;
use crate::model::PropertyValue;
use crate::ConfigListener;

/// Catalog of two plugins: `servlet` declaring the "Web" transaction type,
/// and `jdbc` declaring none
pub(crate) fn plugin_descriptors() -> Vec<PluginDescriptor> {
    vec![
        PluginDescriptor::new("servlet")
            .with_transaction_types(["Web"])
            .with_property("captureSessionAttributes", PropertyValue::String(String::new()))
            .with_property("captureRequestHeaders", PropertyValue::Bool(false)),
        PluginDescriptor::new("jdbc").with_property("stackTraceThresholdMillis", PropertyValue::Double(1000.0)),
    ]
}

pub(crate) fn instrumentation(transaction_type: &str) -> InstrumentationConfig {
    InstrumentationConfig {
        class_name: "com.example.OrderService".into(),
        method_name: "placeOrder".into(),
        method_parameter_types: vec!["java.lang.String".into()],
        method_return_type: "void".into(),
        capture_kind: CaptureKind::Transaction,
        timer_name: "place order".into(),
        transaction_type: transaction_type.into(),
        transaction_name_template: "order {0}".into(),
        ..Default::default()
    }
}

pub(crate) fn gauge(mbean_object_name: &str) -> GaugeConfig {
    GaugeConfig::new(mbean_object_name).with_attribute("Value", false)
}

pub(crate) fn alert(transaction_type: &str) -> AlertConfig {
    AlertConfig {
        transaction_type: transaction_type.into(),
        percentile: 95.0,
        time_period_minutes: 5,
        threshold_millis: 2000,
        min_transaction_count: 10,
        email_addresses: vec!["ops@example.com".into()],
    }
}

/// Listener counting its invocations
pub(crate) fn counting_listener() -> (Arc<AtomicUsize>, Arc<dyn ConfigListener>) {
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    let listener: Arc<dyn ConfigListener> = Arc::new(move || {
        c.fetch_add(1, Ordering::SeqCst);
    });
    (count, listener)
}
