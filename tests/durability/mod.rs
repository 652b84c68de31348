use confstore::model::AlertConfig;
use confstore::model::GeneralConfig;
use confstore::model::PropertyValue;
use confstore::model::SmtpConfig;
use confstore::model::UserInterfaceConfig;
use confstore::ConfigStore;
use confstore::StoreSettings;
use tempfile::tempdir;

use crate::common::gauge;
use crate::common::instrumentation;
use crate::common::open_store;
use crate::common::plugin_descriptors;
use crate::common::settings;

#[test]
fn test_fresh_data_dir_starts_from_defaults() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path());

    assert!(store.get_general_config().enabled);
    assert_eq!(store.get_plugin_configs().len(), 2);
    assert_eq!(
        store.get_plugin_config("jdbc").unwrap().property("stackTraceThresholdMillis"),
        Some(&PropertyValue::Double(1000.0))
    );
    assert!(store.get_gauge_configs().is_empty());
    assert_eq!(store.get_default_transaction_type(), "Web");
}

#[test]
fn test_mutations_survive_reopen() {
    let dir = tempdir().unwrap();
    let (general_version, gauge_version, rule_version) = {
        let store = open_store(dir.path());
        let general = store.get_general_config();
        let general_version = store
            .update_general_config(
                GeneralConfig {
                    enabled: false,
                    ..general.value.clone()
                },
                general.version(),
            )
            .unwrap();
        let smtp = store.get_smtp_config();
        store
            .update_smtp_config(
                SmtpConfig {
                    host: "mail.example.com".into(),
                    ..smtp.value.clone()
                },
                smtp.version(),
            )
            .unwrap();
        let gauge_version = store.insert_gauge_config(gauge("java.lang:type=Memory")).unwrap();
        let rule_version = store.insert_instrumentation_config(instrumentation("Batch")).unwrap();
        (general_version, gauge_version, rule_version)
    };

    let reopened = open_store(dir.path());

    let general = reopened.get_general_config();
    assert!(!general.enabled);
    assert_eq!(general.version(), &general_version);
    assert_eq!(reopened.get_smtp_config().host, "mail.example.com");
    assert_eq!(
        reopened.get_gauge_config(&gauge_version).unwrap().mbean_object_name,
        "java.lang:type=Memory"
    );
    assert_eq!(
        reopened.get_instrumentation_config(&rule_version).unwrap().transaction_type,
        "Batch"
    );
    assert_eq!(reopened.get_all_transaction_types(), vec!["Web", "Batch"]);
}

#[test]
fn test_failed_write_is_not_visible_after_reopen() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path());
    store.insert_gauge_config(gauge("a:type=One")).unwrap();

    let err = store.insert_gauge_config(gauge("a:type=One")).unwrap_err();
    assert!(err.is_duplicate_key());

    let reopened = open_store(dir.path());
    assert_eq!(reopened.get_gauge_configs().len(), 1);
}

#[test]
fn test_corrupt_file_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let settings = settings(dir.path());
    std::fs::write(settings.config_file_path(), b"not json at all").unwrap();

    let store = ConfigStore::open(&settings, plugin_descriptors()).unwrap();

    assert!(store.get_general_config().enabled);
    assert_eq!(store.get_plugin_configs().len(), 2);
}

#[test]
fn test_reset_all_restores_defaults() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path());
    store.insert_gauge_config(gauge("a:type=One")).unwrap();
    assert!(settings(dir.path()).config_file_path().exists());

    store.reset_all().unwrap();

    assert!(store.get_gauge_configs().is_empty());
    assert!(!settings(dir.path()).config_file_path().exists());
}

#[test]
fn test_open_rejects_invalid_settings() {
    let dir = tempdir().unwrap();
    let settings = StoreSettings {
        data_dir: dir.path().to_path_buf(),
        config_file_name: "nested/config.json".into(),
        ..Default::default()
    };

    assert!(ConfigStore::open(&settings, plugin_descriptors()).is_err());
}

#[test]
fn test_secret_key_is_stable_across_reopen() {
    let dir = tempdir().unwrap();
    let first = open_store(dir.path()).get_secret_key().unwrap();
    let second = open_store(dir.path()).get_secret_key().unwrap();

    assert_eq!(first.encoded().len(), 16);
    assert_eq!(first, second);
    assert!(settings(dir.path()).secret_file_path().exists());
}

#[test]
fn test_non_finite_numbers_never_reach_disk() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path());

    let err = store
        .insert_alert_config(AlertConfig {
            transaction_type: "Web".into(),
            percentile: f64::NAN,
            ..Default::default()
        })
        .unwrap_err();
    assert!(err.is_invalid_value());

    let ui = store.get_user_interface_config();
    let err = store
        .update_user_interface_config(
            UserInterfaceConfig {
                default_percentiles: vec![f64::INFINITY],
                ..ui.value.clone()
            },
            ui.version(),
        )
        .unwrap_err();
    assert!(err.is_invalid_value());

    let jdbc = store.get_plugin_config("jdbc").unwrap();
    let mut value = jdbc.value.clone();
    value
        .properties
        .insert("stackTraceThresholdMillis".into(), PropertyValue::Double(f64::NEG_INFINITY));
    assert!(store
        .update_plugin_config("jdbc", value, jdbc.version())
        .unwrap_err()
        .is_invalid_value());

    // an unrelated change afterwards must still survive a restart
    let general = store.get_general_config();
    store
        .update_general_config(
            GeneralConfig {
                trace_store_threshold_millis: 7,
                ..general.value.clone()
            },
            general.version(),
        )
        .unwrap();

    let reopened = open_store(dir.path());
    assert_eq!(reopened.get_general_config().trace_store_threshold_millis, 7);
    assert!(reopened.get_alert_configs().is_empty());
    assert_eq!(*reopened.snapshot(), *store.snapshot());
}

#[test]
fn test_plugin_properties_round_trip_after_reopen() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path());
    let servlet = store.get_plugin_config("servlet").unwrap();
    let mut value = servlet.value.clone();
    // declared as a bool
    value
        .properties
        .insert("captureRequestHeaders".into(), PropertyValue::String("yes".into()));
    value.properties.insert("bogus".into(), PropertyValue::Double(1.0));
    store
        .update_plugin_config("servlet", value, servlet.version())
        .unwrap();

    let reopened = open_store(dir.path());

    assert_eq!(*reopened.snapshot(), *store.snapshot());
    let servlet = reopened.get_plugin_config("servlet").unwrap();
    assert_eq!(
        servlet.property("captureRequestHeaders"),
        Some(&PropertyValue::Bool(false))
    );
    assert!(servlet.property("bogus").is_none());
}

#[test]
fn test_well_formed_changes_reload_as_equal_snapshot() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path());
    store
        .insert_alert_config(AlertConfig {
            transaction_type: "Web".into(),
            percentile: 99.9,
            email_addresses: vec!["ops@example.com".into()],
            ..Default::default()
        })
        .unwrap();
    let ui = store.get_user_interface_config();
    store
        .update_user_interface_config(
            UserInterfaceConfig {
                default_percentiles: vec![0.1, 50.0, 99.99],
                ..ui.value.clone()
            },
            ui.version(),
        )
        .unwrap();
    store.insert_gauge_config(gauge("java.lang:type=Memory")).unwrap();

    let reopened = open_store(dir.path());

    assert_eq!(*reopened.snapshot(), *store.snapshot());
}
