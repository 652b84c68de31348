use std::sync::atomic::Ordering;
use std::sync::Arc;

use confstore::model::GeneralConfig;
use confstore::model::PluginConfig;
use parking_lot::Mutex;
use tempfile::tempdir;

use crate::common::counting_listener;
use crate::common::gauge;
use crate::common::open_store;

#[test]
fn test_every_mutation_notifies_global_listeners() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path());
    let (global, listener) = counting_listener();
    store.add_listener(listener.clone());
    store.add_listener(listener);

    let v = store.insert_gauge_config(gauge("a:type=One")).unwrap();
    store.delete_gauge_config(&v).unwrap();
    let jdbc = store.get_plugin_config("jdbc").unwrap();
    store
        .update_plugin_config(
            "jdbc",
            PluginConfig {
                enabled: false,
                ..jdbc.value.clone()
            },
            jdbc.version(),
        )
        .unwrap();

    assert_eq!(global.load(Ordering::SeqCst), 3);
}

#[test]
fn test_rejected_mutation_notifies_nobody() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path());
    let (global, listener) = counting_listener();
    let (keyed, keyed_listener) = counting_listener();
    store.add_listener(listener);
    store.add_keyed_listener("servlet", keyed_listener);

    let general = store.get_general_config();
    store
        .update_general_config(general.value.clone(), general.version())
        .unwrap();
    let err = store
        .update_general_config(
            GeneralConfig {
                enabled: false,
                ..general.value.clone()
            },
            general.version(),
        )
        .unwrap_err();

    assert!(err.is_optimistic_lock());
    assert_eq!(global.load(Ordering::SeqCst), 1);
    assert_eq!(keyed.load(Ordering::SeqCst), 0);
}

#[test]
fn test_plugin_listener_sees_toggled_agent() {
    let dir = tempdir().unwrap();
    let store = Arc::new(open_store(dir.path()));
    let observed = Arc::new(Mutex::new(Vec::new()));
    let weak = Arc::downgrade(&store);
    let sink = observed.clone();
    store.add_keyed_listener(
        "servlet",
        Arc::new(move || {
            if let Some(store) = weak.upgrade() {
                sink.lock().push(store.get_general_config().enabled);
            }
        }),
    );

    for enabled in [false, true] {
        let general = store.get_general_config();
        store
            .update_general_config(
                GeneralConfig {
                    enabled,
                    ..general.value.clone()
                },
                general.version(),
            )
            .unwrap();
    }

    assert_eq!(*observed.lock(), vec![false, true]);
}
