use std::sync::Arc;
use std::sync::Barrier;
use std::thread;

use confstore::model::GeneralConfig;
use confstore::model::Version;
use tempfile::tempdir;

use crate::common::gauge;
use crate::common::open_store;

#[test]
fn test_racing_writers_on_one_version_have_one_winner() {
    let dir = tempdir().unwrap();
    let store = Arc::new(open_store(dir.path()));
    let prior = store.get_general_config();
    let barrier = Arc::new(Barrier::new(6));

    let handles: Vec<_> = (0..6u32)
        .map(|i| {
            let store = store.clone();
            let barrier = barrier.clone();
            let prior = prior.clone();
            thread::spawn(move || {
                barrier.wait();
                store.update_general_config(
                    GeneralConfig {
                        profiling_interval_millis: 100 + i,
                        ..prior.value.clone()
                    },
                    prior.version(),
                )
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| e.is_optimistic_lock()));
}

#[test]
fn test_readers_see_whole_snapshots_while_writers_insert() {
    let dir = tempdir().unwrap();
    let store = Arc::new(open_store(dir.path()));

    let writer = {
        let store = store.clone();
        thread::spawn(move || {
            for i in 0..50 {
                store.insert_gauge_config(gauge(&format!("app:type=G{}", i))).unwrap();
            }
        })
    };
    let reader = {
        let store = store.clone();
        thread::spawn(move || {
            let mut last = 0;
            for _ in 0..200 {
                let seen = store.get_gauge_configs().len();
                assert!(seen >= last, "gauge count went backwards");
                last = seen;
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();
    assert_eq!(store.get_gauge_configs().len(), 50);
}

#[test]
fn test_versions_are_distinct_across_updates() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path());
    let mut seen: Vec<Version> = vec![store.get_general_config().version().clone()];

    for i in 0..20 {
        let current = store.get_general_config();
        let next = store
            .update_general_config(
                GeneralConfig {
                    trace_store_threshold_millis: i,
                    ..current.value.clone()
                },
                current.version(),
            )
            .unwrap();
        assert!(!seen.contains(&next));
        seen.push(next);
    }
}
