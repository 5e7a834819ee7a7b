//! Open/close lifecycle tests.

use std::time::Duration;

use sessionkv::{Connect, Connector, ConnectorConfig, Error, MemoryEngine, RedbEngine};

fn assert_all_not_ready(connector: &dyn Connect) {
    assert!(connector.read("k").unwrap_err().is_not_ready());
    assert!(connector.write("k", b"v", Duration::ZERO).unwrap_err().is_not_ready());
    assert!(connector.exists("k").unwrap_err().is_not_ready());
    assert!(connector.delete("k").unwrap_err().is_not_ready());
    assert!(connector.clear("").unwrap_err().is_not_ready());
    assert!(connector.keys("").unwrap_err().is_not_ready());
    assert!(connector.sequence("k", 0, 1, Duration::ZERO).unwrap_err().is_not_ready());
}

#[test]
fn test_operations_before_open() {
    let memory: Connector<MemoryEngine> = Connector::new(ConnectorConfig::in_memory());
    let redb: Connector<RedbEngine> = Connector::new(ConnectorConfig::in_memory());
    assert_all_not_ready(&memory);
    assert_all_not_ready(&redb);
}

#[test]
fn test_operations_after_close() {
    for (name, connector) in super::open_connectors() {
        connector.write("k", b"v", Duration::ZERO).unwrap();
        connector.close().unwrap_or_else(|e| panic!("{name}: close failed: {e}"));
        assert_all_not_ready(connector.as_ref());
    }
}

#[test]
fn test_close_never_opened() {
    let connector: Connector = Connector::new(ConnectorConfig::in_memory());
    connector.close().expect("close on a closed connector should succeed");
    connector.close().expect("second close should succeed");
}

#[test]
fn test_open_empty_store() {
    let connector: Connector = Connector::new(ConnectorConfig::new().with_store("   "));
    let err = connector.open().unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration(_)));
    assert!(connector.read("k").unwrap_err().is_not_ready());
}

#[test]
fn test_memory_store_does_not_survive_reopen() {
    let connector: Connector = Connector::new(ConnectorConfig::in_memory());
    connector.open().unwrap();
    connector.write("k", b"v", Duration::ZERO).unwrap();
    connector.close().unwrap();

    connector.open().unwrap();
    assert_eq!(connector.read("k").unwrap(), None);
}

#[test]
fn test_file_store_survives_reopen() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("nested").join("sessions.redb");
    let config = ConnectorConfig::new()
        .with_store(path.to_string_lossy())
        .with_cache_size(4 * 1024 * 1024);

    let connector: Connector = Connector::new(config.clone());
    connector.open().unwrap();
    connector.write("sess:1", b"alice", Duration::ZERO).unwrap();
    connector.write("sess:2", b"bob", Duration::from_secs(3600)).unwrap();
    assert_eq!(connector.sequence("visits", 0, 1, Duration::ZERO).unwrap(), 1);
    connector.close().unwrap();

    let reopened: Connector = Connector::new(config);
    reopened.open().unwrap();
    assert_eq!(reopened.read("sess:1").unwrap(), Some(b"alice".to_vec()));
    assert_eq!(reopened.read("sess:2").unwrap(), Some(b"bob".to_vec()));
    assert_eq!(reopened.sequence("visits", 0, 1, Duration::ZERO).unwrap(), 2);
    reopened.close().unwrap();
}

#[test]
fn test_close_while_operations_in_flight() {
    use std::sync::Arc;
    use std::thread;

    let connector: Arc<Connector> = Arc::new(Connector::new(ConnectorConfig::in_memory()));
    connector.open().unwrap();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let connector = Arc::clone(&connector);
            thread::spawn(move || {
                for i in 0..200 {
                    match connector.write(&format!("t{t}:{i}"), b"v", Duration::ZERO) {
                        Ok(()) => {}
                        Err(e) => {
                            assert!(e.is_not_ready(), "unexpected error: {e}");
                            return;
                        }
                    }
                }
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(5));
    connector.close().unwrap();

    for handle in handles {
        handle.join().expect("writer thread panicked");
    }
    assert!(!connector.is_open());
}
