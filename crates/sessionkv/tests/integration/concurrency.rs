//! Concurrent access through one shared connector.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use sessionkv::{Connect, Connector, ConnectorConfig, MemoryEngine, RedbEngine};

const THREADS: usize = 8;
const ITERATIONS: i64 = 50;

fn concurrent_sequence<C: Connect + 'static>(connector: Arc<C>) {
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let connector = Arc::clone(&connector);
            thread::spawn(move || {
                for _ in 0..ITERATIONS {
                    connector.sequence("hits", 0, 1, Duration::ZERO).expect("sequence failed");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread panicked");
    }

    let total = i64::try_from(THREADS).expect("thread count fits") * ITERATIONS;
    assert_eq!(connector.sequence("hits", 0, 0, Duration::ZERO).expect("sequence failed"), total);
}

#[test]
fn test_concurrent_sequence_no_lost_updates() {
    let memory: Connector<MemoryEngine> = Connector::new(ConnectorConfig::in_memory());
    memory.open().expect("failed to open");
    concurrent_sequence(Arc::new(memory));

    let redb: Connector<RedbEngine> = Connector::new(ConnectorConfig::in_memory());
    redb.open().expect("failed to open");
    concurrent_sequence(Arc::new(redb));
}

#[test]
fn test_concurrent_writers_and_readers() {
    let connector: Arc<Connector> = Arc::new(Connector::new(ConnectorConfig::in_memory()));
    connector.open().expect("failed to open");

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let connector = Arc::clone(&connector);
            thread::spawn(move || {
                for i in 0..100 {
                    let key = format!("sess:{t}:{i:03}");
                    connector.write(&key, key.as_bytes(), Duration::ZERO).expect("write failed");
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let connector = Arc::clone(&connector);
            thread::spawn(move || {
                for _ in 0..50 {
                    for key in connector.keys("sess:").expect("keys failed") {
                        // Every listed key was committed with its own name as payload.
                        let value = connector.read(&key).expect("read failed");
                        assert_eq!(value.as_deref(), Some(key.as_bytes()));
                    }
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().expect("thread panicked");
    }

    assert_eq!(connector.keys("sess:").expect("keys failed").len(), 400);
}
