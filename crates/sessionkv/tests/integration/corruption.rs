//! Damaged entries in a redb store.
//!
//! These entries are written straight into the redb table without the
//! expiry header, the way a torn or foreign write would leave them.

use std::sync::Arc;
use std::time::Duration;

use sessionkv::{Connect, Connector, Error, RedbEngine, SESSIONS_TABLE};
use sessionkv_storage::backends::redb::tables::{definition, physical_name};

fn plant_raw(engine: &RedbEngine, key: &str, raw: &[u8]) {
    let name = physical_name(SESSIONS_TABLE);
    let tx = engine.inner().begin_write().expect("failed to begin write");
    {
        let mut table = tx.open_table(definition(&name)).expect("failed to open table");
        table.insert(key.as_bytes(), raw).expect("failed to insert");
    }
    tx.commit().expect("failed to commit");
}

/// A connector over a redb store holding `sess:1` and a damaged `sess:2`.
fn damaged_store() -> Connector<RedbEngine> {
    let engine = Arc::new(RedbEngine::in_memory().expect("failed to create engine"));
    let connector = Connector::from_engine(Arc::clone(&engine));
    connector.write("sess:1", b"ok", Duration::ZERO).expect("failed to write");
    connector.write("other:1", b"ok", Duration::ZERO).expect("failed to write");
    plant_raw(&engine, "sess:2", b"abc");
    connector
}

#[test]
fn test_keys_lists_damaged_entries() {
    let connector = damaged_store();
    assert_eq!(connector.keys("sess:").expect("keys failed"), vec!["sess:1", "sess:2"]);
}

#[test]
fn test_clear_removes_damaged_entries() {
    let connector = damaged_store();
    connector.clear("sess:").expect("clear failed");

    assert!(connector.keys("sess:").expect("keys failed").is_empty());
    assert_eq!(connector.read("sess:1").expect("read failed"), None);
    assert_eq!(connector.read("sess:2").expect("read failed"), None);
    assert_eq!(connector.read("other:1").expect("read failed"), Some(b"ok".to_vec()));
}

#[test]
fn test_read_damaged_entry_is_encoding_error() {
    let connector = damaged_store();
    assert!(matches!(connector.read("sess:2"), Err(Error::Encoding(_))));
    assert!(matches!(connector.exists("sess:2"), Err(Error::Encoding(_))));
    assert_eq!(connector.read("sess:1").expect("read failed"), Some(b"ok".to_vec()));
}

#[test]
fn test_delete_damaged_entry() {
    let connector = damaged_store();
    connector.delete("sess:2").expect("delete failed");
    assert_eq!(connector.read("sess:2").expect("read failed"), None);
}

#[test]
fn test_sequence_restarts_on_damaged_entry() {
    let engine = Arc::new(RedbEngine::in_memory().expect("failed to create engine"));
    plant_raw(&engine, "ctr", b"abc");
    let connector = Connector::from_engine(engine);

    assert_eq!(connector.sequence("ctr", 10, 5, Duration::ZERO).expect("sequence failed"), 15);
    assert_eq!(connector.sequence("ctr", 10, 5, Duration::ZERO).expect("sequence failed"), 20);
    assert_eq!(connector.read("ctr").expect("read failed"), Some(b"20".to_vec()));
}

#[test]
fn test_purge_keeps_damaged_entries() {
    let connector = damaged_store();
    assert_eq!(connector.purge_expired().expect("purge failed"), 0);
    assert_eq!(connector.keys("sess:").expect("keys failed"), vec!["sess:1", "sess:2"]);
}
