//! Property-based tests.

use std::time::Duration;

use proptest::prelude::*;

use sessionkv::{Connect, Connector, ConnectorConfig, MemoryEngine};

fn connector() -> Connector<MemoryEngine> {
    let connector = Connector::new(ConnectorConfig::in_memory());
    connector.open().expect("failed to open");
    connector
}

proptest! {
    #[test]
    fn prop_write_read_round_trip(
        key in "[a-z:]{1,16}",
        payload in proptest::collection::vec(any::<u8>(), 1..512),
    ) {
        let connector = connector();
        connector.write(&key, &payload, Duration::ZERO).expect("write failed");
        prop_assert_eq!(connector.read(&key).expect("read failed"), Some(payload));
    }

    #[test]
    fn prop_keys_match_prefix_filter(
        keys in proptest::collection::btree_set("[ab]{1,4}", 0..20),
        prefix in "[ab]{0,2}",
    ) {
        let connector = connector();
        for key in &keys {
            connector.write(key, b"v", Duration::ZERO).expect("write failed");
        }

        let expected: Vec<String> = keys.iter().filter(|k| k.starts_with(&prefix)).cloned().collect();
        prop_assert_eq!(connector.keys(&prefix).expect("keys failed"), expected);
    }

    #[test]
    fn prop_sequence_accumulates(start in -1_000i64..1_000, steps in proptest::collection::vec(-100i64..100, 1..20)) {
        let connector = connector();
        let mut expected = start;
        for step in steps {
            expected += step;
            prop_assert_eq!(connector.sequence("ctr", start, step, Duration::ZERO).expect("sequence failed"), expected);
        }
    }
}
