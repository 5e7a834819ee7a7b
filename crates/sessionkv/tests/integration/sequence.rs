//! Sequence counters.

use std::time::Duration;

#[test]
fn test_sequence_from_start() {
    for (name, connector) in super::open_connectors() {
        assert_eq!(connector.sequence("ctr", 10, 5, Duration::ZERO).unwrap(), 15, "{name}");
        assert_eq!(connector.sequence("ctr", 10, 5, Duration::ZERO).unwrap(), 20, "{name}");
        assert_eq!(connector.sequence("ctr", 10, 5, Duration::ZERO).unwrap(), 25, "{name}");
    }
}

#[test]
fn test_sequence_readable_as_decimal() {
    for (name, connector) in super::open_connectors() {
        connector.sequence("ctr", 0, 42, Duration::ZERO).unwrap();
        assert_eq!(connector.read("ctr").unwrap(), Some(b"42".to_vec()), "{name}");
    }
}

#[test]
fn test_sequence_continues_written_number() {
    for (name, connector) in super::open_connectors() {
        connector.write("ctr", b"100", Duration::ZERO).unwrap();
        assert_eq!(connector.sequence("ctr", 0, 1, Duration::ZERO).unwrap(), 101, "{name}");
    }
}

#[test]
fn test_sequence_falls_back_on_non_numeric() {
    for (name, connector) in super::open_connectors() {
        connector.sequence("ctr", 10, 5, Duration::ZERO).unwrap();
        connector.write("ctr", b"not a number", Duration::ZERO).unwrap();
        assert_eq!(connector.sequence("ctr", 10, 5, Duration::ZERO).unwrap(), 15, "{name}");
    }
}

#[test]
fn test_sequences_are_independent() {
    for (name, connector) in super::open_connectors() {
        assert_eq!(connector.sequence("a", 0, 1, Duration::ZERO).unwrap(), 1, "{name}");
        assert_eq!(connector.sequence("b", 100, 10, Duration::ZERO).unwrap(), 110, "{name}");
        assert_eq!(connector.sequence("a", 0, 1, Duration::ZERO).unwrap(), 2, "{name}");
    }
}

#[test]
fn test_sequence_overflow() {
    for (name, connector) in super::open_connectors() {
        connector.write("ctr", i64::MIN.to_string().as_bytes(), Duration::ZERO).unwrap();
        let err = connector.sequence("ctr", 0, -1, Duration::ZERO).unwrap_err();
        assert!(matches!(err, sessionkv::Error::SequenceOverflow { .. }), "{name}: {err}");
    }
}
