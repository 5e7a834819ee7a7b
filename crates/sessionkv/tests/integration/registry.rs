//! Driver registration from a host's point of view.

use std::time::Duration;

use sessionkv::{register_builtin, ConnectorConfig, DriverRegistry, Error, Instance, MEMORY_DRIVER};

#[test]
fn test_register_builtin() {
    let mut registry = DriverRegistry::new();
    register_builtin(&mut registry).expect("failed to register");
    assert_eq!(registry.names(), vec![MEMORY_DRIVER]);

    let err = register_builtin(&mut registry).unwrap_err();
    assert!(matches!(err, Error::DriverExists(_)));
}

#[test]
fn test_connect_through_registry() {
    let mut registry = DriverRegistry::new();
    register_builtin(&mut registry).expect("failed to register");

    let instance = Instance::new("web", ConnectorConfig::in_memory());
    let connector = registry.connect(MEMORY_DRIVER, &instance).expect("failed to connect");

    // Drivers hand out closed connectors.
    assert!(connector.read("k").unwrap_err().is_not_ready());

    connector.open().expect("failed to open");
    connector.write("sess:1", b"payload", Duration::from_secs(60)).unwrap();
    assert_eq!(connector.read("sess:1").unwrap(), Some(b"payload".to_vec()));
    connector.close().unwrap();
}

#[test]
fn test_instances_are_isolated() {
    let mut registry = DriverRegistry::new();
    register_builtin(&mut registry).expect("failed to register");

    let a = registry.connect(MEMORY_DRIVER, &Instance::new("a", ConnectorConfig::default())).unwrap();
    let b = registry.connect(MEMORY_DRIVER, &Instance::new("b", ConnectorConfig::default())).unwrap();
    a.open().unwrap();
    b.open().unwrap();

    a.write("k", b"from-a", Duration::ZERO).unwrap();
    assert_eq!(b.read("k").unwrap(), None);
}

#[test]
fn test_instance_config_from_json() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("sessions.redb");
    let json = serde_json::json!({ "store": path.to_string_lossy() });
    let config: ConnectorConfig = serde_json::from_value(json).expect("invalid config");

    let mut registry = DriverRegistry::new();
    register_builtin(&mut registry).expect("failed to register");
    let connector = registry.connect(MEMORY_DRIVER, &Instance::new("disk", config)).unwrap();
    connector.open().unwrap();
    connector.write("k", b"v", Duration::ZERO).unwrap();
    connector.close().unwrap();

    assert!(path.exists());
}
