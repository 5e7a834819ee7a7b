//! Integration tests for the session connector.
//!
//! Most tests run the same scenario against every engine through
//! [`open_connectors`].

use sessionkv::{Connect, Connector, ConnectorConfig, MemoryEngine, RedbEngine};

pub mod concurrency;
pub mod corruption;
pub mod lifecycle;
pub mod properties;
pub mod registry;
pub mod sequence;

/// One opened connector per engine, labelled for assertion messages.
pub fn open_connectors() -> Vec<(&'static str, Box<dyn Connect>)> {
    let memory: Connector<MemoryEngine> = Connector::new(ConnectorConfig::in_memory());
    let redb: Connector<RedbEngine> = Connector::new(ConnectorConfig::in_memory());

    let connectors: Vec<(&'static str, Box<dyn Connect>)> =
        vec![("memory", Box::new(memory)), ("redb", Box::new(redb))];
    for (name, connector) in &connectors {
        connector.open().unwrap_or_else(|e| panic!("failed to open {name} connector: {e}"));
    }
    connectors
}
