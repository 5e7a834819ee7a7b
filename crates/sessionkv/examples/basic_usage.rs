//! Basic usage example for `SessionKV`.
//!
//! This example demonstrates:
//! - Registering the built-in driver with a host registry
//! - Opening a connector and storing sessions with and without a TTL
//! - Listing and clearing sessions by prefix
//! - Keeping a counter next to the sessions
//!
//! Run with: `cargo run --example basic_usage`

use std::thread;
use std::time::Duration;

use sessionkv::{register_builtin, ConnectorConfig, DriverRegistry, Error, Instance, MEMORY_DRIVER};

fn main() -> Result<(), Error> {
    println!("SessionKV Basic Usage Example");
    println!("=============================\n");

    // A host builds its registry once at start-up.
    let mut registry = DriverRegistry::new();
    register_builtin(&mut registry)?;
    println!("Registered drivers: {:?}", registry.names());

    // Use ConnectorConfig::new().with_store("path/to/sessions.redb") to persist.
    let instance = Instance::new("web", ConnectorConfig::in_memory());
    let connector = registry.connect(MEMORY_DRIVER, &instance)?;
    connector.open()?;

    connector.write("sess:alice", b"user=alice;theme=dark", Duration::from_secs(1800))?;
    connector.write("sess:bob", b"user=bob", Duration::ZERO)?;
    connector.write("sess:guest", b"user=guest", Duration::from_millis(50))?;
    connector.write("csrf:alice", b"token-1234", Duration::from_secs(600))?;

    if let Some(data) = connector.read("sess:alice")? {
        println!("sess:alice -> {}", String::from_utf8_lossy(&data));
    }
    println!("sessions: {:?}", connector.keys("sess:")?);

    thread::sleep(Duration::from_millis(100));
    println!("guest still there after its TTL? {}", connector.exists("sess:guest")?);
    println!("sessions after expiry: {:?}", connector.keys("sess:")?);

    for _ in 0..3 {
        let visits = connector.sequence("visits", 0, 1, Duration::ZERO)?;
        println!("visit #{visits}");
    }

    connector.clear("sess:")?;
    println!("after clear: {:?}", connector.keys("")?);

    connector.delete("csrf:alice")?;
    connector.close()?;
    println!("\nDone.");
    Ok(())
}
