//! Basic usage example for binding-registry.
//!
//! Demonstrates:
//! - Taking a handle for a key before its value exists (`get_or_create`)
//! - Registering values (`register` / `register_arc`)
//! - Observing a binding through a previously-issued handle
//! - The conflict rule for double registration
//!
//! Run with: `cargo run --example basic_usage`

use std::sync::Arc;

use binding_registry::{Registry, RegistryError};

fn main() {
    println!("=== binding-registry: Basic Usage ===\n");

    let mut registry: Registry<&str, String> = Registry::new();

    // -------------------------------------------------------------------------
    // 1. Declare interest before the value exists
    // -------------------------------------------------------------------------
    println!("1. Taking a handle for \"database.url\" before registration...");

    let handle = registry.get_or_create("database.url");
    println!("   bound: {}, get: {:?}", handle.bound(), handle.get());

    // -------------------------------------------------------------------------
    // 2. Register the value
    // -------------------------------------------------------------------------
    println!("\n2. Registering a value for \"database.url\"...");

    registry
        .register("database.url", "postgres://localhost".to_string())
        .expect("key is not bound yet");
    println!("   bound: {}, need: {}", handle.bound(), handle.need().unwrap());
    println!("   kind stays {:?} - it reports how the slot was created", handle.kind());

    // -------------------------------------------------------------------------
    // 3. Immediate registration
    // -------------------------------------------------------------------------
    println!("\n3. Registering \"cache.url\" with no prior handle...");

    let cache = registry
        .register("cache.url", "redis://localhost".to_string())
        .expect("key is not bound yet");
    println!("   kind: {:?}, need: {}", cache.kind(), cache.need().unwrap());

    // -------------------------------------------------------------------------
    // 4. Idempotent re-registration needs the same allocation
    // -------------------------------------------------------------------------
    println!("\n4. Re-registering the same Arc is a no-op...");

    let workers = Arc::new("four".to_string());
    registry.register_arc("workers", Arc::clone(&workers)).unwrap();
    registry.register_arc("workers", Arc::clone(&workers)).unwrap();
    println!("   registered \"workers\" twice with one allocation: ok");

    // -------------------------------------------------------------------------
    // 5. A different value for a bound key is rejected
    // -------------------------------------------------------------------------
    println!("\n5. Registering a conflicting value for \"workers\"...");

    match registry.register("workers", "eight".to_string()) {
        Err(RegistryError::AlreadyBound {
            key,
            existing,
            rejected,
        }) => {
            println!("   rejected: key={key}, existing={existing}, rejected={rejected}");
        }
        other => println!("   unexpected: {other:?}"),
    }

    // -------------------------------------------------------------------------
    // 6. The registry tracks every key it has seen
    // -------------------------------------------------------------------------
    println!("\n6. Tracked keys:");

    let mut keys: Vec<_> = registry.keys().collect();
    keys.sort_unstable();
    for key in keys {
        let reference = registry.get(key).expect("key is tracked");
        println!("   {key}: bound={}", reference.bound());
    }
}
