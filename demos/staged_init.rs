//! Staged initialization example: a consumer and a producer wired up in
//! opposite order, sharing nothing but a key in a process-global registry.
//!
//! A tracing subscriber is installed so the registry's trace events are
//! visible. Run with: `cargo run --example staged_init`

use std::sync::mpsc;
use std::thread;

use binding_registry::define_registry;
use tracing_subscriber::EnvFilter;

define_registry!(services, String, String);

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .init();

    println!("=== binding-registry: Staged Initialization ===\n");

    let (interested_tx, interested_rx) = mpsc::channel::<()>();
    let (registered_tx, registered_rx) = mpsc::channel::<()>();

    // The consumer starts first and declares interest in a service that has
    // not been provided yet.
    let consumer = thread::spawn(move || {
        let handle = services::get_or_create("mailer".to_string());
        println!("[consumer] took handle for \"mailer\", bound: {}", handle.bound());
        interested_tx.send(()).unwrap();

        registered_rx.recv().unwrap();
        println!(
            "[consumer] producer ran, handle now yields: {}",
            handle.need().expect("producer registered the mailer")
        );
    });

    // The producer runs second and fills the slot the consumer is holding.
    interested_rx.recv().unwrap();
    services::register("mailer".to_string(), "smtp://localhost:25".to_string())
        .expect("mailer is not bound yet");
    println!("[producer] registered \"mailer\"");
    registered_tx.send(()).unwrap();

    consumer.join().unwrap();

    println!("\ntracked keys: {:?}", services::keys());
}
