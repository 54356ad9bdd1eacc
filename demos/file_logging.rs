//! File logging example
//!
//! Loads configuration from JSON, writes logs to a plain file and a
//! rotating file set, and exports the effective configuration.
//!
//! Run with: cargo run --example file_logging

use observe::prelude::*;
use observe::EnvironmentSource;
use serde_json::json;

fn main() -> Result<()> {
    println!("=== observe - File Logging Example ===\n");

    let observer = Observer::new();

    // Later sources win; OBSERVE_GLOBAL_LOGGER_LEVEL=ERROR would override the JSON
    observer.update_global_config(&json!({
        "GLOBAL_LOGGER_NAME": "app",
        "GLOBAL_LOGGER_FORMAT": Format::SENSIBLE,
        "GLOBAL_LOGGER_DATEFMT": DateFormat::ISO_8601,
    }));
    observer.update_global_config(&EnvironmentSource::with_prefix("OBSERVE_"));

    let log = observer.create_global_log(vec![
        Sink::stdout(),
        Sink::file("application.log", FileMode::Truncate, None),
        Sink::rotating_file("application-rotating.log", FileMode::Append, 3, 4096, Some("utf-8"))
            .with_level(Level::WARN),
    ]);

    println!("1. Logging to console and files:");
    log.info("Application started");
    log.debug("Loading configuration...");
    log.warning("Using default settings for some options");

    println!("\n2. Performing some operations:");
    let worker = observer.create_log("worker", None);
    for i in 1..=5 {
        worker.info(&format!("Processing item {}/5", i));
        if i == 3 {
            worker.warning("Item 3 took longer than expected");
        }
    }

    // Destination failures can be inspected instead of printed
    if let Err(e) = worker.try_log(Level::ERROR, "Failed to load optional plugin") {
        eprintln!("write failed: {}", e);
    }

    observer.flush()?;
    observer.export_global_config_to_file("observe-config.json")?;

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log' and 'observe-config.json'");

    Ok(())
}
