//! Basic usage example
//!
//! Sets up the global log and trace hierarchies with console sinks and
//! emits at different levels.
//!
//! Run with: cargo run --example basic_usage

use observe::prelude::*;
use observe::{info, warn};

fn main() -> Result<()> {
    println!("=== observe - Basic Usage Example ===\n");

    // Default sinks: stdout at the configured level, stderr at ERROR
    let (log, trace) = create_global(None, None, None);

    println!("1. Logging at different levels:");
    log.debug("This is a debug message");
    log.info("This is an info message");
    log.warning("This is a warning message");
    log.error("This is an error message (also on stderr)");
    log.critical("This is a critical message (also on stderr)");

    println!("\n2. Namespaced logs reach the global sinks:");
    let db = create_log("db", Some(Level::INFO));
    db.debug("Debug message (hidden, below the namespace level)");
    info!(db, "Connected to {} in {}ms", "primary", 12);
    warn!(db, "Pool at {}% capacity", 85);

    println!("\n3. Traces live in their own hierarchy:");
    trace.trace("Trace root ready");
    let job = create_trace("import", None);
    let parse = job.span("parse");
    parse.trace("Reading header");
    parse.span("rows").trace("Parsed 120 rows");

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
