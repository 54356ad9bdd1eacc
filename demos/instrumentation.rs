//! Instrumentation example
//!
//! Wraps operations so they emit once before or after running.
//!
//! Run with: cargo run --example instrumentation

use observe::prelude::*;
use observe::{logged, traced};

fn double(x: i32) -> i32 {
    x * 2
}

fn main() -> Result<()> {
    println!("=== observe - Instrumentation Example ===\n");

    create_global(None, None, None);
    let log = create_log("math", None);
    let trace = create_trace("math", None);

    println!("1. Emission before the call:");
    let announced = Logged::new(&log, "doubling").wrap(double);
    println!("   result = {}", announced(5));

    println!("\n2. Emission after the call, at the log's own level:");
    let confirmed = Logged::new(&log, "doubled")
        .when(When::After)
        .level(Level::ERROR)
        .wrap(double);
    println!("   result = {}", confirmed(21));

    println!("\n3. Traced blocks:");
    let step = Traced::new(&trace, "summing").when(When::After);
    let total = step.call(|| (1..=10).sum::<i32>());
    println!("   total = {}", total);

    println!("\n4. Integer phases are checked:");
    let _ = traced(&trace, "ok", 1, Level::TRACE)?;
    match logged(&log, "bad phase", 7, Level::INFO) {
        Ok(_) => println!("   unexpected success"),
        Err(e) => println!("   rejected: {}", e),
    }

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
