//! The write seam behind every sink

use super::{error::Result, record::Record};

/// Where formatted records end up.
///
/// A destination receives the record together with the line its sink's
/// formatter produced. Implementations open their resources lazily, so
/// unavailability surfaces as an error from the first `write`.
pub trait Destination: Send {
    /// Write one formatted line
    fn write(&mut self, record: &Record, line: &str) -> Result<()>;

    /// Flush any buffered output
    fn flush(&mut self) -> Result<()>;

    /// Short identifier used in diagnostics
    fn name(&self) -> &str;
}
