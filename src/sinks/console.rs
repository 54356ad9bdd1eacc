//! Console destinations (standard output / standard error)

use crate::core::{Destination, Record, Result};
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

pub struct ConsoleDestination {
    stream: Stream,
    use_colors: bool,
}

impl ConsoleDestination {
    pub fn stdout() -> Self {
        Self {
            stream: Stream::Stdout,
            use_colors: false,
        }
    }

    pub fn stderr() -> Self {
        Self {
            stream: Stream::Stderr,
            use_colors: false,
        }
    }

    /// Colour whole lines by record level (requires the `console` feature)
    ///
    /// # Example
    ///
    /// ```
    /// use observe::sinks::ConsoleDestination;
    /// use observe::Sink;
    ///
    /// let sink = Sink::new(ConsoleDestination::stdout().with_colors(true));
    /// ```
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    #[must_use]
    pub fn stream(&self) -> Stream {
        self.stream
    }

    #[cfg(feature = "console")]
    fn paint(&self, record: &Record, line: &str) -> String {
        if self.use_colors {
            line.color(record.level.color_code()).to_string()
        } else {
            line.to_string()
        }
    }

    #[cfg(not(feature = "console"))]
    fn paint(&self, _record: &Record, line: &str) -> String {
        line.to_string()
    }
}

impl Destination for ConsoleDestination {
    fn write(&mut self, record: &Record, line: &str) -> Result<()> {
        let output = self.paint(record, line);
        match self.stream {
            Stream::Stdout => {
                let mut out = std::io::stdout().lock();
                writeln!(out, "{}", output)?;
                out.flush()?;
            }
            Stream::Stderr => {
                let mut err = std::io::stderr().lock();
                writeln!(err, "{}", output)?;
                err.flush()?;
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match self.stream {
            Stream::Stdout => std::io::stdout().flush()?,
            Stream::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        match self.stream {
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
        }
    }
}
