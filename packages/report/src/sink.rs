//! Output targets for report lines.
//!
//! The formatter never writes anywhere itself. A front end picks a sink:
//! [`WriterSink`] over stdout or a file, or a plain `Vec<String>` when the
//! lines feed a widget or a test.

use std::io::{self, Write};

/// Something report lines can be written to.
pub trait ReportSink {
    /// Writes `lines` in order, one per line.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the underlying target fails.
    fn write_lines(&mut self, lines: &[String]) -> io::Result<()>;
}

/// Writes lines to any [`Write`] implementor, newline-terminated.
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    /// Wraps `writer`.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for WriterSink<W> {
    fn write_lines(&mut self, lines: &[String]) -> io::Result<()> {
        for line in lines {
            writeln!(self.writer, "{line}")?;
        }
        self.writer.flush()
    }
}

impl ReportSink for Vec<String> {
    fn write_lines(&mut self, lines: &[String]) -> io::Result<()> {
        self.extend_from_slice(lines);
        Ok(())
    }
}
