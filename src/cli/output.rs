//! Handles all user-facing output for the CLI.
//!
//! Entries go to stdout through an [`EntrySink`]. Diagnostics for fatal errors
//! are rendered here too, also onto stdout, so a consumer reading the listing
//! sees the reason the listing stopped.

use std::io::{self, Write};

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};

use crate::cli::args::OutputFormat;
use crate::scanner::{CaseEntry, EntrySink};

// ============================================================================
// OUTPUT SINKS
// ============================================================================

/// Collects entries in memory, for tests and programmatic capture.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    pub entries: Vec<CaseEntry>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The buffered entries rendered as plain lines.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }
}

impl EntrySink for OutputBuffer {
    fn emit(&mut self, entry: &CaseEntry) -> io::Result<()> {
        self.entries.push(entry.clone());
        Ok(())
    }
}

/// Writes each entry to stdout as soon as it is emitted.
pub struct StdoutSink {
    format: OutputFormat,
    out: io::Stdout,
}

impl StdoutSink {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            out: io::stdout(),
        }
    }
}

impl EntrySink for StdoutSink {
    fn emit(&mut self, entry: &CaseEntry) -> io::Result<()> {
        let mut out = self.out.lock();
        write_entry(&mut out, entry, self.format)?;
        out.flush()
    }
}

/// Writes one entry in the requested format, newline-terminated.
pub fn write_entry<W: Write>(out: &mut W, entry: &CaseEntry, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Plain => writeln!(out, "{}", entry),
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, entry)?;
            writeln!(out)
        }
    }
}

// ============================================================================
// DIAGNOSTICS
// ============================================================================

/// Renders a diagnostic without colour and without line wrapping.
pub fn render_diagnostic(diagnostic: &dyn Diagnostic) -> String {
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
        .with_width(4096);
    let mut rendered = String::new();
    if handler.render_report(&mut rendered, diagnostic).is_err() {
        // Fall back to the plain message.
        rendered = diagnostic.to_string();
    }
    rendered
}

/// Writes a rendered diagnostic followed by a newline.
pub fn write_diagnostic<W: Write>(out: &mut W, diagnostic: &dyn Diagnostic) -> io::Result<()> {
    writeln!(out, "{}", render_diagnostic(diagnostic))?;
    out.flush()
}
