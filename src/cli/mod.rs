//! The caselist command-line interface.
//!
//! Walks the requested tree, scans every selected file in order and streams
//! entries to stdout. Any [`ScanError`] stops the run: its diagnostic is printed
//! to stdout and the process exits with status 1.

use std::io;
use std::path::Path;
use std::process;

use clap::Parser;
use tracing::{error, info};

use crate::cli::args::CaselistArgs;
use crate::cli::output::{write_diagnostic, StdoutSink};
use crate::diagnostics::ScanError;
use crate::discovery::SourceDiscoverer;
use crate::logging;
use crate::scanner::{scan_file, EntrySink, ScanSummary};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    logging::init_cli();
    let args = CaselistArgs::parse();
    let mut sink = StdoutSink::new(args.format);

    let discoverer = SourceDiscoverer::new(&args.extension);
    if let Err(e) = list_cases(&args.root, &discoverer, &mut sink) {
        error!(error = %e, "scan aborted");
        // stdout may already be closed; the exit status still reports the failure.
        let _ = write_diagnostic(&mut io::stdout().lock(), &e);
        process::exit(1);
    }
}

/// Scans every source under `root`, streaming entries to `sink`.
///
/// Each file is scanned as soon as the walk reaches it, so entries from earlier
/// files are already emitted when a later file or directory fails.
pub fn list_cases<S: EntrySink + ?Sized>(
    root: &Path,
    discoverer: &SourceDiscoverer,
    sink: &mut S,
) -> Result<ScanSummary, ScanError> {
    let mut total = ScanSummary::default();
    let mut files = 0;
    for file in discoverer.sources(root) {
        total += scan_file(&file?, sink)?;
        files += 1;
    }
    info!(
        root = %root.display(),
        files,
        cases = total.cases,
        sections = total.sections,
        entries = total.entries,
        "scan complete"
    );
    Ok(total)
}
