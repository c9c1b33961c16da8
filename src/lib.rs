//! caselist: enumerate the `TEST_CASE` / `SECTION` pairs declared in a tree of
//! C++ unit test sources.

pub use crate::diagnostics::{Location, Marker, ScanError};
pub use crate::discovery::SourceDiscoverer;
pub use crate::scanner::{scan_file, scan_reader, CaseEntry, CaseTracker, EntrySink, ScanSummary};

pub mod cli;
pub mod diagnostics;
pub mod discovery;
pub mod logging;
pub mod scanner;
