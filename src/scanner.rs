//! Line scanner for `TEST_CASE` / `SECTION` declarations.
//!
//! A file is read line by line. Each line is tried against both declaration
//! patterns independently, and every match is pushed to an [`EntrySink`] as soon
//! as it is known. The one piece of deferred state is the pending test case,
//! held by a [`CaseTracker`]: a case that never gains a section is emitted as a
//! bare `(name, "")` entry when the next case opens or the file ends.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::diagnostics::{Location, Marker, ScanError};

// =====================
// Patterns
// =====================

/// `TEST_CASE("name1", "name2")` at column zero, nothing after the closing paren.
/// The space after the comma is optional; any other separator is malformed.
static TEST_CASE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^TEST_CASE\("(?P<name1>[\w ()_:.,]+)", ?"(?P<name2>[\w ()_:.,]+)"\)$"#)
        .expect("test case pattern is valid")
});

/// `SECTION("name")` after any amount of leading whitespace.
static SECTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?P<indent>\s*)SECTION\("(?P<name>[\w ()_:.,]+)"\)$"#)
        .expect("section pattern is valid")
});

/// Returns the test case name (both parts joined by a space) if `line` declares one.
pub fn parse_test_case(line: &str) -> Option<String> {
    let caps = TEST_CASE_PATTERN.captures(line)?;
    Some(format!("{} {}", &caps["name1"], &caps["name2"]))
}

/// Returns the section name if `line` declares one.
pub fn parse_section(line: &str) -> Option<&str> {
    SECTION_PATTERN
        .captures(line)
        .and_then(|caps| caps.name("name"))
        .map(|m| m.as_str())
}

// =====================
// Entries and sinks
// =====================

/// One emitted (test case, section) pair. An empty `section` marks a case without sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseEntry {
    pub test_case: String,
    pub section: String,
}

impl CaseEntry {
    pub fn new(test_case: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            test_case: test_case.into(),
            section: section.into(),
        }
    }

    pub fn bare(test_case: impl Into<String>) -> Self {
        Self::new(test_case, String::new())
    }
}

impl fmt::Display for CaseEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" \"{}\"", self.test_case, self.section)
    }
}

/// Receives entries in discovery order.
pub trait EntrySink {
    fn emit(&mut self, entry: &CaseEntry) -> io::Result<()>;
}

// =====================
// Pending case state
// =====================

/// The most recently declared test case of the current file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingCase {
    /// No section seen yet; will be flushed as a bare entry.
    Bare(String),
    /// At least one section seen; already represented by its section entries.
    Sectioned { name: String, sections: usize },
}

impl PendingCase {
    pub fn name(&self) -> &str {
        match self {
            PendingCase::Bare(name) => name,
            PendingCase::Sectioned { name, .. } => name,
        }
    }

    pub fn sections(&self) -> usize {
        match self {
            PendingCase::Bare(_) => 0,
            PendingCase::Sectioned { sections, .. } => *sections,
        }
    }

    fn record_section(&mut self) {
        match self {
            PendingCase::Bare(name) => {
                *self = PendingCase::Sectioned {
                    name: std::mem::take(name),
                    sections: 1,
                }
            }
            PendingCase::Sectioned { sections, .. } => *sections += 1,
        }
    }

    /// Consumes the case, yielding its bare entry only if it never gained a section.
    fn into_flush(self) -> Option<CaseEntry> {
        match self {
            PendingCase::Bare(name) => Some(CaseEntry::bare(name)),
            PendingCase::Sectioned { .. } => None,
        }
    }
}

/// Tracks the pending test case of a single file.
///
/// A case leaves the tracker exactly once, either through [`CaseTracker::open_case`]
/// (replaced by the next declaration) or [`CaseTracker::finish`] (end of file).
#[derive(Debug, Default)]
pub struct CaseTracker {
    pending: Option<PendingCase>,
}

impl CaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<&PendingCase> {
        self.pending.as_ref()
    }

    /// Opens a new case and returns the bare entry of the case it replaces, if due.
    pub fn open_case(&mut self, name: String) -> Option<CaseEntry> {
        self.pending
            .replace(PendingCase::Bare(name))
            .and_then(PendingCase::into_flush)
    }

    /// Records a section under the pending case and returns its entry.
    ///
    /// A section that appears before any case is reported under an empty case name.
    pub fn add_section(&mut self, section: &str) -> CaseEntry {
        match self.pending.as_mut() {
            Some(pending) => {
                pending.record_section();
                CaseEntry::new(pending.name(), section)
            }
            None => CaseEntry::new(String::new(), section),
        }
    }

    pub fn finish(self) -> Option<CaseEntry> {
        self.pending.and_then(PendingCase::into_flush)
    }
}

// =====================
// Scanning
// =====================

/// Per-file counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub cases: usize,
    pub sections: usize,
    pub entries: usize,
}

impl std::ops::AddAssign for ScanSummary {
    fn add_assign(&mut self, other: Self) {
        self.cases += other.cases;
        self.sections += other.sections;
        self.entries += other.entries;
    }
}

/// Scans the file at `path`, emitting entries to `sink` as they are found.
///
/// The file handle is dropped before this returns, on both the success and the
/// error path.
pub fn scan_file<S: EntrySink + ?Sized>(
    path: &Path,
    sink: &mut S,
) -> Result<ScanSummary, ScanError> {
    let file = File::open(path).map_err(|e| ScanError::io(path, e))?;
    let summary = scan_reader(&path.display().to_string(), BufReader::new(file), sink)?;
    debug!(
        file = %path.display(),
        cases = summary.cases,
        sections = summary.sections,
        "scanned file"
    );
    Ok(summary)
}

/// Scans any buffered reader. `name` identifies the source in diagnostics.
pub fn scan_reader<R: BufRead, S: EntrySink + ?Sized>(
    name: &str,
    reader: R,
    sink: &mut S,
) -> Result<ScanSummary, ScanError> {
    let mut tracker = CaseTracker::new();
    let mut summary = ScanSummary::default();
    let mut emit = |entry: CaseEntry, summary: &mut ScanSummary| -> Result<(), ScanError> {
        summary.entries += 1;
        sink.emit(&entry).map_err(ScanError::Output)
    };

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| ScanError::io(name, e))?;
        let location = || Location {
            path: name.to_string(),
            line: index + 1,
        };

        if let Some(case) = parse_test_case(&line) {
            summary.cases += 1;
            if let Some(flushed) = tracker.open_case(case) {
                emit(flushed, &mut summary)?;
            }
        } else if line.contains(Marker::TestCase.as_str()) {
            return Err(ScanError::malformed(Marker::TestCase, location(), &line));
        }

        if let Some(section) = parse_section(&line) {
            summary.sections += 1;
            let entry = tracker.add_section(section);
            emit(entry, &mut summary)?;
        } else if line.contains(Marker::Section.as_str()) {
            return Err(ScanError::malformed(Marker::Section, location(), &line));
        }
    }

    if let Some(flushed) = tracker.finish() {
        emit(flushed, &mut summary)?;
    }
    Ok(summary)
}
