//! Error types and `miette` diagnostics for caselist.
//!
//! Every failure the scanner or walker can hit is a [`ScanError`]. Two of them,
//! the malformed-declaration errors, are the tool's reason to exist: a line that
//! carries a `TEST_CASE("` or `SECTION("` marker but does not parse is never
//! skipped. All variants propagate with `?` up to [`crate::cli::run`], which
//! renders the diagnostic and terminates the process.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use thiserror::Error;

pub type SourceArc = Arc<NamedSource<String>>;

// =====================
// Markers
// =====================

/// The two declaration markers recognised by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// `TEST_CASE("name1", "name2")`, anchored at column zero.
    TestCase,
    /// `SECTION("name")`, optionally indented.
    Section,
}

impl Marker {
    /// The literal substring whose presence commits a line to a full match.
    pub fn as_str(&self) -> &'static str {
        match self {
            Marker::TestCase => "TEST_CASE(\"",
            Marker::Section => "SECTION(\"",
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Marker::TestCase => "test case",
            Marker::Section => "section",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

// =====================
// Error context
// =====================

/// A file path plus a 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub line: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.line)
    }
}

/// Source and label information used when rendering a diagnostic.
#[derive(Debug, Default)]
pub struct ErrorContext {
    /// The offending line, named after its location.
    pub source: Option<SourceArc>,
    /// Byte offset and length of the primary label within `source`.
    pub span: Option<(usize, usize)>,
    pub help: Option<String>,
}

impl ErrorContext {
    /// Builds a context that highlights `marker` inside a single source line.
    pub fn for_line(location: &Location, text: &str, marker: Marker) -> Self {
        let needle = marker.as_str();
        let start = text.find(needle).unwrap_or(0);
        Self {
            source: Some(Arc::new(NamedSource::new(
                location.to_string(),
                text.to_string(),
            ))),
            span: Some((start, needle.len())),
            help: Some(match marker {
                Marker::TestCase => "expected `TEST_CASE(\"<name>\", \"<name>\")` at the start of the line; names may only contain word characters, spaces and ( ) : . ,".to_string(),
                Marker::Section => "expected `SECTION(\"<name>\")` on its own line; names may only contain word characters, spaces and ( ) : . ,".to_string(),
            }),
        }
    }
}

// =====================
// ScanError
// =====================

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("malformed {marker} declaration at {location}: {line}")]
    MalformedDeclaration {
        marker: Marker,
        location: Location,
        line: String,
        ctx: ErrorContext,
    },
    #[error("failed to read '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to walk directory")]
    Walk(#[from] walkdir::Error),
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
}

impl ScanError {
    /// Constructs the fatal error for a line that carries `marker` but fails its pattern.
    pub fn malformed(marker: Marker, location: Location, line: &str) -> Self {
        let ctx = ErrorContext::for_line(&location, line, marker);
        ScanError::MalformedDeclaration {
            marker,
            location,
            line: line.to_string(),
            ctx,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ScanError::Io {
            path: path.into(),
            source,
        }
    }

    /// Which marker failed, if this is a format error.
    pub fn marker(&self) -> Option<Marker> {
        match self {
            ScanError::MalformedDeclaration { marker, .. } => Some(*marker),
            _ => None,
        }
    }

    fn ctx(&self) -> Option<&ErrorContext> {
        match self {
            ScanError::MalformedDeclaration { ctx, .. } => Some(ctx),
            _ => None,
        }
    }
}

impl Diagnostic for ScanError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self {
            ScanError::MalformedDeclaration {
                marker: Marker::TestCase,
                ..
            } => "caselist::malformed_test_case",
            ScanError::MalformedDeclaration {
                marker: Marker::Section,
                ..
            } => "caselist::malformed_section",
            ScanError::Io { .. } => "caselist::io",
            ScanError::Walk(_) => "caselist::walk",
            ScanError::Output(_) => "caselist::output",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.ctx()?
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.ctx()?
            .source
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let (start, len) = self.ctx()?.span?;
        let label = match self.marker()? {
            Marker::TestCase => "declaration does not match TEST_CASE(\"...\", \"...\")",
            Marker::Section => "declaration does not match SECTION(\"...\")",
        };
        Some(Box::new(std::iter::once(LabeledSpan::new(
            Some(label.to_string()),
            start,
            len.max(1),
        ))))
    }
}
