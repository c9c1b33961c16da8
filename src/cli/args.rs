//! Defines the command-line arguments for the caselist CLI.
//!
//! This module uses the `clap` crate with its "derive" feature. Every flag has a
//! default, so a bare `caselist` run from a project root behaves as the tool
//! always has: scan `src/unittests` for `.cc` files and print plain pairs.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::discovery::DEFAULT_EXTENSION;

/// Root scanned when none is given on the command line.
pub const DEFAULT_ROOT: &str = "src/unittests";

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "caselist",
    version,
    about = "List every TEST_CASE and SECTION declared in a unit test tree."
)]
pub struct CaselistArgs {
    /// Directory to scan recursively.
    #[arg(default_value = DEFAULT_ROOT)]
    pub root: PathBuf,

    /// File name suffix of the sources to scan.
    #[arg(short, long, default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// How each (test case, section) pair is printed.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `"<test case>" "<section>"`
    Plain,
    /// One JSON object per line.
    Json,
}
