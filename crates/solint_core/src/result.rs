//! Lint results.

use std::path::PathBuf;

use semver::Version;
use serde::Serialize;
use solint_parser::SyntaxError;

use crate::{Diagnostic, RuleError, Severity};

/// The outcome of one pass over one text snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintOutcome {
    /// The grammar version the text was parsed with.
    pub version: Version,
    pub diagnostics: Vec<Diagnostic>,
    pub syntax_errors: Vec<SyntaxError>,
    /// Rules that failed during the pass.
    pub failures: Vec<RuleError>,
}

/// Result of linting a single file.
#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    pub path: PathBuf,

    /// Solidity version the file was parsed as.
    #[serde(serialize_with = "serialize_version")]
    pub version: Version,

    /// Rule diagnostics followed by syntax diagnostics.
    pub diagnostics: Vec<Diagnostic>,

    /// Number of rules that failed on this file.
    pub failed_rules: usize,
}

impl LintResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

fn serialize_version<S: serde::Serializer>(version: &Version, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(version)
}
