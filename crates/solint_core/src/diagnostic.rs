//! Diagnostic types.

use serde::{Deserialize, Serialize};
use solint_cst::TextRange;

use crate::Range;

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Warning
    }
}

impl Severity {
    /// Parses the configuration spelling of a severity.
    ///
    /// `"off"` is not a severity and yields `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "error" => Some(Severity::Error),
            "warning" => Some(Severity::Warning),
            "information" => Some(Severity::Information),
            "hint" => Some(Severity::Hint),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Information => "information",
            Severity::Hint => "hint",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A diagnostic reported by a rule or by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The rule that generated this diagnostic (`syntax` for parse errors).
    pub rule_id: String,

    pub message: String,

    /// Editor range of the reported text.
    pub range: Range,

    /// Byte range of the reported text in the linted snapshot.
    pub span: TextRange,

    #[serde(default)]
    pub severity: Severity,
}

impl Diagnostic {
    /// Creates a new warning.
    pub fn new(
        rule_id: impl Into<String>,
        message: impl Into<String>,
        span: TextRange,
        range: Range,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            message: message.into(),
            range,
            span,
            severity: Severity::default(),
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}
