//! Error types.
//!
//! Failures are split by domain so callers can tell them apart:
//! [`RuleError`] is isolated to one rule, [`PassError`] ends one analysis
//! pass, and [`LinterError`] covers configuration and file access.

use solint_cst::QueryError;
use solint_parser::ParseError;
use thiserror::Error;

use crate::RangeError;

/// Errors that can occur while setting up the linter or linting files.
#[derive(Debug, Error)]
pub enum LinterError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File error.
    #[error("File error: {0}")]
    File(String),

    /// A rule query failed to compile.
    #[error("Invalid rule query: {0}")]
    Query(#[from] QueryError),

    /// A pass over a file failed.
    #[error(transparent)]
    Pass(#[from] PassError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LinterError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a file error.
    pub fn file(message: impl Into<String>) -> Self {
        Self::File(message.into())
    }
}

/// A failure that ends one analysis pass for one document.
///
/// Diagnostics for the document are left as they were.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PassError {
    #[error("Parse failure: {0}")]
    Parse(#[from] ParseError),

    #[error("Range out of bounds: {0}")]
    RangeOutOfBounds(#[from] RangeError),

    #[error("Transport failure: {0}")]
    Transport(#[from] TransportError),
}

/// Publishing diagnostics to the client failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not publish diagnostics for {uri}: {reason}")]
pub struct TransportError {
    pub uri: String,
    pub reason: String,
}

impl TransportError {
    pub fn new(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            reason: reason.into(),
        }
    }
}

/// A single rule failed. Other rules in the same pass are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("rule '{rule}': query produced no '@{binding}' binding")]
    MissingBinding { rule: String, binding: String },

    #[error("rule '{rule}': '@{binding}' must capture a token")]
    NotAToken { rule: String, binding: String },

    #[error("rule '{rule}' panicked: {message}")]
    Panicked { rule: String, message: String },

    #[error("rule '{rule}': {message}")]
    Other { rule: String, message: String },
}

impl RuleError {
    /// The id of the failing rule.
    pub fn rule(&self) -> &str {
        match self {
            RuleError::MissingBinding { rule, .. }
            | RuleError::NotAToken { rule, .. }
            | RuleError::Panicked { rule, .. }
            | RuleError::Other { rule, .. } => rule,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;

    #[test]
    fn test_pass_error_conversions() {
        let parse: PassError = ParseError::UnsupportedVersion(Version::new(0, 1, 0)).into();
        assert!(matches!(parse, PassError::Parse(_)));

        let range: PassError = RangeError::OutOfBounds { offset: 9, len: 3 }.into();
        assert_eq!(
            range.to_string(),
            "Range out of bounds: offset 9 is outside of a 3 byte text"
        );

        let transport: PassError = TransportError::new("file:///a.sol", "channel closed").into();
        assert_eq!(
            transport.to_string(),
            "Transport failure: could not publish diagnostics for file:///a.sol: channel closed"
        );
    }

    #[test]
    fn test_rule_error_names_its_rule() {
        let error = RuleError::NotAToken {
            rule: "no-unsized-uint".to_string(),
            binding: "unsized_uint".to_string(),
        };
        assert_eq!(error.rule(), "no-unsized-uint");
        assert_eq!(
            error.to_string(),
            "rule 'no-unsized-uint': '@unsized_uint' must capture a token"
        );
    }
}
