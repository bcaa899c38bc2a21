//! Parse error types.

use semver::Version;
use solint_cst::{RuleKind, TextRange};
use thiserror::Error;

/// Errors that prevent a parse from starting.
///
/// Malformed source text is never an error here: it is reported as
/// [`SyntaxError`]s next to a best-effort tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No grammar exists for the requested version.
    #[error("Unsupported Solidity version: {0}")]
    UnsupportedVersion(Version),

    /// The grammar cannot start parsing at this rule.
    #[error("Unsupported entry rule: {0}")]
    UnsupportedEntryRule(RuleKind),

    /// The text does not fit the 32-bit offsets used by the tree.
    #[error("Source too large: {len} bytes")]
    SourceTooLarge {
        /// Length of the rejected text in bytes.
        len: usize,
    },
}

/// A problem found while parsing. The parser recovers and continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
    /// Where the problem was found. Empty at the end of input.
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}
