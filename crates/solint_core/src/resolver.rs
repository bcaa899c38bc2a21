//! Grammar version resolution from `pragma solidity` directives.

use semver::{Version, VersionReq};
use solint_parser::{Language, pragma, supported_versions};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    #[error("empty version constraint")]
    Empty,

    #[error("expected a version at '{0}'")]
    ExpectedVersion(String),

    #[error("invalid version requirement '{text}': {reason}")]
    Invalid { text: String, reason: String },
}

/// One Solidity version constraint, such as `>=0.6.2 <0.9.0 || ^0.4.24`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConstraint {
    alternatives: Vec<VersionReq>,
}

impl VersionConstraint {
    /// Converts Solidity constraint syntax into semver requirements.
    ///
    /// Bare versions match exactly; `a - b` is an inclusive range;
    /// trailing `x`/`*` components widen a version to a range.
    pub fn parse(text: &str) -> Result<Self, ConstraintError> {
        let alternatives = text
            .split("||")
            .map(alternative)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { alternatives })
    }

    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }

    pub fn alternatives(&self) -> &[VersionReq] {
        &self.alternatives
    }
}

fn alternative(text: &str) -> Result<VersionReq, ConstraintError> {
    let mut comparators = Vec::new();
    let mut seen = false;
    let mut rest = text.trim_start();

    while !rest.is_empty() {
        seen = true;
        let (op, tail) = split_while(rest, |c| matches!(c, '^' | '~' | '<' | '>' | '='));
        let (version, tail) = split_version(tail.trim_start());
        if version.is_empty() {
            return Err(ConstraintError::ExpectedVersion(rest.to_string()));
        }
        let tail = tail.trim_start();

        match tail.strip_prefix('-') {
            Some(upper) if op.is_empty() => {
                let (high, after) = split_version(upper.trim_start());
                if high.is_empty() {
                    return Err(ConstraintError::ExpectedVersion(tail.to_string()));
                }
                comparators.extend(comparator(">=", version));
                comparators.extend(comparator("<=", high));
                rest = after.trim_start();
            }
            _ => {
                comparators.extend(comparator(op, version));
                rest = tail;
            }
        }
    }

    if !seen {
        return Err(ConstraintError::Empty);
    }
    if comparators.is_empty() {
        return Ok(VersionReq::STAR);
    }

    let joined = comparators.join(", ");
    VersionReq::parse(&joined).map_err(|e| ConstraintError::Invalid {
        text: text.trim().to_string(),
        reason: e.to_string(),
    })
}

/// `None` when the comparator accepts every version (`*`, `x`).
fn comparator(op: &str, version: &str) -> Option<String> {
    let mut version = version.strip_prefix('v').unwrap_or(version);
    while let Some((head, last)) = version.rsplit_once('.') {
        if !is_wildcard(last) {
            break;
        }
        version = head;
    }
    if is_wildcard(version) {
        return None;
    }

    let op = if op.is_empty() { "=" } else { op };
    Some(format!("{op}{version}"))
}

fn is_wildcard(part: &str) -> bool {
    matches!(part, "x" | "X" | "*")
}

fn split_version(text: &str) -> (&str, &str) {
    split_while(text, |c| c.is_ascii_alphanumeric() || c == '.' || c == '*')
}

fn split_while(text: &str, pred: impl Fn(char) -> bool) -> (&str, &str) {
    let at = text.find(|c: char| !pred(c)).unwrap_or(text.len());
    text.split_at(at)
}

/// Picks the grammar for a source text from its version pragmas.
#[derive(Debug, Clone)]
pub struct VersionResolver {
    default: Language,
}

impl VersionResolver {
    pub fn new(default: Language) -> Self {
        Self { default }
    }

    pub fn default_version(&self) -> &Version {
        self.default.version()
    }

    /// Returns the newest supported grammar satisfying every pragma in
    /// `text`, or the default grammar when there is none.
    pub fn resolve(&self, text: &str) -> Language {
        let pragmas = pragma::extract(text);
        if pragmas.is_empty() {
            debug!("No version pragma, using {}", self.default_version());
            return self.default.clone();
        }

        let mut constraints = Vec::with_capacity(pragmas.version_constraints.len());
        for raw in &pragmas.version_constraints {
            match VersionConstraint::parse(raw) {
                Ok(constraint) => constraints.push(constraint),
                Err(e) => {
                    debug!(
                        "Malformed version pragma '{}' ({}), using {}",
                        raw,
                        e,
                        self.default_version()
                    );
                    return self.default.clone();
                }
            }
        }

        let chosen = supported_versions()
            .iter()
            .rev()
            .find(|version| constraints.iter().all(|c| c.matches(version)));

        match chosen {
            Some(version) => {
                debug!("Resolved Solidity {} from {:?}", version, pragmas.version_constraints);
                Language::new(version.clone()).unwrap_or_else(|_| self.default.clone())
            }
            None => {
                warn!(
                    "No supported Solidity version satisfies {:?}, using {}",
                    pragmas.version_constraints,
                    self.default_version()
                );
                self.default.clone()
            }
        }
    }
}

impl Default for VersionResolver {
    fn default() -> Self {
        Self::new(Language::latest())
    }
}
