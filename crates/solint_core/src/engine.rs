//! Rule engine: runs structural queries over a tree and turns matches
//! into diagnostics.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use solint_cst::{CstNode, Cursor, Query, QueryMatch, TextRange};
use tracing::{debug, warn};

use crate::{Diagnostic, LineIndex, PassError, RuleError, Severity};

/// A lint rule: a query plus a predicate over its matches.
///
/// Rules are shared between passes and threads, so they hold no
/// per-document state.
pub trait Rule: Send + Sync {
    /// Stable identifier, used in configuration and diagnostics.
    fn id(&self) -> &'static str;

    fn query(&self) -> &Query;

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    /// Inspects one match. `Ok(None)` means the match is fine.
    fn check(&self, found: &QueryMatch<'_>) -> Result<Option<Finding>, RuleError>;
}

/// A problem found by a rule, addressed by tree range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub span: TextRange,
    pub message: String,
}

impl Finding {
    pub fn new(span: TextRange, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// Returns the token captured under `binding`.
pub fn capture_token<'a>(
    found: &QueryMatch<'a>,
    rule: &str,
    binding: &str,
) -> Result<&'a CstNode<'a>, RuleError> {
    let cursor = found
        .binding(binding)
        .ok_or_else(|| RuleError::MissingBinding {
            rule: rule.to_string(),
            binding: binding.to_string(),
        })?;
    let node = cursor.node();
    if !node.is_token() {
        return Err(RuleError::NotAToken {
            rule: rule.to_string(),
            binding: binding.to_string(),
        });
    }
    Ok(node)
}

/// A rule with the severity it reports at.
#[derive(Clone)]
pub struct ConfiguredRule {
    rule: Arc<dyn Rule>,
    severity: Severity,
}

impl ConfiguredRule {
    pub fn new(rule: Arc<dyn Rule>) -> Self {
        let severity = rule.default_severity();
        Self { rule, severity }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn id(&self) -> &'static str {
        self.rule.id()
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn rule(&self) -> &dyn Rule {
        self.rule.as_ref()
    }
}

impl fmt::Debug for ConfiguredRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfiguredRule")
            .field("id", &self.id())
            .field("severity", &self.severity)
            .finish()
    }
}

/// An ordered list of rules. Diagnostics follow this order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<ConfiguredRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: ConfiguredRule) {
        self.rules.push(rule);
    }

    pub fn with(mut self, rule: Arc<dyn Rule>) -> Self {
        self.push(ConfiguredRule::new(rule));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfiguredRule> {
        self.rules.iter()
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(ConfiguredRule::id).collect()
    }

    pub fn get(&self, id: &str) -> Option<&ConfiguredRule> {
        self.rules.iter().find(|rule| rule.id() == id)
    }

    /// A new set holding only the rules whose id is in `ids`.
    pub fn only(&self, ids: &[&str]) -> RuleSet {
        self.rules
            .iter()
            .filter(|rule| ids.contains(&rule.id()))
            .cloned()
            .collect()
    }
}

impl FromIterator<ConfiguredRule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = ConfiguredRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

/// Output of [`run_rules`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleRun {
    /// Diagnostics in rule order, then match order.
    pub diagnostics: Vec<Diagnostic>,
    /// Rules that failed during this pass. They contributed no diagnostics.
    pub failures: Vec<RuleError>,
}

/// Runs every rule against the tree under `cursor`.
///
/// `text` must be the snapshot the tree was parsed from. A failing or
/// panicking rule is recorded in [`RuleRun::failures`] and the remaining
/// rules still run; a finding whose range does not fit `text` aborts the
/// pass.
pub fn run_rules(cursor: &Cursor<'_>, text: &str, rules: &RuleSet) -> Result<RuleRun, PassError> {
    let index = LineIndex::new(text);
    let mut run = RuleRun::default();

    for configured in rules.iter() {
        let id = configured.id();
        let findings = match panic::catch_unwind(AssertUnwindSafe(|| {
            collect_findings(cursor, configured.rule())
        })) {
            Ok(result) => result,
            Err(payload) => Err(RuleError::Panicked {
                rule: id.to_string(),
                message: panic_message(payload.as_ref()),
            }),
        };

        let findings = match findings {
            Ok(findings) => findings,
            Err(error) => {
                warn!("Rule '{}' failed: {}", id, error);
                run.failures.push(error);
                continue;
            }
        };

        debug!("Rule '{}' reported {} finding(s)", id, findings.len());
        for finding in findings {
            let range = index.range(finding.span)?;
            run.diagnostics.push(
                Diagnostic::new(id, finding.message, finding.span, range)
                    .with_severity(configured.severity()),
            );
        }
    }

    Ok(run)
}

fn collect_findings(cursor: &Cursor<'_>, rule: &dyn Rule) -> Result<Vec<Finding>, RuleError> {
    let mut findings = Vec::new();
    for found in cursor.query(std::slice::from_ref(rule.query())) {
        if let Some(finding) = rule.check(&found)? {
            findings.push(finding);
        }
    }
    Ok(findings)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
