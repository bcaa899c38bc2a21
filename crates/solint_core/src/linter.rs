//! Lint passes.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use solint_cst::{CstArena, RuleKind};
use solint_parser::{Language, Parser, SyntaxError};
use tracing::{debug, warn};

use crate::file_finder::FileFinder;
use crate::rules::{NoUnsizedUint, builtin_rules};
use crate::{
    Diagnostic, LineIndex, LintOutcome, LintResult, LinterConfig, LinterError,
    PassError, RangeError, RuleSet, Severity, VersionResolver, run_rules,
};

/// Rule id of diagnostics produced from syntax errors.
pub const SYNTAX_RULE_ID: &str = "syntax";

/// Result type for lint_files and lint_patterns methods.
///
/// Contains a tuple of:
/// - Successful lint results
/// - Failed files with their errors (path and error)
pub type LintFilesResult = Result<(Vec<LintResult>, Vec<(PathBuf, LinterError)>), LinterError>;

/// Runs lint passes over text snapshots and files.
///
/// Every pass resolves the grammar, parses the full text and derives all
/// ranges from that one snapshot. A `Linter` holds no per-document state
/// and can be shared between threads.
pub struct Linter {
    config: LinterConfig,
    resolver: VersionResolver,
    rules: RuleSet,
    fast_rules: RuleSet,
    file_finder: FileFinder,
}

impl Linter {
    /// Creates a new linter with the given configuration.
    pub fn new(config: LinterConfig) -> Result<Self, LinterError> {
        let default_language = Language::new(config.default_version()?)
            .map_err(|e| LinterError::config(e.to_string()))?;
        let resolver = VersionResolver::new(default_language);

        let available = builtin_rules()?;
        for id in config.rules.keys() {
            if available.get(id).is_none() {
                warn!("Unknown rule '{}' in configuration", id);
            }
        }

        let rules: RuleSet = available
            .iter()
            .filter(|rule| config.is_rule_enabled(rule.id()))
            .map(|rule| match config.rules.get(rule.id()).and_then(|s| s.severity()) {
                Some(severity) => rule.clone().with_severity(severity),
                None => rule.clone(),
            })
            .collect();
        let fast_rules = rules.only(&[NoUnsizedUint::ID]);
        debug!("Enabled rules: {:?}", rules.ids());

        let file_finder = FileFinder::new(&config.include, &config.exclude)?
            .with_extensions(Language::latest().extensions());

        Ok(Self {
            config,
            resolver,
            rules,
            fast_rules,
            file_finder,
        })
    }

    pub fn config(&self) -> &LinterConfig {
        &self.config
    }

    pub fn resolver(&self) -> &VersionResolver {
        &self.resolver
    }

    /// Every enabled rule.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// The rules of the always-on pass run on every change.
    pub fn fast_rules(&self) -> &RuleSet {
        &self.fast_rules
    }

    /// Lints one snapshot with `rules`.
    pub fn lint_text(&self, text: &str, rules: &RuleSet) -> Result<LintOutcome, PassError> {
        let language = self.resolver.resolve(text);
        let arena = CstArena::with_capacity(text.len().saturating_mul(4));
        let output = language.parse(&arena, RuleKind::SourceUnit, text)?;

        let run = run_rules(&output.create_cursor(), text, rules)?;
        debug!(
            "Lint pass: {} diagnostic(s), {} syntax error(s), {} failed rule(s)",
            run.diagnostics.len(),
            output.errors().len(),
            run.failures.len()
        );

        Ok(LintOutcome {
            version: language.version().clone(),
            diagnostics: run.diagnostics,
            syntax_errors: output.errors().to_vec(),
            failures: run.failures,
        })
    }

    /// Parses one snapshot and reports its syntax errors as diagnostics.
    pub fn validate_text(&self, text: &str) -> Result<Vec<Diagnostic>, PassError> {
        let language = self.resolver.resolve(text);
        let arena = CstArena::with_capacity(text.len().saturating_mul(4));
        let output = language.parse(&arena, RuleKind::SourceUnit, text)?;

        Ok(syntax_diagnostics(text, output.errors())?)
    }

    /// Lints files matching the given patterns, relative to `base_dir`.
    pub fn lint_patterns(&self, patterns: &[String], base_dir: &Path) -> LintFilesResult {
        let files = self.file_finder.discover_files(patterns, base_dir)?;
        self.lint_files(&files)
    }

    /// Lints multiple files in parallel.
    ///
    /// Returns a tuple of (successful results, failed files with errors).
    pub fn lint_files(&self, paths: &[PathBuf]) -> LintFilesResult {
        let results: Vec<Result<LintResult, (PathBuf, LinterError)>> = paths
            .par_iter()
            .map(|path| self.lint_file(path).map_err(|e| (path.clone(), e)))
            .collect();

        let mut successes = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(lint_result) => successes.push(lint_result),
                Err((path, error)) => {
                    warn!("Failed to lint {}: {}", path.display(), error);
                    failures.push((path, error));
                }
            }
        }

        Ok((successes, failures))
    }

    /// Lints a single file with every enabled rule.
    pub fn lint_file(&self, path: &Path) -> Result<LintResult, LinterError> {
        let content = fs::read_to_string(path)
            .map_err(|e| LinterError::file(format!("Failed to read {}: {}", path.display(), e)))?;

        let outcome = self.lint_text(&content, &self.rules)?;
        let mut diagnostics = outcome.diagnostics;
        diagnostics.extend(
            syntax_diagnostics(&content, &outcome.syntax_errors).map_err(PassError::from)?,
        );

        Ok(LintResult {
            path: path.to_path_buf(),
            version: outcome.version,
            diagnostics,
            failed_rules: outcome.failures.len(),
        })
    }
}

/// Converts syntax errors into `Error` diagnostics.
pub fn syntax_diagnostics(
    text: &str,
    errors: &[SyntaxError],
) -> Result<Vec<Diagnostic>, RangeError> {
    let index = LineIndex::new(text);
    errors
        .iter()
        .map(|error| {
            Ok(Diagnostic::new(
                SYNTAX_RULE_ID,
                error.message.clone(),
                error.range,
                index.range(error.range)?,
            )
            .with_severity(Severity::Error))
        })
        .collect()
}
