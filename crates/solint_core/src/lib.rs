//! # solint_core
//!
//! Core lint engine for solint.
//!
//! This crate provides:
//! - Translation of tree ranges into editor positions
//! - Grammar version resolution from `pragma solidity` directives
//! - The query-based rule engine and the built-in rules
//! - Configuration loading
//! - The [`Linter`], which runs lint and validation passes over text
//!   snapshots and files
//!
//! ## Example
//!
//! ```rust
//! use solint_core::{Linter, LinterConfig};
//!
//! let linter = Linter::new(LinterConfig::new()).unwrap();
//! let outcome = linter
//!     .lint_text("struct Foo { uint foo; uint256 bar; }", linter.rules())
//!     .unwrap();
//!
//! assert_eq!(outcome.diagnostics.len(), 1);
//! assert_eq!(outcome.diagnostics[0].message, "Use uint256 directly.");
//! ```

mod config;
mod diagnostic;
mod engine;
mod error;
pub mod file_finder;
mod linter;
mod range;
mod resolver;
mod result;
pub mod rules;

pub use config::{CONFIG_FILES, DebounceConfig, LinterConfig, RuleSetting};
pub use diagnostic::{Diagnostic, Severity};
pub use engine::{ConfiguredRule, Finding, Rule, RuleRun, RuleSet, capture_token, run_rules};
pub use error::{LinterError, PassError, RuleError, TransportError};
pub use linter::{LintFilesResult, Linter, SYNTAX_RULE_ID, syntax_diagnostics};
pub use range::{LineIndex, Position, Range, RangeError, translate};
pub use resolver::{ConstraintError, VersionConstraint, VersionResolver};
pub use result::{LintOutcome, LintResult};
pub use solint_cst::TextRange;
