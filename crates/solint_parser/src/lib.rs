//! # solint_parser
//!
//! Solidity grammar library for solint.
//!
//! This crate provides:
//! - A catalogue of supported compiler versions and version-gated features
//! - [`Language`], an error-tolerant parser bound to one version, producing
//!   [`solint_cst`] trees
//! - [`pragma::extract`], which reads `pragma solidity` constraints without
//!   parsing
//!
//! ## Example
//!
//! ```rust
//! use solint_cst::{CstArena, RuleKind};
//! use solint_parser::{Language, pragma};
//!
//! let source = "pragma solidity ^0.8.0;\nstruct Foo { uint bar; }";
//! assert_eq!(pragma::extract(source).version_constraints, ["^0.8.0"]);
//!
//! let arena = CstArena::new();
//! let output = Language::latest().parse(&arena, RuleKind::SourceUnit, source).unwrap();
//! assert_eq!(output.tree().unparse(), source);
//! ```

mod error;
mod grammar;
mod language;
mod lexer;
pub mod pragma;
mod traits;
mod version;

pub use error::{ParseError, SyntaxError};
pub use language::{Language, ParseOutput};
pub use traits::Parser;
pub use version::{LanguageFeature, is_supported, latest_version, supported_versions};
