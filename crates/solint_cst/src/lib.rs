//! # solint_cst
//!
//! Concrete syntax tree for Solidity sources.
//!
//! The tree is lossless: every byte of the source, trivia included, belongs
//! to exactly one token. Rule nodes carry the grammar production they came
//! from and children may carry an [`EdgeLabel`] naming their role.
//!
//! ## Architecture
//!
//! - Nodes are allocated in a `bumpalo` arena ([`CstArena`]), one per parse
//! - [`CstNode`] is `Copy` and borrows its children and text from the arena
//! - [`Cursor`] walks a tree in pre-order and remembers its ancestors
//! - [`Query`] is a compiled structural pattern, run through [`Cursor::query`]
//!
//! ## Example
//!
//! ```rust
//! use solint_cst::{CstArena, CstNode, Cursor, Query, RuleKind, TextRange, TokenKind};
//!
//! let arena = CstArena::new();
//! let uint = CstNode::new_token(TokenKind::UintKeyword, TextRange::new(0, 4), arena.alloc_str("uint"));
//! let root = arena.alloc(CstNode::new_rule(
//!     RuleKind::TypeName,
//!     TextRange::new(0, 4),
//!     arena.alloc_slice_copy(&[uint]),
//! ));
//!
//! let query = Query::parse("@unsized_uint [UintKeyword]").unwrap();
//! let matches: Vec<_> = Cursor::new(root).query(&[query]).collect();
//! assert_eq!(matches.len(), 1);
//! ```

mod arena;
mod cursor;
mod kind;
mod node;
pub mod query;
mod range;

pub use arena::CstArena;
pub use cursor::Cursor;
pub use kind::{EdgeLabel, NodeKind, RuleKind, TokenKind};
pub use node::CstNode;
pub use query::{Query, QueryError, QueryMatch, QueryMatchIterator};
pub use range::TextRange;
