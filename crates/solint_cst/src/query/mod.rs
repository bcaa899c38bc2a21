//! Structural queries over the syntax tree.
//!
//! A query is a pattern over tree shape with named captures ("bindings").
//! Queries are compiled once with [`Query::parse`] and can be shared across
//! trees and threads.
//!
//! # Syntax
//!
//! ```text
//! matcher  := binding? '[' (label ':')? binding? (Kind | '_')? string? children ']'
//!           | binding          any single node, bound to the name
//!           | '...'            an explicit gap between children
//! children := (matcher ','?)*
//! binding  := '@' identifier
//! string   := '"' exact token text '"'
//! ```
//!
//! Child matchers match an in-order subsequence of a node's non-trivia
//! children, so gaps between them are always allowed. Each distinct way of
//! binding the captures is reported as its own match.
//!
//! # Example
//!
//! ```rust
//! use solint_cst::Query;
//!
//! let query = Query::parse(
//!     "[StructDefinition [name: @struct_name], ..., [StructMembers [StructMember [name: @field_name]]]]",
//! )
//! .unwrap();
//! assert_eq!(query.binding_names(), ["field_name", "struct_name"]);
//! ```

mod matcher;
mod parser;

use std::collections::BTreeSet;
use std::sync::Arc;

use thiserror::Error;

use crate::{CstNode, EdgeLabel, NodeKind};

pub use matcher::{QueryMatch, QueryMatchIterator};

/// Errors raised while compiling a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Invalid query syntax at offset {offset}: {message}")]
    Syntax { message: String, offset: usize },

    #[error("Unknown node kind '{name}' at offset {offset}")]
    UnknownKind { name: String, offset: usize },

    #[error("Unknown edge label '{name}' at offset {offset}")]
    UnknownLabel { name: String, offset: usize },
}

impl QueryError {
    pub(crate) fn syntax(message: impl Into<String>, offset: usize) -> Self {
        Self::Syntax {
            message: message.into(),
            offset,
        }
    }
}

/// A compiled query. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct Query {
    inner: Arc<QueryInner>,
}

#[derive(Debug)]
struct QueryInner {
    source: String,
    root: NodeMatcher,
}

impl Query {
    /// Compiles a query from its textual form.
    pub fn parse(source: &str) -> Result<Self, QueryError> {
        let root = parser::parse(source)?;
        Ok(Self {
            inner: Arc::new(QueryInner {
                source: source.to_string(),
                root,
            }),
        })
    }

    /// The text the query was compiled from.
    pub fn source(&self) -> &str {
        &self.inner.source
    }

    /// Every binding name used in the query, sorted and de-duplicated.
    pub fn binding_names(&self) -> Vec<&str> {
        let mut names = BTreeSet::new();
        self.inner.root.collect_bindings(&mut names);
        names.into_iter().collect()
    }

    pub(crate) fn root(&self) -> &NodeMatcher {
        &self.inner.root
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Matcher {
    Node(NodeMatcher),
    /// `@name` on its own: any node.
    Binding(String),
    /// `...`
    Ellipsis,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct NodeMatcher {
    pub binding: Option<String>,
    pub label: Option<EdgeLabel>,
    pub kind: Option<NodeKind>,
    pub text: Option<String>,
    pub children: Vec<Matcher>,
}

impl NodeMatcher {
    /// Checks the node itself; children are matched separately.
    pub(crate) fn accepts(&self, node: &CstNode<'_>) -> bool {
        if self.label.is_some() && node.label != self.label {
            return false;
        }
        if self.kind.is_some_and(|kind| kind != node.kind) {
            return false;
        }
        match &self.text {
            Some(expected) => node.text == Some(expected.as_str()),
            None => true,
        }
    }

    fn collect_bindings<'q>(&'q self, names: &mut BTreeSet<&'q str>) {
        if let Some(binding) = &self.binding {
            names.insert(binding.as_str());
        }
        for child in &self.children {
            match child {
                Matcher::Node(node) => node.collect_bindings(names),
                Matcher::Binding(name) => {
                    names.insert(name.as_str());
                }
                Matcher::Ellipsis => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RuleKind, TextRange, TokenKind};

    #[test]
    fn test_query_keeps_source() {
        let query = Query::parse("@unsized_uint [UintKeyword]").unwrap();
        assert_eq!(query.source(), "@unsized_uint [UintKeyword]");
        assert_eq!(query.binding_names(), ["unsized_uint"]);
    }

    #[test]
    fn test_accepts_checks_kind_label_and_text() {
        let matcher = NodeMatcher {
            label: Some(EdgeLabel::Name),
            kind: Some(NodeKind::Token(TokenKind::Identifier)),
            text: Some("Foo".to_string()),
            ..Default::default()
        };

        let named = CstNode::new_token(TokenKind::Identifier, TextRange::new(0, 3), "Foo")
            .with_label(EdgeLabel::Name);
        let unlabeled = CstNode::new_token(TokenKind::Identifier, TextRange::new(0, 3), "Foo");
        let other_text = CstNode::new_token(TokenKind::Identifier, TextRange::new(0, 3), "Bar")
            .with_label(EdgeLabel::Name);
        let rule = CstNode::new_rule(RuleKind::StructDefinition, TextRange::new(0, 3), &[])
            .with_label(EdgeLabel::Name);

        assert!(matcher.accepts(&named));
        assert!(!matcher.accepts(&unlabeled));
        assert!(!matcher.accepts(&other_text));
        assert!(!matcher.accepts(&rule));
    }
}
