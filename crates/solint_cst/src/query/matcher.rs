//! Query execution.

use std::collections::{BTreeMap, VecDeque};

use super::{Matcher, NodeMatcher, Query};
use crate::Cursor;

type Bindings<'a> = BTreeMap<String, Vec<Cursor<'a>>>;

/// One successful match of a query at some root node.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryMatch<'a> {
    /// Position of the matching query in the list passed to [`Cursor::query`].
    pub query_index: usize,
    /// The node the query's outermost pattern matched.
    pub root: Cursor<'a>,
    bindings: Bindings<'a>,
}

impl<'a> QueryMatch<'a> {
    /// The first node captured under `name`.
    pub fn binding(&self, name: &str) -> Option<&Cursor<'a>> {
        self.bindings.get(name).and_then(|cursors| cursors.first())
    }

    /// Every node captured under `name`, in tree order.
    pub fn bindings(&self, name: &str) -> &[Cursor<'a>] {
        self.bindings.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn binding_names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }
}

/// Lazily yields matches for a set of queries over a pre-order walk.
///
/// Each node is tried against every query, in query order, before the walk
/// moves on. Trivia never starts a match.
#[derive(Debug)]
pub struct QueryMatchIterator<'a> {
    queries: Vec<Query>,
    cursor: Cursor<'a>,
    pending: VecDeque<QueryMatch<'a>>,
    done: bool,
}

impl<'a> QueryMatchIterator<'a> {
    pub(crate) fn new(cursor: Cursor<'a>, queries: Vec<Query>) -> Self {
        Self {
            done: queries.is_empty(),
            queries,
            cursor,
            pending: VecDeque::new(),
        }
    }

    fn visit_current(&mut self) {
        if self.cursor.node().is_trivia() {
            return;
        }
        for (query_index, query) in self.queries.iter().enumerate() {
            let mut seen: Vec<Bindings<'a>> = Vec::new();
            for bindings in match_node(query.root(), &self.cursor) {
                if seen.contains(&bindings) {
                    continue;
                }
                seen.push(bindings.clone());
                self.pending.push_back(QueryMatch {
                    query_index,
                    root: self.cursor.clone(),
                    bindings,
                });
            }
        }
    }
}

impl<'a> Iterator for QueryMatchIterator<'a> {
    type Item = QueryMatch<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(found) = self.pending.pop_front() {
                return Some(found);
            }
            if self.done {
                return None;
            }
            self.visit_current();
            if !self.cursor.go_to_next() {
                self.done = true;
            }
        }
    }
}

fn match_node<'a>(matcher: &NodeMatcher, cursor: &Cursor<'a>) -> Vec<Bindings<'a>> {
    if !matcher.accepts(cursor.node()) {
        return Vec::new();
    }

    let children = cursor.significant_children();
    let mut results = match_children(&matcher.children, &children);
    if let Some(name) = &matcher.binding {
        for bindings in &mut results {
            let slot = bindings.entry(name.clone()).or_default();
            slot.insert(0, cursor.clone());
        }
    }
    results
}

/// Matches `matchers` against an in-order subsequence of `children`.
fn match_children<'a>(matchers: &[Matcher], children: &[Cursor<'a>]) -> Vec<Bindings<'a>> {
    let Some((first, rest)) = matchers.split_first() else {
        return vec![Bindings::new()];
    };

    if let Matcher::Ellipsis = first {
        return match_children(rest, children);
    }

    let mut results = Vec::new();
    for (index, child) in children.iter().enumerate() {
        let heads = match first {
            Matcher::Node(node) => match_node(node, child),
            Matcher::Binding(name) => vec![Bindings::from([(name.clone(), vec![child.clone()])])],
            Matcher::Ellipsis => unreachable!("handled above"),
        };
        if heads.is_empty() {
            continue;
        }
        let tails = match_children(rest, &children[index + 1..]);
        for head in &heads {
            for tail in &tails {
                results.push(merge(head.clone(), tail));
            }
        }
    }
    results
}

fn merge<'a>(mut into: Bindings<'a>, from: &Bindings<'a>) -> Bindings<'a> {
    for (name, cursors) in from {
        into.entry(name.clone())
            .or_default()
            .extend(cursors.iter().cloned());
    }
    into
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CstArena, CstNode, EdgeLabel, RuleKind, TextRange, TokenKind};
    use pretty_assertions::assert_eq;

    // struct S { uint a; uint256 S; }
    fn build(arena: &CstArena) -> &CstNode<'_> {
        let tok = |kind, start, end, text: &str| {
            CstNode::new_token(kind, TextRange::new(start, end), arena.alloc_str(text))
        };
        let space = |at: u32| tok(TokenKind::Whitespace, at, at + 1, " ");
        let member = |ty: &str, ty_start: u32, name: &str| {
            let ty_end = ty_start + ty.len() as u32;
            let name_start = ty_end + 1;
            let name_end = name_start + name.len() as u32;
            CstNode::new_rule(
                RuleKind::StructMember,
                TextRange::new(ty_start, name_end + 1),
                arena.alloc_slice_copy(&[
                    tok(TokenKind::UintKeyword, ty_start, ty_end, ty).with_label(EdgeLabel::TypeName),
                    space(ty_end),
                    tok(TokenKind::Identifier, name_start, name_end, name).with_label(EdgeLabel::Name),
                    tok(TokenKind::Semicolon, name_end, name_end + 1, ";"),
                ]),
            )
        };
        let members = CstNode::new_rule(
            RuleKind::StructMembers,
            TextRange::new(11, 29),
            arena.alloc_slice_copy(&[member("uint", 11, "a"), space(18), member("uint256", 19, "S")]),
        )
        .with_label(EdgeLabel::Members);
        arena.alloc(CstNode::new_rule(
            RuleKind::StructDefinition,
            TextRange::new(0, 31),
            arena.alloc_slice_copy(&[
                tok(TokenKind::StructKeyword, 0, 6, "struct"),
                space(6),
                tok(TokenKind::Identifier, 7, 8, "S").with_label(EdgeLabel::Name),
                space(8),
                tok(TokenKind::OpenBrace, 9, 10, "{"),
                space(10),
                members,
                space(29),
                tok(TokenKind::CloseBrace, 30, 31, "}"),
            ]),
        ))
    }

    fn texts<'a>(cursors: &[Cursor<'a>]) -> Vec<&'a str> {
        cursors.iter().filter_map(|c| c.node().text).collect()
    }

    #[test]
    fn test_token_query_matches_every_occurrence() {
        let arena = CstArena::new();
        let root = build(&arena);
        let query = Query::parse("@unsized_uint [UintKeyword]").unwrap();

        let matches: Vec<_> = Cursor::new(root).query(&[query]).collect();

        assert_eq!(matches.len(), 2);
        let found: Vec<_> = matches
            .iter()
            .filter_map(|m| m.binding("unsized_uint"))
            .filter_map(|c| c.node().text)
            .collect();
        assert_eq!(found, ["uint", "uint256"]);
        assert_eq!(matches[0].root, matches[0].bindings("unsized_uint")[0]);
    }

    #[test]
    fn test_struct_query_yields_one_match_per_field() {
        let arena = CstArena::new();
        let root = build(&arena);
        let query = Query::parse(
            "[StructDefinition [name: @struct_name], ..., [StructMembers [StructMember [name: @field_name]]]]",
        )
        .unwrap();

        let matches: Vec<_> = Cursor::new(root).query(&[query]).collect();

        assert_eq!(matches.len(), 2);
        for m in &matches {
            assert_eq!(texts(m.bindings("struct_name")), ["S"]);
        }
        assert_eq!(texts(matches[0].bindings("field_name")), ["a"]);
        assert_eq!(texts(matches[1].bindings("field_name")), ["S"]);
        assert_eq!(
            matches[1].binding("field_name").unwrap().text_range(),
            TextRange::new(27, 28)
        );
    }

    #[test]
    fn test_multiple_queries_report_their_index() {
        let arena = CstArena::new();
        let root = build(&arena);
        let queries = [
            Query::parse("[StructDefinition]").unwrap(),
            Query::parse("@semi [Semicolon]").unwrap(),
        ];

        let indices: Vec<_> = Cursor::new(root)
            .query(&queries)
            .map(|m| m.query_index)
            .collect();

        assert_eq!(indices, [0, 1, 1]);
    }

    #[test]
    fn test_text_constraint_and_no_match() {
        let arena = CstArena::new();
        let root = build(&arena);

        let exact = Query::parse(r#"@t [UintKeyword "uint"]"#).unwrap();
        let none = Query::parse("[ContractDefinition]").unwrap();

        assert_eq!(Cursor::new(root).query(&[exact]).count(), 1);
        assert_eq!(Cursor::new(root).query(&[none]).count(), 0);
        assert_eq!(Cursor::new(root).query(&[]).count(), 0);
    }

    #[test]
    fn test_wildcard_never_roots_at_trivia() {
        let arena = CstArena::new();
        let root = build(&arena);
        let any = Query::parse("[_]").unwrap();

        let matches: Vec<_> = Cursor::new(root).query(&[any]).collect();

        assert!(matches.iter().all(|m| !m.root.node().is_trivia()));
        // 4 rules, 4 struct tokens, 2 * 3 member tokens
        assert_eq!(matches.len(), 14);
    }

    #[test]
    fn test_order_of_children_is_respected() {
        let arena = CstArena::new();
        let root = build(&arena);
        let reversed = Query::parse("[StructDefinition [OpenBrace] [name: @n]]").unwrap();

        assert_eq!(Cursor::new(root).query(&[reversed]).count(), 0);
    }
}
