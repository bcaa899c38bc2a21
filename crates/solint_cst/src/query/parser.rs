//! Query compiler.

use crate::{EdgeLabel, NodeKind};

use super::{Matcher, NodeMatcher, QueryError};

pub(super) fn parse(source: &str) -> Result<NodeMatcher, QueryError> {
    let mut parser = QueryParser { source, pos: 0 };
    let matcher = parser.matcher()?;
    parser.skip_whitespace();
    if parser.pos < source.len() {
        return Err(QueryError::syntax("unexpected trailing input", parser.pos));
    }

    match matcher {
        Matcher::Node(node) => Ok(node),
        Matcher::Binding(_) | Matcher::Ellipsis => Err(QueryError::syntax(
            "a query must start with a node pattern '[...]'",
            0,
        )),
    }
}

struct QueryParser<'s> {
    source: &'s str,
    pos: usize,
}

impl QueryParser<'_> {
    fn peek(&self) -> Option<char> {
        self.source.get(self.pos..)?.chars().next()
    }

    fn rest(&self) -> &str {
        self.source.get(self.pos..).unwrap_or_default()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), QueryError> {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            Ok(())
        } else {
            Err(QueryError::syntax(format!("expected '{expected}'"), self.pos))
        }
    }

    fn identifier(&mut self) -> Option<&str> {
        let start = self.pos;
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|(i, c)| {
                if *i == 0 {
                    !(c.is_ascii_alphabetic() || *c == '_')
                } else {
                    !(c.is_ascii_alphanumeric() || *c == '_')
                }
            })
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        if len == 0 {
            return None;
        }
        self.pos += len;
        self.source.get(start..start + len)
    }

    fn binding(&mut self) -> Result<String, QueryError> {
        self.expect('@')?;
        let at = self.pos;
        self.identifier()
            .map(str::to_string)
            .ok_or_else(|| QueryError::syntax("expected a binding name after '@'", at))
    }

    fn matcher(&mut self) -> Result<Matcher, QueryError> {
        self.skip_whitespace();
        if self.rest().starts_with("...") {
            self.pos += 3;
            return Ok(Matcher::Ellipsis);
        }

        let prefix = if self.peek() == Some('@') {
            Some(self.binding()?)
        } else {
            None
        };
        self.skip_whitespace();

        if self.peek() == Some('[') {
            let at = self.pos;
            let mut node = self.node_matcher()?;
            if let Some(name) = prefix {
                if node.binding.is_some() {
                    return Err(QueryError::syntax("node pattern is bound twice", at));
                }
                node.binding = Some(name);
            }
            return Ok(Matcher::Node(node));
        }

        match prefix {
            Some(name) => Ok(Matcher::Binding(name)),
            None => Err(QueryError::syntax("expected '[', '@' or '...'", self.pos)),
        }
    }

    fn node_matcher(&mut self) -> Result<NodeMatcher, QueryError> {
        self.expect('[')?;
        let mut node = NodeMatcher::default();
        self.skip_whitespace();

        // `label:` prefix
        let checkpoint = self.pos;
        if let Some(name) = self.identifier().map(str::to_string) {
            self.skip_whitespace();
            if self.peek() == Some(':') {
                self.pos += 1;
                node.label = Some(EdgeLabel::from_name(&name).ok_or(QueryError::UnknownLabel {
                    name,
                    offset: checkpoint,
                })?);
            } else {
                self.pos = checkpoint;
            }
        }
        self.skip_whitespace();

        if self.peek() == Some('@') {
            node.binding = Some(self.binding()?);
            self.skip_whitespace();
        }

        let kind_at = self.pos;
        if let Some(name) = self.identifier().map(str::to_string) {
            if name != "_" {
                let kind = NodeKind::from_name(&name).ok_or(QueryError::UnknownKind {
                    name,
                    offset: kind_at,
                })?;
                node.kind = Some(kind);
            }
            self.skip_whitespace();
        }

        if self.peek() == Some('"') {
            node.text = Some(self.string()?);
        }

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(']') => {
                    self.pos += 1;
                    return Ok(node);
                }
                None => return Err(QueryError::syntax("unclosed '['", self.pos)),
                Some(_) => {
                    node.children.push(self.matcher()?);
                    self.skip_whitespace();
                    if self.peek() == Some(',') {
                        self.pos += 1;
                    }
                }
            }
        }
    }

    fn string(&mut self) -> Result<String, QueryError> {
        let start = self.pos;
        self.expect('"')?;
        let mut value = String::new();
        let mut escaped = false;
        while let Some(c) = self.peek() {
            self.pos += c.len_utf8();
            match (escaped, c) {
                (true, _) => {
                    value.push(c);
                    escaped = false;
                }
                (false, '\\') => escaped = true,
                (false, '"') => return Ok(value),
                (false, _) => value.push(c),
            }
        }
        Err(QueryError::syntax("unterminated string", start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RuleKind, TokenKind};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_prefix_binding() {
        let root = parse("@unsized_uint [UintKeyword]").unwrap();
        assert_eq!(root.binding.as_deref(), Some("unsized_uint"));
        assert_eq!(root.kind, Some(NodeKind::Token(TokenKind::UintKeyword)));
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_struct_field_query_shape() {
        let root = parse(
            "[StructDefinition
                [name: @struct_name],
                ...,
                [StructMembers [StructMember [name: @field_name]]]
            ]",
        )
        .unwrap();

        assert_eq!(root.kind, Some(NodeKind::Rule(RuleKind::StructDefinition)));
        assert_eq!(root.children.len(), 3);
        assert_eq!(
            root.children[0],
            Matcher::Node(NodeMatcher {
                binding: Some("struct_name".to_string()),
                label: Some(EdgeLabel::Name),
                ..Default::default()
            })
        );
        assert_eq!(root.children[1], Matcher::Ellipsis);
    }

    #[test]
    fn test_text_and_wildcard() {
        let root = parse(r#"[_ [UintKeyword "uint"], @rest]"#).unwrap();
        assert_eq!(root.kind, None);
        let Matcher::Node(first) = &root.children[0] else {
            panic!("expected node matcher");
        };
        assert_eq!(first.text.as_deref(), Some("uint"));
        assert_eq!(root.children[1], Matcher::Binding("rest".to_string()));
    }

    #[rstest]
    #[case::unknown_kind("[Structure]", "Unknown node kind 'Structure'")]
    #[case::unknown_label("[nam: @x]", "Unknown edge label 'nam'")]
    #[case::unclosed("[StructDefinition", "unclosed '['")]
    #[case::bare_binding("@x", "must start with a node pattern")]
    #[case::trailing("[Block] junk", "unexpected trailing input")]
    #[case::empty_binding("[@ Block]", "expected a binding name")]
    #[case::double_binding("@a [@b Block]", "bound twice")]
    #[case::unterminated_string(r#"[Identifier "abc]"#, "unterminated string")]
    fn test_invalid_queries(#[case] source: &str, #[case] expected: &str) {
        let err = parse(source).unwrap_err();
        assert!(
            err.to_string().contains(expected),
            "'{}' should contain '{}'",
            err,
            expected
        );
    }
}
