//! CstNode definition.

use crate::{EdgeLabel, NodeKind, RuleKind, TextRange, TokenKind};

/// A node in the concrete syntax tree.
///
/// Rule nodes own a slice of children; token nodes carry their source text.
/// Trivia (whitespace and comments) is kept as ordinary token children, so
/// concatenating the token texts of a tree reproduces its source exactly.
///
/// # Lifetime
///
/// `'a` ties the node to the [`CstArena`](crate::CstArena) it was allocated in.
///
/// # Example
///
/// ```rust
/// use solint_cst::{CstArena, CstNode, EdgeLabel, RuleKind, TextRange, TokenKind};
///
/// let arena = CstArena::new();
/// let name = CstNode::new_token(TokenKind::Identifier, TextRange::new(0, 3), arena.alloc_str("Foo"))
///     .with_label(EdgeLabel::Name);
/// let children = arena.alloc_slice_copy(&[name]);
/// let member = CstNode::new_rule(RuleKind::StructMember, TextRange::new(0, 3), children);
///
/// assert_eq!(member.children[0].text, Some("Foo"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CstNode<'a> {
    /// Rule or token kind.
    pub kind: NodeKind,

    /// Role of this node inside its parent, if the grammar names one.
    pub label: Option<EdgeLabel>,

    /// Byte range in the source text.
    pub range: TextRange,

    /// Children (empty for tokens).
    pub children: &'a [CstNode<'a>],

    /// Token text (None for rule nodes).
    pub text: Option<&'a str>,
}

impl<'a> CstNode<'a> {
    /// Creates a rule node.
    #[inline]
    pub const fn new_rule(kind: RuleKind, range: TextRange, children: &'a [CstNode<'a>]) -> Self {
        Self {
            kind: NodeKind::Rule(kind),
            label: None,
            range,
            children,
            text: None,
        }
    }

    /// Creates a token node.
    #[inline]
    pub const fn new_token(kind: TokenKind, range: TextRange, text: &'a str) -> Self {
        Self {
            kind: NodeKind::Token(kind),
            label: None,
            range,
            children: &[],
            text: Some(text),
        }
    }

    /// Returns the node with its edge label set.
    #[inline]
    pub const fn with_label(mut self, label: EdgeLabel) -> Self {
        self.label = Some(label);
        self
    }

    #[inline]
    pub const fn is_token(&self) -> bool {
        matches!(self.kind, NodeKind::Token(_))
    }

    /// Returns true for whitespace and comment tokens.
    #[inline]
    pub const fn is_trivia(&self) -> bool {
        match self.kind {
            NodeKind::Token(kind) => kind.is_trivia(),
            NodeKind::Rule(_) => false,
        }
    }

    #[inline]
    pub const fn rule_kind(&self) -> Option<RuleKind> {
        match self.kind {
            NodeKind::Rule(kind) => Some(kind),
            NodeKind::Token(_) => None,
        }
    }

    #[inline]
    pub const fn token_kind(&self) -> Option<TokenKind> {
        match self.kind {
            NodeKind::Token(kind) => Some(kind),
            NodeKind::Rule(_) => None,
        }
    }

    /// Returns the first non-trivia child carrying `label`.
    pub fn child_by_label(&self, label: EdgeLabel) -> Option<&'a CstNode<'a>> {
        let children: &'a [CstNode<'a>] = self.children;
        children
            .iter()
            .find(|child| child.label == Some(label) && !child.is_trivia())
    }

    /// Iterates over children that are not trivia.
    pub fn significant_children(&self) -> impl Iterator<Item = &'a CstNode<'a>> + use<'a> {
        let children: &'a [CstNode<'a>] = self.children;
        children.iter().filter(|child| !child.is_trivia())
    }

    /// Concatenates the text of every token below this node.
    pub fn unparse(&self) -> String {
        let mut out = String::with_capacity(self.range.len() as usize);
        self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) {
        if let Some(text) = self.text {
            out.push_str(text);
        }
        for child in self.children {
            child.write_text(out);
        }
    }
}
