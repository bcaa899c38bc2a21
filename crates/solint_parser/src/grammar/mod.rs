//! Error-tolerant recursive descent parser.
//!
//! Nodes are built bottom-up on a stack of open frames. Trivia is attached
//! to whichever frame is open when the next significant token is consumed,
//! except that opening a node first flushes pending trivia into its parent,
//! so rule ranges start at their first significant token.

mod items;
mod statements;
mod types;

use semver::Version;
use solint_cst::{CstArena, CstNode, EdgeLabel, RuleKind, TextRange, TokenKind};

use crate::lexer::Token;
use crate::{LanguageFeature, ParseError, SyntaxError};

struct Frame<'a> {
    kind: RuleKind,
    label: Option<EdgeLabel>,
    children: Vec<CstNode<'a>>,
}

pub(crate) struct Grammar<'a, 's> {
    arena: &'a CstArena,
    source: &'s str,
    tokens: Vec<Token>,
    pos: usize,
    version: &'s Version,
    /// `frames[0]` is a sentinel that receives the finished root.
    frames: Vec<Frame<'a>>,
    errors: Vec<SyntaxError>,
}

impl<'a, 's> Grammar<'a, 's> {
    pub(crate) fn new(arena: &'a CstArena, source: &'s str, tokens: Vec<Token>, version: &'s Version) -> Self {
        Self {
            arena,
            source,
            tokens,
            pos: 0,
            version,
            frames: vec![Frame {
                kind: RuleKind::SourceUnit,
                label: None,
                children: Vec::new(),
            }],
            errors: Vec::new(),
        }
    }

    /// Parses the whole input starting at `entry`.
    pub(crate) fn parse(
        mut self,
        entry: RuleKind,
    ) -> Result<(&'a CstNode<'a>, Vec<SyntaxError>), ParseError> {
        match entry {
            RuleKind::SourceUnit => self.source_unit(),
            RuleKind::ContractDefinition => self.contract_definition(),
            RuleKind::StructDefinition => self.struct_definition(),
            RuleKind::TypeName => self.type_name(None),
            RuleKind::Block => self.block(None),
            other => return Err(ParseError::UnsupportedEntryRule(other)),
        }

        if self.pos < self.tokens.len() {
            self.absorb_rest(entry);
        }

        let root = self
            .frames
            .pop()
            .and_then(|mut sentinel| sentinel.children.pop())
            .unwrap_or_else(|| CstNode::new_rule(entry, TextRange::empty(0), &[]));
        Ok((self.arena.alloc(root), self.errors))
    }

    /// Moves input left over after the entry rule into the root node.
    fn absorb_rest(&mut self, entry: RuleKind) {
        let Some(root) = self.frames.last_mut().and_then(|sentinel| sentinel.children.pop()) else {
            return;
        };
        self.frames.push(Frame {
            kind: entry,
            label: None,
            children: root.children.to_vec(),
        });

        if !self.at_end() {
            self.error_here(format!("Unexpected input after {entry}"));
            self.start(RuleKind::Unrecognized);
            while !self.at_end() {
                self.bump();
            }
            self.finish();
        }
        self.eat_trivia();
        self.finish();
    }

    // --- token stream ---------------------------------------------------

    fn significant(&self) -> impl Iterator<Item = &Token> {
        self.tokens
            .get(self.pos..)
            .unwrap_or_default()
            .iter()
            .filter(|token| !token.kind.is_trivia())
    }

    fn nth(&self, n: usize) -> Option<&Token> {
        self.significant().nth(n)
    }

    fn peek(&self) -> Option<TokenKind> {
        self.nth_kind(0)
    }

    fn nth_kind(&self, n: usize) -> Option<TokenKind> {
        self.nth(n).map(|token| token.kind)
    }

    /// Kinds of the next `limit` significant tokens.
    fn lookahead(&self, limit: usize) -> Vec<TokenKind> {
        self.significant().take(limit).map(|token| token.kind).collect()
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek() == Some(kind)
    }

    fn at_end(&self) -> bool {
        self.peek().is_none()
    }

    /// True if the next token is an identifier spelled `text`.
    fn at_contextual(&self, text: &str) -> bool {
        self.nth(0)
            .is_some_and(|token| token.kind == TokenKind::Identifier && self.text_of(token) == text)
    }

    fn text_of(&self, token: &Token) -> &'s str {
        token.range.slice(self.source).unwrap_or_default()
    }

    fn offset(&self) -> u32 {
        self.tokens
            .get(self.pos)
            .map_or(self.source.len() as u32, |token| token.range.start)
    }

    // --- tree building ----------------------------------------------------

    fn push(&mut self, node: CstNode<'a>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.children.push(node);
        }
    }

    fn push_token(&mut self, token: Token, kind: TokenKind, label: Option<EdgeLabel>) {
        let text = self.arena.alloc_str(self.text_of(&token));
        let mut node = CstNode::new_token(kind, token.range, text);
        node.label = label;
        self.push(node);
    }

    fn eat_trivia(&mut self) {
        while let Some(&token) = self.tokens.get(self.pos) {
            if !token.kind.is_trivia() {
                break;
            }
            self.push_token(token, token.kind, None);
            self.pos += 1;
        }
    }

    fn bump_with(&mut self, kind: Option<TokenKind>, label: Option<EdgeLabel>) {
        self.eat_trivia();
        if let Some(&token) = self.tokens.get(self.pos) {
            self.push_token(token, kind.unwrap_or(token.kind), label);
            self.pos += 1;
        }
    }

    /// Consumes the next significant token.
    fn bump(&mut self) {
        self.bump_with(None, None);
    }

    /// Consumes the next token re-tagged as `kind` (contextual keywords).
    fn bump_as(&mut self, kind: TokenKind) {
        self.bump_with(Some(kind), None);
    }

    fn bump_labeled(&mut self, label: EdgeLabel) {
        self.bump_with(None, Some(label));
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error_expected(kind.as_str());
        false
    }

    /// An identifier tagged as the name of the enclosing node.
    fn expect_name(&mut self) -> bool {
        if self.at(TokenKind::Identifier) {
            self.bump_labeled(EdgeLabel::Name);
            return true;
        }
        self.error_expected("Identifier");
        false
    }

    fn start(&mut self, kind: RuleKind) {
        self.start_with(kind, None);
    }

    fn start_labeled(&mut self, kind: RuleKind, label: EdgeLabel) {
        self.start_with(kind, Some(label));
    }

    fn start_with(&mut self, kind: RuleKind, label: Option<EdgeLabel>) {
        if self.frames.len() > 1 {
            self.eat_trivia();
        }
        self.frames.push(Frame {
            kind,
            label,
            children: Vec::new(),
        });
    }

    /// Reopens the last finished child as the first child of a new node.
    fn wrap_last(&mut self, kind: RuleKind) {
        let last = self.frames.last_mut().and_then(|frame| frame.children.pop());
        self.frames.push(Frame {
            kind,
            label: None,
            children: last.into_iter().collect(),
        });
    }

    fn finish(&mut self) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        let range = match (frame.children.first(), frame.children.last()) {
            (Some(first), Some(last)) => TextRange::new(first.range.start, last.range.end),
            _ => TextRange::empty(self.offset()),
        };
        let children = self.arena.alloc_slice_copy(&frame.children);
        let mut node = CstNode::new_rule(frame.kind, range, children);
        node.label = frame.label;
        self.push(node);
    }

    fn last_child_count(&self) -> usize {
        self.frames.last().map_or(0, |frame| frame.children.len())
    }

    // --- errors and recovery --------------------------------------------

    fn error_at(&mut self, message: impl Into<String>, range: TextRange) {
        self.errors.push(SyntaxError::new(message, range));
    }

    fn error_here(&mut self, message: impl Into<String>) {
        let range = self
            .nth(0)
            .map_or(TextRange::empty(self.source.len() as u32), |token| token.range);
        self.error_at(message, range);
    }

    fn error_expected(&mut self, expected: &str) {
        let found = match self.nth(0) {
            Some(token) => format!("'{}'", self.text_of(token)),
            None => "end of input".to_string(),
        };
        self.error_here(format!("Expected {expected}, found {found}"));
    }

    /// Records an error if `feature` is unavailable in the target version.
    /// The construct is parsed either way.
    fn require(&mut self, feature: LanguageFeature) {
        if let Some(message) = feature.unavailable_message(self.version) {
            self.error_here(message);
        }
    }

    fn feature_enabled(&self, feature: LanguageFeature) -> bool {
        feature.is_enabled(self.version)
    }

    /// Consumes one token, or a whole bracketed group when it opens one.
    fn bump_balanced(&mut self) {
        let Some(open) = self.peek() else {
            return;
        };
        self.bump();
        let Some(close) = closer_of(open) else {
            return;
        };
        let mut depth = 1usize;
        while let Some(kind) = self.peek() {
            self.bump();
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth -= 1;
                if depth == 0 {
                    return;
                }
            }
        }
    }

    /// Wraps input that fits nowhere into an `Unrecognized` node.
    ///
    /// Always consumes at least one token. Stops before a closing bracket or
    /// a token accepted by `stop`, and after a `;`.
    fn skip_unrecognized(&mut self, message: &str, stop: fn(TokenKind) -> bool) {
        self.error_here(message);
        self.start(RuleKind::Unrecognized);
        let first = self.peek();
        self.bump_balanced();
        if first != Some(TokenKind::Semicolon) {
            while let Some(kind) = self.peek() {
                if stop(kind) || is_closer(kind) {
                    break;
                }
                if kind == TokenKind::Semicolon {
                    self.bump();
                    break;
                }
                self.bump_balanced();
            }
        }
        self.finish();
    }

    /// Runs `item` until `end` or end of input, guaranteeing progress.
    fn list_until(
        &mut self,
        end: TokenKind,
        message: &str,
        stop: fn(TokenKind) -> bool,
        mut item: impl FnMut(&mut Self),
    ) {
        while !self.at_end() && !self.at(end) {
            let before = self.pos;
            item(self);
            if self.pos == before {
                self.skip_unrecognized(message, stop);
            }
        }
    }

    /// A balanced run of tokens kept as one `Expression` node.
    ///
    /// Ends before a `;`, an unmatched closing bracket or, outside of
    /// brackets, any token in `stop`.
    fn expression(&mut self, label: EdgeLabel, stop: &[TokenKind]) {
        self.start_labeled(RuleKind::Expression, label);
        let mut open: Vec<TokenKind> = Vec::new();
        while let Some(kind) = self.peek() {
            if kind == TokenKind::Semicolon || (open.is_empty() && stop.contains(&kind)) {
                break;
            }
            if let Some(close) = closer_of(kind) {
                open.push(close);
            } else if is_closer(kind) {
                if open.last() != Some(&kind) {
                    break;
                }
                open.pop();
            }
            self.bump();
        }
        if self.last_child_count() == 0 {
            self.error_expected("expression");
        }
        self.finish();
    }
}

fn closer_of(kind: TokenKind) -> Option<TokenKind> {
    match kind {
        TokenKind::OpenParen => Some(TokenKind::CloseParen),
        TokenKind::OpenBracket => Some(TokenKind::CloseBracket),
        TokenKind::OpenBrace => Some(TokenKind::CloseBrace),
        _ => None,
    }
}

fn is_closer(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::CloseParen | TokenKind::CloseBracket | TokenKind::CloseBrace
    )
}
