//! Type names.

use solint_cst::{EdgeLabel, RuleKind, TokenKind};

use super::Grammar;

impl Grammar<'_, '_> {
    pub(super) fn at_type_start(&self) -> bool {
        match self.peek() {
            Some(TokenKind::MappingKeyword | TokenKind::FunctionKeyword | TokenKind::Identifier) => true,
            Some(kind) => kind.is_elementary_type(),
            None => false,
        }
    }

    /// `T`, `T[]`, `T[N][]`, `mapping(K => V)`, `function (...) ...`.
    pub(super) fn type_name(&mut self, label: Option<EdgeLabel>) {
        self.start_with(RuleKind::TypeName, label);
        match self.peek() {
            Some(TokenKind::MappingKeyword) => self.mapping_type(),
            Some(TokenKind::FunctionKeyword) => self.function_type(),
            Some(TokenKind::Identifier) => self.identifier_path(None),
            Some(kind) if kind.is_elementary_type() => self.elementary_type(),
            _ => self.error_expected("a type name"),
        }
        while self.at(TokenKind::OpenBracket) && self.last_child_count() > 0 {
            self.wrap_last(RuleKind::ArrayTypeName);
            self.bump();
            if !self.at(TokenKind::CloseBracket) {
                self.expression(EdgeLabel::Expression, &[]);
            }
            self.expect(TokenKind::CloseBracket);
            self.finish();
        }
        self.finish();
    }

    fn elementary_type(&mut self) {
        self.start(RuleKind::ElementaryType);
        let address = self.at(TokenKind::AddressKeyword);
        self.bump();
        if address {
            self.eat(TokenKind::PayableKeyword);
        }
        self.finish();
    }

    /// `a.b.c`
    pub(super) fn identifier_path(&mut self, label: Option<EdgeLabel>) {
        self.start_with(RuleKind::IdentifierPath, label);
        self.expect(TokenKind::Identifier);
        while self.at(TokenKind::Period) && self.nth_kind(1) == Some(TokenKind::Identifier) {
            self.bump();
            self.bump();
        }
        self.finish();
    }

    fn mapping_type(&mut self) {
        self.start(RuleKind::MappingType);
        self.bump();
        if self.expect(TokenKind::OpenParen) {
            self.type_name(Some(EdgeLabel::KeyType));
            if self.at(TokenKind::Identifier) {
                self.bump_labeled(EdgeLabel::Name);
            }
            self.expect(TokenKind::EqualGreaterThan);
            self.type_name(Some(EdgeLabel::ValueType));
            if self.at(TokenKind::Identifier) {
                self.bump_labeled(EdgeLabel::Name);
            }
            self.expect(TokenKind::CloseParen);
        }
        self.finish();
    }

    fn function_type(&mut self) {
        self.start(RuleKind::FunctionType);
        self.bump();
        self.parameters(EdgeLabel::Parameters);
        while matches!(
            self.peek(),
            Some(
                TokenKind::InternalKeyword
                    | TokenKind::ExternalKeyword
                    | TokenKind::PrivateKeyword
                    | TokenKind::PublicKeyword
                    | TokenKind::PureKeyword
                    | TokenKind::ViewKeyword
                    | TokenKind::PayableKeyword
                    | TokenKind::ConstantKeyword
            )
        ) {
            self.bump();
        }
        if self.at(TokenKind::ReturnsKeyword) {
            self.returns_declaration();
        }
        self.finish();
    }

    pub(super) fn storage_location(&mut self) {
        if matches!(
            self.peek(),
            Some(TokenKind::MemoryKeyword | TokenKind::StorageKeyword | TokenKind::CalldataKeyword)
        ) {
            self.start_labeled(RuleKind::StorageLocation, EdgeLabel::Location);
            self.bump();
            self.finish();
        }
    }
}
