//! Source units, contracts and their members.

use solint_cst::{EdgeLabel, RuleKind, TokenKind};

use super::Grammar;
use crate::LanguageFeature;

fn is_source_unit_start(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::PragmaKeyword
            | TokenKind::ImportKeyword
            | TokenKind::UsingKeyword
            | TokenKind::AbstractKeyword
            | TokenKind::ContractKeyword
            | TokenKind::InterfaceKeyword
            | TokenKind::LibraryKeyword
            | TokenKind::StructKeyword
            | TokenKind::EnumKeyword
            | TokenKind::EventKeyword
            | TokenKind::FunctionKeyword
            | TokenKind::TypeKeyword
    )
}

fn is_contract_member_start(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::UsingKeyword
            | TokenKind::StructKeyword
            | TokenKind::EnumKeyword
            | TokenKind::EventKeyword
            | TokenKind::ModifierKeyword
            | TokenKind::FunctionKeyword
            | TokenKind::ConstructorKeyword
            | TokenKind::ReceiveKeyword
            | TokenKind::FallbackKeyword
            | TokenKind::TypeKeyword
    )
}

fn is_comma(kind: TokenKind) -> bool {
    kind == TokenKind::Comma
}

impl Grammar<'_, '_> {
    pub(super) fn source_unit(&mut self) {
        self.start(RuleKind::SourceUnit);
        while !self.at_end() {
            let before = self.pos;
            self.source_unit_member();
            if self.pos == before {
                self.skip_unrecognized("Expected a directive or a definition", is_source_unit_start);
            }
        }
        self.eat_trivia();
        self.finish();
    }

    fn source_unit_member(&mut self) {
        match self.peek() {
            Some(TokenKind::PragmaKeyword) => self.pragma_directive(),
            Some(TokenKind::ImportKeyword) => self.import_directive(),
            Some(TokenKind::UsingKeyword) => self.using_directive(),
            Some(
                TokenKind::AbstractKeyword
                | TokenKind::ContractKeyword
                | TokenKind::InterfaceKeyword
                | TokenKind::LibraryKeyword,
            ) => self.contract_definition(),
            Some(TokenKind::StructKeyword) => self.struct_definition(),
            Some(TokenKind::EnumKeyword) => self.enum_definition(),
            Some(TokenKind::EventKeyword) => self.event_definition(),
            Some(TokenKind::FunctionKeyword) => self.function_definition(),
            Some(TokenKind::TypeKeyword) if self.nth_kind(1) == Some(TokenKind::Identifier) => {
                self.user_defined_value_type()
            }
            Some(TokenKind::Identifier) if self.at_error_definition() => self.error_definition(),
            Some(_) if self.at_type_start() && self.declares(TokenKind::ConstantKeyword) => {
                self.constant_definition()
            }
            _ => self.skip_unrecognized("Expected a directive or a definition", is_source_unit_start),
        }
    }

    // --- directives -------------------------------------------------------

    fn pragma_directive(&mut self) {
        self.start(RuleKind::PragmaDirective);
        self.bump();
        if self.at_contextual("solidity") {
            self.start_labeled(RuleKind::VersionPragma, EdgeLabel::Pragma);
            self.bump_as(TokenKind::SolidityKeyword);
            self.rest_of_directive();
            self.finish();
        } else {
            self.rest_of_directive();
        }
        self.expect(TokenKind::Semicolon);
        self.finish();
    }

    fn rest_of_directive(&mut self) {
        while let Some(kind) = self.peek() {
            if kind == TokenKind::Semicolon || is_source_unit_start(kind) {
                break;
            }
            self.bump_balanced();
        }
    }

    fn import_directive(&mut self) {
        self.start(RuleKind::ImportDirective);
        self.bump();
        while let Some(kind) = self.peek() {
            if kind == TokenKind::Semicolon || is_source_unit_start(kind) {
                break;
            }
            if kind == TokenKind::StringLiteral {
                self.bump_labeled(EdgeLabel::Path);
            } else if self.at_contextual("from") {
                self.bump_as(TokenKind::FromKeyword);
            } else {
                self.bump_balanced();
            }
        }
        self.expect(TokenKind::Semicolon);
        self.finish();
    }

    pub(super) fn using_directive(&mut self) {
        self.start(RuleKind::UsingDirective);
        self.bump();
        if self.at(TokenKind::OpenBrace) {
            self.bump_balanced();
        } else {
            self.identifier_path(None);
        }
        if self.expect(TokenKind::ForKeyword) && !self.eat(TokenKind::Asterisk) {
            self.type_name(Some(EdgeLabel::TypeName));
        }
        if self.at_contextual("global") {
            self.bump();
        }
        self.expect(TokenKind::Semicolon);
        self.finish();
    }

    // --- contracts ----------------------------------------------------------

    pub(super) fn contract_definition(&mut self) {
        let kind = match self.peek() {
            Some(TokenKind::InterfaceKeyword) => RuleKind::InterfaceDefinition,
            Some(TokenKind::LibraryKeyword) => RuleKind::LibraryDefinition,
            _ => RuleKind::ContractDefinition,
        };
        self.start(kind);
        if self.eat(TokenKind::AbstractKeyword) {
            self.expect(TokenKind::ContractKeyword);
        } else if !(self.eat(TokenKind::ContractKeyword)
            || self.eat(TokenKind::InterfaceKeyword)
            || self.eat(TokenKind::LibraryKeyword))
        {
            self.error_expected("contract, interface or library");
            self.finish();
            return;
        }
        self.expect_name();
        if self.at(TokenKind::IsKeyword) {
            self.inheritance_specifier();
        }

        if self.expect(TokenKind::OpenBrace) {
            self.start_labeled(RuleKind::ContractMembers, EdgeLabel::Members);
            self.list_until(
                TokenKind::CloseBrace,
                "Expected a contract member",
                is_contract_member_start,
                |p| p.contract_member(),
            );
            self.finish();
            self.expect(TokenKind::CloseBrace);
        }
        self.finish();
    }

    fn inheritance_specifier(&mut self) {
        self.start_labeled(RuleKind::InheritanceSpecifier, EdgeLabel::Inheritance);
        self.bump();
        loop {
            self.start(RuleKind::InheritanceType);
            self.identifier_path(Some(EdgeLabel::TypeName));
            if self.at(TokenKind::OpenParen) {
                self.arguments();
            }
            self.finish();
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.finish();
    }

    fn contract_member(&mut self) {
        match self.peek() {
            Some(TokenKind::UsingKeyword) => self.using_directive(),
            Some(TokenKind::StructKeyword) => self.struct_definition(),
            Some(TokenKind::EnumKeyword) => self.enum_definition(),
            Some(TokenKind::EventKeyword) => self.event_definition(),
            Some(TokenKind::ModifierKeyword) => self.modifier_definition(),
            Some(TokenKind::FunctionKeyword) => self.function_definition(),
            Some(TokenKind::ConstructorKeyword) => self.constructor_definition(),
            Some(TokenKind::ReceiveKeyword | TokenKind::FallbackKeyword) => self.special_function(),
            Some(TokenKind::TypeKeyword) if self.nth_kind(1) == Some(TokenKind::Identifier) => {
                self.user_defined_value_type()
            }
            Some(TokenKind::Identifier) if self.at_error_definition() => self.error_definition(),
            Some(_) if self.at_type_start() => self.state_variable_definition(),
            _ => self.skip_unrecognized("Expected a contract member", is_contract_member_start),
        }
    }

    fn state_variable_definition(&mut self) {
        self.start(RuleKind::StateVariableDefinition);
        self.type_name(Some(EdgeLabel::TypeName));
        loop {
            match self.peek() {
                Some(
                    TokenKind::PublicKeyword
                    | TokenKind::PrivateKeyword
                    | TokenKind::InternalKeyword
                    | TokenKind::ConstantKeyword,
                ) => self.bump(),
                Some(TokenKind::ImmutableKeyword) => {
                    self.require(LanguageFeature::Immutable);
                    self.bump();
                }
                Some(TokenKind::OverrideKeyword) => self.override_specifier(),
                _ => break,
            }
        }
        self.expect_name();
        if self.eat(TokenKind::Equal) {
            self.expression(EdgeLabel::Value, &[]);
        }
        self.expect(TokenKind::Semicolon);
        self.finish();
    }

    fn constant_definition(&mut self) {
        self.start(RuleKind::ConstantDefinition);
        self.require(LanguageFeature::FileLevelConstants);
        self.type_name(Some(EdgeLabel::TypeName));
        self.expect(TokenKind::ConstantKeyword);
        self.expect_name();
        if self.expect(TokenKind::Equal) {
            self.expression(EdgeLabel::Value, &[]);
        }
        self.expect(TokenKind::Semicolon);
        self.finish();
    }

    // --- functions ----------------------------------------------------------

    pub(super) fn function_definition(&mut self) {
        self.start(RuleKind::FunctionDefinition);
        self.bump();
        if matches!(
            self.peek(),
            Some(TokenKind::Identifier | TokenKind::ReceiveKeyword | TokenKind::FallbackKeyword)
        ) {
            self.bump_labeled(EdgeLabel::Name);
        }
        self.function_rest();
        self.finish();
    }

    /// `receive() external payable { ... }` and `fallback(...) ...`.
    fn special_function(&mut self) {
        self.start(RuleKind::FunctionDefinition);
        self.bump_labeled(EdgeLabel::Name);
        self.function_rest();
        self.finish();
    }

    fn constructor_definition(&mut self) {
        self.start(RuleKind::ConstructorDefinition);
        self.bump();
        self.function_rest();
        self.finish();
    }

    fn modifier_definition(&mut self) {
        self.start(RuleKind::ModifierDefinition);
        self.bump();
        self.expect_name();
        if self.at(TokenKind::OpenParen) {
            self.parameters(EdgeLabel::Parameters);
        }
        self.function_attributes();
        self.function_body();
        self.finish();
    }

    fn function_rest(&mut self) {
        self.parameters(EdgeLabel::Parameters);
        self.function_attributes();
        if self.at(TokenKind::ReturnsKeyword) {
            self.returns_declaration();
        }
        self.function_body();
    }

    fn function_body(&mut self) {
        if !self.eat(TokenKind::Semicolon) {
            self.block(Some(EdgeLabel::Body));
        }
    }

    fn function_attributes(&mut self) {
        self.start_labeled(RuleKind::FunctionAttributes, EdgeLabel::Attributes);
        loop {
            match self.peek() {
                Some(
                    TokenKind::PublicKeyword
                    | TokenKind::PrivateKeyword
                    | TokenKind::InternalKeyword
                    | TokenKind::ExternalKeyword
                    | TokenKind::PureKeyword
                    | TokenKind::ViewKeyword
                    | TokenKind::PayableKeyword
                    | TokenKind::ConstantKeyword
                    | TokenKind::VirtualKeyword,
                ) => self.bump(),
                Some(TokenKind::OverrideKeyword) => self.override_specifier(),
                Some(TokenKind::Identifier) => self.modifier_invocation(),
                _ => break,
            }
        }
        self.finish();
    }

    fn modifier_invocation(&mut self) {
        self.start(RuleKind::ModifierInvocation);
        self.identifier_path(Some(EdgeLabel::Name));
        if self.at(TokenKind::OpenParen) {
            self.arguments();
        }
        self.finish();
    }

    pub(super) fn override_specifier(&mut self) {
        self.start(RuleKind::OverrideSpecifier);
        self.bump();
        if self.eat(TokenKind::OpenParen) {
            while self.at(TokenKind::Identifier) {
                self.identifier_path(None);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::CloseParen);
        }
        self.finish();
    }

    pub(super) fn returns_declaration(&mut self) {
        self.start_labeled(RuleKind::ReturnsDeclaration, EdgeLabel::Returns);
        self.bump();
        self.parameters(EdgeLabel::Parameters);
        self.finish();
    }

    /// `( Parameter, ... )`
    pub(super) fn parameters(&mut self, label: EdgeLabel) {
        self.start_labeled(RuleKind::Parameters, label);
        if self.expect(TokenKind::OpenParen) {
            while !self.at_end() && !self.at(TokenKind::CloseParen) {
                if self.at_type_start() {
                    self.parameter();
                } else {
                    self.skip_unrecognized("Expected a parameter", is_comma);
                }
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::CloseParen);
        }
        self.finish();
    }

    fn parameter(&mut self) {
        self.start(RuleKind::Parameter);
        self.type_name(Some(EdgeLabel::TypeName));
        self.storage_location();
        self.eat(TokenKind::IndexedKeyword);
        if self.at(TokenKind::Identifier) {
            self.bump_labeled(EdgeLabel::Name);
        }
        self.finish();
    }

    /// `( ... )` call arguments, kept as a single expression.
    pub(super) fn arguments(&mut self) {
        self.bump();
        if !self.at(TokenKind::CloseParen) {
            self.expression(EdgeLabel::Arguments, &[]);
        }
        self.expect(TokenKind::CloseParen);
    }

    // --- other definitions --------------------------------------------------

    pub(super) fn struct_definition(&mut self) {
        self.start(RuleKind::StructDefinition);
        if !self.expect(TokenKind::StructKeyword) {
            self.finish();
            return;
        }
        self.expect_name();
        if self.expect(TokenKind::OpenBrace) {
            self.start_labeled(RuleKind::StructMembers, EdgeLabel::Members);
            self.list_until(
                TokenKind::CloseBrace,
                "Expected a struct member",
                |_| false,
                |p| p.struct_member(),
            );
            self.finish();
            self.expect(TokenKind::CloseBrace);
        }
        self.finish();
    }

    fn struct_member(&mut self) {
        if !self.at_type_start() {
            return;
        }
        self.start(RuleKind::StructMember);
        self.type_name(Some(EdgeLabel::TypeName));
        self.expect_name();
        self.expect(TokenKind::Semicolon);
        self.finish();
    }

    fn enum_definition(&mut self) {
        self.start(RuleKind::EnumDefinition);
        self.bump();
        self.expect_name();
        if self.expect(TokenKind::OpenBrace) {
            self.start_labeled(RuleKind::EnumMembers, EdgeLabel::Members);
            while self.at(TokenKind::Identifier) {
                self.bump();
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.finish();
            self.expect(TokenKind::CloseBrace);
        }
        self.finish();
    }

    fn event_definition(&mut self) {
        self.start(RuleKind::EventDefinition);
        self.bump();
        self.expect_name();
        self.parameters(EdgeLabel::Parameters);
        self.eat(TokenKind::AnonymousKeyword);
        self.expect(TokenKind::Semicolon);
        self.finish();
    }

    /// `error Name(...)` where `error` is still an identifier.
    fn at_error_definition(&self) -> bool {
        self.at_contextual("error")
            && self.nth_kind(1) == Some(TokenKind::Identifier)
            && self.nth_kind(2) == Some(TokenKind::OpenParen)
    }

    fn error_definition(&mut self) {
        self.start(RuleKind::ErrorDefinition);
        self.require(LanguageFeature::CustomErrors);
        self.bump_as(TokenKind::ErrorKeyword);
        self.expect_name();
        self.parameters(EdgeLabel::Parameters);
        self.expect(TokenKind::Semicolon);
        self.finish();
    }

    fn user_defined_value_type(&mut self) {
        self.start(RuleKind::UserDefinedValueTypeDefinition);
        self.require(LanguageFeature::UserDefinedValueTypes);
        self.bump();
        self.expect_name();
        self.expect(TokenKind::IsKeyword);
        if self.peek().is_some_and(|kind| kind.is_elementary_type()) {
            self.start_labeled(RuleKind::ElementaryType, EdgeLabel::ValueType);
            self.bump();
            self.finish();
        } else {
            self.error_expected("an elementary type");
        }
        self.expect(TokenKind::Semicolon);
        self.finish();
    }

    /// Scans ahead to the end of the current declaration for `kind`.
    fn declares(&self, kind: TokenKind) -> bool {
        self.significant()
            .map(|token| token.kind)
            .take_while(|k| !matches!(k, TokenKind::Semicolon | TokenKind::OpenBrace | TokenKind::CloseBrace))
            .any(|k| k == kind)
    }
}
