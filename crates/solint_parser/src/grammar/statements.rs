//! Blocks and statements.

use solint_cst::{EdgeLabel, RuleKind, TokenKind};

use super::Grammar;
use crate::LanguageFeature;

impl Grammar<'_, '_> {
    pub(super) fn block(&mut self, label: Option<EdgeLabel>) {
        self.start_with(RuleKind::Block, label);
        if self.expect(TokenKind::OpenBrace) {
            self.start(RuleKind::Statements);
            self.list_until(TokenKind::CloseBrace, "Expected a statement", |_| false, |p| p.statement());
            self.finish();
            self.expect(TokenKind::CloseBrace);
        }
        self.finish();
    }

    fn statement(&mut self) {
        match self.peek() {
            Some(TokenKind::OpenBrace) => self.block(None),
            Some(TokenKind::UncheckedKeyword) => self.unchecked_block(),
            Some(TokenKind::IfKeyword) => self.if_statement(),
            Some(TokenKind::ForKeyword) => self.for_statement(),
            Some(TokenKind::WhileKeyword) => self.while_statement(),
            Some(TokenKind::DoKeyword) => self.do_while_statement(),
            Some(TokenKind::ReturnKeyword) => self.keyword_statement(RuleKind::ReturnStatement, true),
            Some(TokenKind::EmitKeyword) => self.keyword_statement(RuleKind::EmitStatement, true),
            Some(TokenKind::BreakKeyword) => self.keyword_statement(RuleKind::BreakStatement, false),
            Some(TokenKind::ContinueKeyword) => {
                self.keyword_statement(RuleKind::ContinueStatement, false)
            }
            Some(TokenKind::TryKeyword) => self.try_statement(),
            Some(TokenKind::AssemblyKeyword) => self.assembly_statement(),
            Some(TokenKind::VarKeyword) => self.var_declaration(),
            Some(TokenKind::CloseParen | TokenKind::CloseBracket) => {
                self.skip_unrecognized("Unexpected closing bracket", |_| false)
            }
            Some(TokenKind::Identifier)
                if self.at_contextual("revert") && self.nth_kind(1) == Some(TokenKind::Identifier) =>
            {
                self.revert_statement()
            }
            Some(_) if self.at_variable_declaration() => self.variable_declaration_statement(),
            Some(_) => self.expression_statement(),
            None => {}
        }
    }

    /// Distinguishes `T name ...;` from an expression statement.
    fn at_variable_declaration(&self) -> bool {
        let kinds = self.lookahead(64);
        let Some(&first) = kinds.first() else {
            return false;
        };
        match first {
            TokenKind::MappingKeyword | TokenKind::FunctionKeyword => true,
            // `uint(x)`, `address(this).balance`, `bytes.concat(...)`
            kind if kind.is_elementary_type() => {
                !matches!(kinds.get(1), Some(TokenKind::OpenParen | TokenKind::Period))
            }
            TokenKind::Identifier => {
                let mut at = 1;
                while kinds.get(at) == Some(&TokenKind::Period)
                    && kinds.get(at + 1) == Some(&TokenKind::Identifier)
                {
                    at += 2;
                }
                while kinds.get(at) == Some(&TokenKind::OpenBracket) {
                    let mut depth = 0usize;
                    while let Some(&kind) = kinds.get(at) {
                        at += 1;
                        match kind {
                            TokenKind::OpenBracket => depth += 1,
                            TokenKind::CloseBracket => {
                                depth -= 1;
                                if depth == 0 {
                                    break;
                                }
                            }
                            _ => {}
                        }
                    }
                }
                matches!(
                    kinds.get(at),
                    Some(
                        TokenKind::Identifier
                            | TokenKind::MemoryKeyword
                            | TokenKind::StorageKeyword
                            | TokenKind::CalldataKeyword
                    )
                )
            }
            _ => false,
        }
    }

    fn variable_declaration_statement(&mut self) {
        self.start(RuleKind::VariableDeclarationStatement);
        self.type_name(Some(EdgeLabel::TypeName));
        self.storage_location();
        self.expect_name();
        if self.eat(TokenKind::Equal) {
            self.expression(EdgeLabel::Value, &[]);
        }
        self.expect(TokenKind::Semicolon);
        self.finish();
    }

    fn var_declaration(&mut self) {
        self.start(RuleKind::VariableDeclarationStatement);
        self.require(LanguageFeature::VarDeclarations);
        self.bump();
        if self.at(TokenKind::OpenParen) {
            self.bump_balanced();
        } else {
            self.expect_name();
        }
        if self.eat(TokenKind::Equal) {
            self.expression(EdgeLabel::Value, &[]);
        }
        self.expect(TokenKind::Semicolon);
        self.finish();
    }

    fn expression_statement(&mut self) {
        self.start(RuleKind::ExpressionStatement);
        self.expression(EdgeLabel::Expression, &[]);
        self.expect(TokenKind::Semicolon);
        self.finish();
    }

    /// `return x;`, `emit E(x);`, `break;`, `continue;`
    fn keyword_statement(&mut self, kind: RuleKind, with_expression: bool) {
        self.start(kind);
        self.bump();
        if with_expression && !self.at(TokenKind::Semicolon) {
            self.expression(EdgeLabel::Expression, &[]);
        }
        self.expect(TokenKind::Semicolon);
        self.finish();
    }

    fn revert_statement(&mut self) {
        self.start(RuleKind::RevertStatement);
        self.require(LanguageFeature::CustomErrors);
        self.bump_as(TokenKind::RevertKeyword);
        self.identifier_path(Some(EdgeLabel::Name));
        if self.at(TokenKind::OpenParen) {
            self.arguments();
        } else {
            self.error_expected("'('");
        }
        self.expect(TokenKind::Semicolon);
        self.finish();
    }

    fn unchecked_block(&mut self) {
        self.start(RuleKind::UncheckedBlock);
        self.bump();
        self.block(Some(EdgeLabel::Body));
        self.finish();
    }

    /// `( condition )`
    fn condition(&mut self) {
        if self.expect(TokenKind::OpenParen) {
            self.expression(EdgeLabel::Condition, &[]);
            self.expect(TokenKind::CloseParen);
        }
    }

    fn if_statement(&mut self) {
        self.start(RuleKind::IfStatement);
        self.bump();
        self.condition();
        self.statement();
        if self.at(TokenKind::ElseKeyword) {
            self.start_labeled(RuleKind::ElseBranch, EdgeLabel::ElseBranch);
            self.bump();
            self.statement();
            self.finish();
        }
        self.finish();
    }

    fn for_statement(&mut self) {
        self.start(RuleKind::ForStatement);
        self.bump();
        if self.expect(TokenKind::OpenParen) {
            if !self.eat(TokenKind::Semicolon) {
                if self.at_variable_declaration() {
                    self.variable_declaration_statement();
                } else {
                    self.expression_statement();
                }
            }
            if !self.eat(TokenKind::Semicolon) {
                self.expression_statement();
            }
            if !self.at(TokenKind::CloseParen) {
                self.expression(EdgeLabel::Update, &[]);
            }
            self.expect(TokenKind::CloseParen);
        }
        self.statement();
        self.finish();
    }

    fn while_statement(&mut self) {
        self.start(RuleKind::WhileStatement);
        self.bump();
        self.condition();
        self.statement();
        self.finish();
    }

    fn do_while_statement(&mut self) {
        self.start(RuleKind::DoWhileStatement);
        self.bump();
        self.statement();
        if self.expect(TokenKind::WhileKeyword) {
            self.condition();
        }
        self.expect(TokenKind::Semicolon);
        self.finish();
    }

    /// `try f() returns (T x) { ... } catch Error(string memory r) { ... } catch { ... }`
    fn try_statement(&mut self) {
        self.start(RuleKind::TryStatement);
        self.bump();
        self.expression(
            EdgeLabel::Expression,
            &[TokenKind::ReturnsKeyword, TokenKind::OpenBrace],
        );
        if self.at(TokenKind::ReturnsKeyword) {
            self.returns_declaration();
        }
        self.block(Some(EdgeLabel::Body));
        while self.eat(TokenKind::CatchKeyword) {
            if self.at(TokenKind::Identifier) {
                self.bump();
            }
            if self.at(TokenKind::OpenParen) {
                self.parameters(EdgeLabel::Parameters);
            }
            self.block(None);
        }
        self.finish();
    }

    /// Assembly bodies are kept as flat token groups.
    fn assembly_statement(&mut self) {
        self.start(RuleKind::AssemblyStatement);
        self.bump();
        self.eat(TokenKind::StringLiteral);
        if self.at(TokenKind::OpenParen) {
            self.bump_balanced();
        }
        if self.at(TokenKind::OpenBrace) {
            self.bump_balanced();
        } else {
            self.error_expected("'{'");
        }
        self.finish();
    }
}
