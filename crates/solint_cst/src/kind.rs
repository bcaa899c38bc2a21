//! Node kinds and edge labels.
//!
//! Kind names are the PascalCase variant names and are what queries refer
//! to (`[StructDefinition ...]`, `[UintKeyword]`). Edge labels use
//! snake_case (`[name: ...]`).

use std::fmt;

macro_rules! named_kinds {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($(#[$vmeta])* $variant),*
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            /// The stable name of this kind.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),*
                }
            }

            /// Looks a kind up by its stable name.
            pub fn from_name(name: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|kind| kind.as_str() == name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

named_kinds! {
    /// Kinds of non-terminal nodes.
    pub enum RuleKind {
        SourceUnit,
        PragmaDirective,
        VersionPragma,
        ImportDirective,
        UsingDirective,
        ContractDefinition,
        InterfaceDefinition,
        LibraryDefinition,
        InheritanceSpecifier,
        InheritanceType,
        ContractMembers,
        StateVariableDefinition,
        ConstantDefinition,
        FunctionDefinition,
        ConstructorDefinition,
        ModifierDefinition,
        FunctionAttributes,
        ModifierInvocation,
        OverrideSpecifier,
        ReturnsDeclaration,
        Parameters,
        Parameter,
        StructDefinition,
        StructMembers,
        StructMember,
        EnumDefinition,
        EnumMembers,
        EventDefinition,
        ErrorDefinition,
        UserDefinedValueTypeDefinition,
        TypeName,
        ElementaryType,
        IdentifierPath,
        MappingType,
        ArrayTypeName,
        FunctionType,
        StorageLocation,
        Block,
        Statements,
        UncheckedBlock,
        IfStatement,
        ElseBranch,
        ForStatement,
        WhileStatement,
        DoWhileStatement,
        ReturnStatement,
        EmitStatement,
        RevertStatement,
        BreakStatement,
        ContinueStatement,
        TryStatement,
        AssemblyStatement,
        VariableDeclarationStatement,
        ExpressionStatement,
        Expression,
        /// Input the parser could not place; holds the skipped tokens.
        Unrecognized,
    }
}

named_kinds! {
    /// Kinds of terminal nodes (tokens).
    pub enum TokenKind {
        // Trivia
        Whitespace,
        EndOfLine,
        SingleLineComment,
        MultiLineComment,

        // Names and literals
        Identifier,
        DecimalLiteral,
        HexLiteral,
        VersionLiteral,
        StringLiteral,
        HexStringLiteral,
        UnicodeStringLiteral,

        // Keywords
        AbstractKeyword,
        AddressKeyword,
        AnonymousKeyword,
        AsKeyword,
        AssemblyKeyword,
        BoolKeyword,
        BreakKeyword,
        ByteKeyword,
        BytesKeyword,
        CalldataKeyword,
        CatchKeyword,
        ConstantKeyword,
        ConstructorKeyword,
        ContinueKeyword,
        ContractKeyword,
        DeleteKeyword,
        DoKeyword,
        ElseKeyword,
        EmitKeyword,
        EnumKeyword,
        ErrorKeyword,
        EventKeyword,
        ExternalKeyword,
        FallbackKeyword,
        FalseKeyword,
        FixedKeyword,
        ForKeyword,
        FromKeyword,
        FunctionKeyword,
        IfKeyword,
        ImmutableKeyword,
        ImportKeyword,
        IndexedKeyword,
        InterfaceKeyword,
        InternalKeyword,
        IntKeyword,
        IsKeyword,
        LibraryKeyword,
        MappingKeyword,
        MemoryKeyword,
        ModifierKeyword,
        NewKeyword,
        OverrideKeyword,
        PayableKeyword,
        PragmaKeyword,
        PrivateKeyword,
        PublicKeyword,
        PureKeyword,
        ReceiveKeyword,
        ReturnKeyword,
        ReturnsKeyword,
        RevertKeyword,
        SolidityKeyword,
        StorageKeyword,
        StringKeyword,
        StructKeyword,
        TrueKeyword,
        TryKeyword,
        TypeKeyword,
        UfixedKeyword,
        UintKeyword,
        UncheckedKeyword,
        UsingKeyword,
        VarKeyword,
        ViewKeyword,
        VirtualKeyword,
        WhileKeyword,

        // Punctuation and operators
        OpenParen,
        CloseParen,
        OpenBracket,
        CloseBracket,
        OpenBrace,
        CloseBrace,
        Comma,
        Semicolon,
        Period,
        Colon,
        ColonEqual,
        QuestionMark,
        EqualGreaterThan,
        MinusGreaterThan,
        Equal,
        EqualEqual,
        Bang,
        BangEqual,
        LessThan,
        LessThanEqual,
        LessThanLessThan,
        LessThanLessThanEqual,
        GreaterThan,
        GreaterThanEqual,
        GreaterThanGreaterThan,
        GreaterThanGreaterThanEqual,
        GreaterThanGreaterThanGreaterThan,
        GreaterThanGreaterThanGreaterThanEqual,
        Plus,
        PlusPlus,
        PlusEqual,
        Minus,
        MinusMinus,
        MinusEqual,
        Asterisk,
        AsteriskAsterisk,
        AsteriskEqual,
        Slash,
        SlashEqual,
        Percent,
        PercentEqual,
        Ampersand,
        AmpersandAmpersand,
        AmpersandEqual,
        Bar,
        BarBar,
        BarEqual,
        Caret,
        CaretEqual,
        Tilde,

        /// A character or sequence the lexer could not classify.
        Unrecognized,
    }
}

impl TokenKind {
    /// Whitespace, line breaks and comments.
    #[inline]
    pub const fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::EndOfLine
                | TokenKind::SingleLineComment
                | TokenKind::MultiLineComment
        )
    }

    /// Built-in value type keywords (`uint`, `bytes32`, `address`, ...).
    #[inline]
    pub const fn is_elementary_type(&self) -> bool {
        matches!(
            self,
            TokenKind::AddressKeyword
                | TokenKind::BoolKeyword
                | TokenKind::ByteKeyword
                | TokenKind::BytesKeyword
                | TokenKind::FixedKeyword
                | TokenKind::IntKeyword
                | TokenKind::StringKeyword
                | TokenKind::UfixedKeyword
                | TokenKind::UintKeyword
                | TokenKind::VarKeyword
        )
    }
}

/// The kind of any node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Rule(RuleKind),
    Token(TokenKind),
}

impl NodeKind {
    /// Resolves a query kind name against both rule and token kinds.
    pub fn from_name(name: &str) -> Option<Self> {
        RuleKind::from_name(name)
            .map(NodeKind::Rule)
            .or_else(|| TokenKind::from_name(name).map(NodeKind::Token))
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Rule(kind) => kind.as_str(),
            NodeKind::Token(kind) => kind.as_str(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RuleKind> for NodeKind {
    fn from(kind: RuleKind) -> Self {
        NodeKind::Rule(kind)
    }
}

impl From<TokenKind> for NodeKind {
    fn from(kind: TokenKind) -> Self {
        NodeKind::Token(kind)
    }
}

/// Role of a child within its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeLabel {
    Name,
    TypeName,
    Members,
    Body,
    Parameters,
    Returns,
    Attributes,
    Inheritance,
    Condition,
    Expression,
    Value,
    KeyType,
    ValueType,
    Location,
    ElseBranch,
    Initialization,
    Update,
    Pragma,
    Path,
    Arguments,
}

impl EdgeLabel {
    pub const ALL: &'static [EdgeLabel] = &[
        EdgeLabel::Name,
        EdgeLabel::TypeName,
        EdgeLabel::Members,
        EdgeLabel::Body,
        EdgeLabel::Parameters,
        EdgeLabel::Returns,
        EdgeLabel::Attributes,
        EdgeLabel::Inheritance,
        EdgeLabel::Condition,
        EdgeLabel::Expression,
        EdgeLabel::Value,
        EdgeLabel::KeyType,
        EdgeLabel::ValueType,
        EdgeLabel::Location,
        EdgeLabel::ElseBranch,
        EdgeLabel::Initialization,
        EdgeLabel::Update,
        EdgeLabel::Pragma,
        EdgeLabel::Path,
        EdgeLabel::Arguments,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            EdgeLabel::Name => "name",
            EdgeLabel::TypeName => "type_name",
            EdgeLabel::Members => "members",
            EdgeLabel::Body => "body",
            EdgeLabel::Parameters => "parameters",
            EdgeLabel::Returns => "returns",
            EdgeLabel::Attributes => "attributes",
            EdgeLabel::Inheritance => "inheritance",
            EdgeLabel::Condition => "condition",
            EdgeLabel::Expression => "expression",
            EdgeLabel::Value => "value",
            EdgeLabel::KeyType => "key_type",
            EdgeLabel::ValueType => "value_type",
            EdgeLabel::Location => "location",
            EdgeLabel::ElseBranch => "else_branch",
            EdgeLabel::Initialization => "initialization",
            EdgeLabel::Update => "update",
            EdgeLabel::Pragma => "pragma",
            EdgeLabel::Path => "path",
            EdgeLabel::Arguments => "arguments",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|label| label.as_str() == name)
    }
}

impl fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("StructDefinition", Some(NodeKind::Rule(RuleKind::StructDefinition)))]
    #[case("UintKeyword", Some(NodeKind::Token(TokenKind::UintKeyword)))]
    #[case("Identifier", Some(NodeKind::Token(TokenKind::Identifier)))]
    #[case("structDefinition", None)]
    #[case("", None)]
    fn test_node_kind_from_name(#[case] name: &str, #[case] expected: Option<NodeKind>) {
        assert_eq!(NodeKind::from_name(name), expected);
    }

    #[test]
    fn test_unrecognized_resolves_to_rule_first() {
        // Both enums carry an `Unrecognized` variant; queries see the rule.
        assert_eq!(
            NodeKind::from_name("Unrecognized"),
            Some(NodeKind::Rule(RuleKind::Unrecognized))
        );
    }

    #[test]
    fn test_edge_label_names_round_trip() {
        for label in EdgeLabel::ALL {
            assert_eq!(EdgeLabel::from_name(label.as_str()), Some(*label));
        }
        assert_eq!(EdgeLabel::from_name("Name"), None);
    }

    #[test]
    fn test_trivia() {
        assert!(TokenKind::Whitespace.is_trivia());
        assert!(TokenKind::MultiLineComment.is_trivia());
        assert!(!TokenKind::UintKeyword.is_trivia());
    }
}
