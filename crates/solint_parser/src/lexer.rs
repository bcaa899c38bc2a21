//! Version-aware tokenizer.
//!
//! The lexer never fails: every byte of the input ends up in exactly one
//! token, and anything it cannot classify becomes an `Unrecognized` token.
//! Contextual keywords (`error`, `revert`, `from`, `solidity`, `global`)
//! are lexed as identifiers and re-tagged by the parser.

use semver::Version;
use solint_cst::{TextRange, TokenKind};

use crate::LanguageFeature;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub range: TextRange,
}

/// Splits `source` into tokens. Offsets must fit in `u32`; callers check.
pub(crate) fn tokenize(source: &str, version: &Version) -> Vec<Token> {
    let mut lexer = Lexer {
        source,
        bytes: source.as_bytes(),
        pos: 0,
        version,
    };
    let mut tokens = Vec::with_capacity(source.len() / 4);
    while lexer.pos < source.len() {
        let start = lexer.pos;
        let kind = lexer.next_kind();
        tokens.push(Token {
            kind,
            range: TextRange::new(start as u32, lexer.pos as u32),
        });
    }
    tokens
}

/// Operators and punctuation, longest first.
const PUNCTUATION: &[(&str, TokenKind)] = &[
    (">>>=", TokenKind::GreaterThanGreaterThanGreaterThanEqual),
    (">>>", TokenKind::GreaterThanGreaterThanGreaterThan),
    ("<<=", TokenKind::LessThanLessThanEqual),
    (">>=", TokenKind::GreaterThanGreaterThanEqual),
    ("==", TokenKind::EqualEqual),
    ("!=", TokenKind::BangEqual),
    ("<=", TokenKind::LessThanEqual),
    (">=", TokenKind::GreaterThanEqual),
    ("<<", TokenKind::LessThanLessThan),
    (">>", TokenKind::GreaterThanGreaterThan),
    ("++", TokenKind::PlusPlus),
    ("--", TokenKind::MinusMinus),
    ("+=", TokenKind::PlusEqual),
    ("-=", TokenKind::MinusEqual),
    ("*=", TokenKind::AsteriskEqual),
    ("/=", TokenKind::SlashEqual),
    ("%=", TokenKind::PercentEqual),
    ("&=", TokenKind::AmpersandEqual),
    ("|=", TokenKind::BarEqual),
    ("^=", TokenKind::CaretEqual),
    ("&&", TokenKind::AmpersandAmpersand),
    ("||", TokenKind::BarBar),
    ("**", TokenKind::AsteriskAsterisk),
    ("=>", TokenKind::EqualGreaterThan),
    ("->", TokenKind::MinusGreaterThan),
    (":=", TokenKind::ColonEqual),
    ("(", TokenKind::OpenParen),
    (")", TokenKind::CloseParen),
    ("[", TokenKind::OpenBracket),
    ("]", TokenKind::CloseBracket),
    ("{", TokenKind::OpenBrace),
    ("}", TokenKind::CloseBrace),
    (",", TokenKind::Comma),
    (";", TokenKind::Semicolon),
    (".", TokenKind::Period),
    (":", TokenKind::Colon),
    ("?", TokenKind::QuestionMark),
    ("=", TokenKind::Equal),
    ("!", TokenKind::Bang),
    ("<", TokenKind::LessThan),
    (">", TokenKind::GreaterThan),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Asterisk),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("&", TokenKind::Ampersand),
    ("|", TokenKind::Bar),
    ("^", TokenKind::Caret),
    ("~", TokenKind::Tilde),
];

struct Lexer<'s> {
    source: &'s str,
    bytes: &'s [u8],
    pos: usize,
    version: &'s Version,
}

impl Lexer<'_> {
    fn peek_byte(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn eat_while(&mut self, predicate: impl Fn(u8) -> bool) {
        while self.peek_byte(0).is_some_and(&predicate) {
            self.pos += 1;
        }
    }

    fn next_kind(&mut self) -> TokenKind {
        let Some(byte) = self.peek_byte(0) else {
            return TokenKind::Unrecognized;
        };
        match byte {
            b' ' | b'\t' | 0x0c => {
                self.eat_while(|b| matches!(b, b' ' | b'\t' | 0x0c));
                TokenKind::Whitespace
            }
            b'\n' => {
                self.pos += 1;
                TokenKind::EndOfLine
            }
            b'\r' => {
                self.pos += 1;
                if self.peek_byte(0) == Some(b'\n') {
                    self.pos += 1;
                }
                TokenKind::EndOfLine
            }
            b'/' if self.peek_byte(1) == Some(b'/') => {
                self.eat_while(|b| b != b'\n' && b != b'\r');
                TokenKind::SingleLineComment
            }
            b'/' if self.peek_byte(1) == Some(b'*') => {
                let body = self.pos + 2;
                self.pos = match self.source.get(body..).and_then(|rest| rest.find("*/")) {
                    Some(end) => body + end + 2,
                    None => self.source.len(),
                };
                TokenKind::MultiLineComment
            }
            b'"' | b'\'' => self.string(TokenKind::StringLiteral),
            b'0'..=b'9' => self.number(),
            b if is_identifier_start(b) => self.identifier_or_keyword(),
            _ => self.punctuation(),
        }
    }

    fn string(&mut self, kind: TokenKind) -> TokenKind {
        let Some(quote) = self.peek_byte(0) else {
            return TokenKind::Unrecognized;
        };
        self.pos += 1;
        loop {
            match self.peek_byte(0) {
                None | Some(b'\n' | b'\r') => return TokenKind::Unrecognized,
                Some(b'\\') => self.pos = (self.pos + 2).min(self.bytes.len()),
                Some(b) if b == quote => {
                    self.pos += 1;
                    return kind;
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn number(&mut self) -> TokenKind {
        if self.peek_byte(0) == Some(b'0') && matches!(self.peek_byte(1), Some(b'x' | b'X')) {
            self.pos += 2;
            self.eat_while(|b| b.is_ascii_hexdigit() || b == b'_');
            return TokenKind::HexLiteral;
        }

        self.eat_while(|b| b.is_ascii_digit() || b == b'_');
        if self.peek_byte(0) == Some(b'.') && self.peek_byte(1).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
            self.eat_while(|b| b.is_ascii_digit() || b == b'_');

            // `0.8.19` and `0.8.x` only appear in pragmas.
            if self.peek_byte(0) == Some(b'.')
                && self.peek_byte(1).is_some_and(|b| b.is_ascii_digit() || b == b'x' || b == b'X')
            {
                self.eat_while(|b| b.is_ascii_digit() || b == b'.' || b == b'x' || b == b'X');
                return TokenKind::VersionLiteral;
            }
        }

        if matches!(self.peek_byte(0), Some(b'e' | b'E')) {
            let digits_at = if self.peek_byte(1) == Some(b'-') { 2 } else { 1 };
            if self.peek_byte(digits_at).is_some_and(|b| b.is_ascii_digit()) {
                self.pos += digits_at;
                self.eat_while(|b| b.is_ascii_digit() || b == b'_');
            }
        }
        TokenKind::DecimalLiteral
    }

    fn identifier_or_keyword(&mut self) -> TokenKind {
        let start = self.pos;
        self.eat_while(is_identifier_part);
        let text = self.source.get(start..self.pos).unwrap_or_default();

        if matches!(self.peek_byte(0), Some(b'"' | b'\'')) {
            match text {
                "hex" => return self.string(TokenKind::HexStringLiteral),
                "unicode" => return self.string(TokenKind::UnicodeStringLiteral),
                _ => {}
            }
        }

        keyword(text, self.version).unwrap_or(TokenKind::Identifier)
    }

    fn punctuation(&mut self) -> TokenKind {
        let rest = self.source.get(self.pos..).unwrap_or_default();
        for (text, kind) in PUNCTUATION {
            if rest.starts_with(text) {
                self.pos += text.len();
                return *kind;
            }
        }
        self.pos += rest.chars().next().map_or(1, char::len_utf8);
        TokenKind::Unrecognized
    }
}

fn is_identifier_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_' || byte == b'$'
}

fn is_identifier_part(byte: u8) -> bool {
    is_identifier_start(byte) || byte.is_ascii_digit()
}

/// Resolves reserved words for `version`.
pub(crate) fn keyword(text: &str, version: &Version) -> Option<TokenKind> {
    use LanguageFeature as F;
    use TokenKind::*;

    let (kind, feature) = match text {
        "abstract" => (AbstractKeyword, Some(F::VirtualAndOverride)),
        "address" => (AddressKeyword, None),
        "anonymous" => (AnonymousKeyword, None),
        "as" => (AsKeyword, None),
        "assembly" => (AssemblyKeyword, None),
        "bool" => (BoolKeyword, None),
        "break" => (BreakKeyword, None),
        "byte" => (ByteKeyword, Some(F::ByteType)),
        "calldata" => (CalldataKeyword, None),
        "catch" => (CatchKeyword, Some(F::TryCatch)),
        "constant" => (ConstantKeyword, None),
        "constructor" => (ConstructorKeyword, Some(F::ConstructorKeyword)),
        "continue" => (ContinueKeyword, None),
        "contract" => (ContractKeyword, None),
        "delete" => (DeleteKeyword, None),
        "do" => (DoKeyword, None),
        "else" => (ElseKeyword, None),
        "emit" => (EmitKeyword, Some(F::EmitStatement)),
        "enum" => (EnumKeyword, None),
        "event" => (EventKeyword, None),
        "external" => (ExternalKeyword, None),
        "fallback" => (FallbackKeyword, Some(F::ReceiveAndFallback)),
        "false" => (FalseKeyword, None),
        "for" => (ForKeyword, None),
        "function" => (FunctionKeyword, None),
        "if" => (IfKeyword, None),
        "immutable" => (ImmutableKeyword, Some(F::Immutable)),
        "import" => (ImportKeyword, None),
        "indexed" => (IndexedKeyword, None),
        "interface" => (InterfaceKeyword, None),
        "internal" => (InternalKeyword, None),
        "is" => (IsKeyword, None),
        "library" => (LibraryKeyword, None),
        "mapping" => (MappingKeyword, None),
        "memory" => (MemoryKeyword, None),
        "modifier" => (ModifierKeyword, None),
        "new" => (NewKeyword, None),
        "override" => (OverrideKeyword, Some(F::VirtualAndOverride)),
        "payable" => (PayableKeyword, None),
        "pragma" => (PragmaKeyword, None),
        "private" => (PrivateKeyword, None),
        "public" => (PublicKeyword, None),
        "pure" => (PureKeyword, None),
        "receive" => (ReceiveKeyword, Some(F::ReceiveAndFallback)),
        "return" => (ReturnKeyword, None),
        "returns" => (ReturnsKeyword, None),
        "storage" => (StorageKeyword, None),
        "string" => (StringKeyword, None),
        "struct" => (StructKeyword, None),
        "true" => (TrueKeyword, None),
        "try" => (TryKeyword, Some(F::TryCatch)),
        "type" => (TypeKeyword, None),
        "unchecked" => (UncheckedKeyword, Some(F::UncheckedBlocks)),
        "using" => (UsingKeyword, None),
        "var" => (VarKeyword, None),
        "view" => (ViewKeyword, None),
        "virtual" => (VirtualKeyword, Some(F::VirtualAndOverride)),
        "while" => (WhileKeyword, None),
        _ => return sized_type(text),
    };

    match feature {
        Some(feature) if !feature.is_enabled(version) => None,
        _ => Some(kind),
    }
}

/// `uint`, `int8`, `bytes32`, `fixed128x18`, ...
fn sized_type(text: &str) -> Option<TokenKind> {
    let bits = |suffix: &str| {
        suffix.is_empty()
            || suffix
                .parse::<u32>()
                .is_ok_and(|n| (8..=256).contains(&n) && n % 8 == 0 && !suffix.starts_with('0'))
    };
    let fixed = |suffix: &str| {
        if suffix.is_empty() {
            return true;
        }
        let Some((m, n)) = suffix.split_once('x') else {
            return false;
        };
        !m.is_empty() && bits(m) && n.parse::<u32>().is_ok_and(|n| n <= 80)
    };

    if let Some(suffix) = text.strip_prefix("uint") {
        bits(suffix).then_some(TokenKind::UintKeyword)
    } else if let Some(suffix) = text.strip_prefix("int") {
        bits(suffix).then_some(TokenKind::IntKeyword)
    } else if let Some(suffix) = text.strip_prefix("ufixed") {
        fixed(suffix).then_some(TokenKind::UfixedKeyword)
    } else if let Some(suffix) = text.strip_prefix("fixed") {
        fixed(suffix).then_some(TokenKind::FixedKeyword)
    } else if let Some(suffix) = text.strip_prefix("bytes") {
        let sized = suffix.is_empty()
            || suffix
                .parse::<u32>()
                .is_ok_and(|n| (1..=32).contains(&n) && !suffix.starts_with('0'));
        sized.then_some(TokenKind::BytesKeyword)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source, crate::latest_version())
            .into_iter()
            .map(|token| token.kind)
            .filter(|kind| !kind.is_trivia())
            .collect()
    }

    #[test]
    fn test_tokens_cover_every_byte() {
        let source = "struct Foo { uint foo; /* é */ uint256 bar; }\r\n// done";
        let tokens = tokenize(source, crate::latest_version());

        let mut offset = 0;
        for token in &tokens {
            assert_eq!(token.range.start, offset);
            offset = token.range.end;
        }
        assert_eq!(offset as usize, source.len());
    }

    #[test]
    fn test_struct_tokens() {
        use TokenKind::*;
        assert_eq!(
            kinds("struct Foo { uint foo; uint256 bar; }"),
            [
                StructKeyword,
                Identifier,
                OpenBrace,
                UintKeyword,
                Identifier,
                Semicolon,
                UintKeyword,
                Identifier,
                Semicolon,
                CloseBrace,
            ]
        );
    }

    #[rstest]
    #[case("uint", Some(TokenKind::UintKeyword))]
    #[case("uint8", Some(TokenKind::UintKeyword))]
    #[case("uint256", Some(TokenKind::UintKeyword))]
    #[case("uint7", None)]
    #[case("uint264", None)]
    #[case("Uint", None)]
    #[case("myuint", None)]
    #[case("int128", Some(TokenKind::IntKeyword))]
    #[case("bytes32", Some(TokenKind::BytesKeyword))]
    #[case("bytes33", None)]
    #[case("fixed128x18", Some(TokenKind::FixedKeyword))]
    #[case("ufixed", Some(TokenKind::UfixedKeyword))]
    #[case("error", None)]
    #[case("revert", None)]
    fn test_keywords(#[case] text: &str, #[case] expected: Option<TokenKind>) {
        assert_eq!(keyword(text, crate::latest_version()), expected);
    }

    #[rstest]
    #[case("unchecked", "0.7.6", None)]
    #[case("unchecked", "0.8.0", Some(TokenKind::UncheckedKeyword))]
    #[case("constructor", "0.4.21", None)]
    #[case("constructor", "0.4.22", Some(TokenKind::ConstructorKeyword))]
    #[case("byte", "0.7.6", Some(TokenKind::ByteKeyword))]
    #[case("byte", "0.8.0", None)]
    #[case("receive", "0.5.17", None)]
    fn test_versioned_keywords(#[case] text: &str, #[case] version: &str, #[case] expected: Option<TokenKind>) {
        assert_eq!(keyword(text, &Version::parse(version).unwrap()), expected);
    }

    #[test]
    fn test_literals_and_operators() {
        use TokenKind::*;
        assert_eq!(
            kinds(r#"x >>>= 0x1F + 1.5e-3 ** hex"00" != unicode"é" ; 'a\'b'"#),
            [
                Identifier,
                GreaterThanGreaterThanGreaterThanEqual,
                HexLiteral,
                Plus,
                DecimalLiteral,
                AsteriskAsterisk,
                HexStringLiteral,
                BangEqual,
                UnicodeStringLiteral,
                Semicolon,
                StringLiteral,
            ]
        );
    }

    #[test]
    fn test_version_literals() {
        use TokenKind::*;
        assert_eq!(
            kinds("pragma solidity >=0.4.22 <0.9.0;"),
            [PragmaKeyword, Identifier, GreaterThanEqual, VersionLiteral, LessThan, VersionLiteral, Semicolon]
        );
        assert_eq!(kinds("^0.8"), [Caret, DecimalLiteral]);
        assert_eq!(kinds("0.8.x"), [VersionLiteral]);
    }

    #[test]
    fn test_unterminated_input() {
        use TokenKind::*;
        assert_eq!(kinds("\"abc\nx"), [Unrecognized, Identifier]);
        assert_eq!(
            tokenize("/* open", crate::latest_version())
                .iter()
                .map(|t| t.kind)
                .collect::<Vec<_>>(),
            [MultiLineComment]
        );
        assert_eq!(kinds("#§"), [Unrecognized, Unrecognized]);
    }
}
