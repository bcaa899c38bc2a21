//! Version-bound grammar.

use semver::Version;
use solint_cst::{CstArena, CstNode, Cursor, RuleKind};

use crate::grammar::Grammar;
use crate::lexer::tokenize;
use crate::{ParseError, Parser, SyntaxError, is_supported, latest_version};

/// The result of one parse: a complete tree plus the problems found.
#[derive(Debug, Clone)]
pub struct ParseOutput<'a> {
    root: &'a CstNode<'a>,
    errors: Vec<SyntaxError>,
}

impl<'a> ParseOutput<'a> {
    /// Root of the tree. Always present, even for invalid input.
    pub fn tree(&self) -> &'a CstNode<'a> {
        self.root
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// A cursor positioned at the root.
    pub fn create_cursor(&self) -> Cursor<'a> {
        Cursor::new(self.root)
    }
}

/// A Solidity grammar for one compiler version.
///
/// Languages are stateless; one instance can parse any number of texts,
/// from any number of threads.
///
/// # Example
///
/// ```rust
/// use semver::Version;
/// use solint_cst::{CstArena, RuleKind};
/// use solint_parser::Language;
///
/// let language = Language::new(Version::new(0, 8, 19)).unwrap();
/// let arena = CstArena::new();
/// let output = language
///     .parse(&arena, RuleKind::SourceUnit, "struct Foo { uint256 bar; }")
///     .unwrap();
///
/// assert!(output.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    version: Version,
}

impl Language {
    /// Rules [`Language::parse`] can start from.
    pub const ENTRY_RULES: &'static [RuleKind] = &[
        RuleKind::SourceUnit,
        RuleKind::ContractDefinition,
        RuleKind::StructDefinition,
        RuleKind::TypeName,
        RuleKind::Block,
    ];

    pub fn new(version: Version) -> Result<Self, ParseError> {
        if !is_supported(&version) {
            return Err(ParseError::UnsupportedVersion(version));
        }
        Ok(Self { version })
    }

    /// The grammar of the newest supported version.
    pub fn latest() -> Self {
        Self {
            version: latest_version().clone(),
        }
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Parses all of `text` as `entry`.
    pub fn parse<'a>(
        &self,
        arena: &'a CstArena,
        entry: RuleKind,
        text: &str,
    ) -> Result<ParseOutput<'a>, ParseError> {
        if !Self::ENTRY_RULES.contains(&entry) {
            return Err(ParseError::UnsupportedEntryRule(entry));
        }
        if u32::try_from(text.len()).is_err() {
            return Err(ParseError::SourceTooLarge { len: text.len() });
        }

        let tokens = tokenize(text, &self.version);
        let (root, errors) = Grammar::new(arena, text, tokens, &self.version).parse(entry)?;
        Ok(ParseOutput { root, errors })
    }
}

impl Parser for Language {
    fn name(&self) -> &str {
        "solidity"
    }

    fn extensions(&self) -> &[&str] {
        &["sol"]
    }

    fn parse<'a>(&self, arena: &'a CstArena, source: &str) -> Result<ParseOutput<'a>, ParseError> {
        Language::parse(self, arena, RuleKind::SourceUnit, source)
    }
}
