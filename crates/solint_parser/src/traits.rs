//! Parser trait definition.

use solint_cst::CstArena;

use crate::{ParseError, ParseOutput};

/// A parser for one kind of source file.
pub trait Parser {
    /// Returns the name of this parser.
    fn name(&self) -> &str;

    /// Returns the file extensions this parser handles.
    ///
    /// Extensions should not include the leading dot (e.g., `["sol"]`).
    fn extensions(&self) -> &[&str];

    /// Parses a whole source file.
    fn parse<'a>(&self, arena: &'a CstArena, source: &str) -> Result<ParseOutput<'a>, ParseError>;

    /// Returns true if this parser can handle the given file extension.
    fn can_parse(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}
