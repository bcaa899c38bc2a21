//! Version pragma extraction.

use solint_cst::TokenKind;

use crate::latest_version;
use crate::lexer::tokenize;

/// The `pragma solidity` constraints declared by a source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionPragmas {
    /// Raw constraint text of each pragma, in source order
    /// (`"^0.8.0"`, `">=0.4.22 <0.9.0"`, ...).
    pub version_constraints: Vec<String>,
}

impl VersionPragmas {
    pub fn is_empty(&self) -> bool {
        self.version_constraints.is_empty()
    }
}

/// Collects every `pragma solidity ...;` in `text`.
///
/// Works on tokens, so pragmas inside comments or strings are ignored.
/// Never fails: text without pragmas yields an empty list, and a pragma
/// missing its `;` extends to the end of input. Trivia inside a constraint
/// collapses to a single space.
pub fn extract(text: &str) -> VersionPragmas {
    if u32::try_from(text.len()).is_err() {
        return VersionPragmas::default();
    }

    let tokens: Vec<_> = tokenize(text, latest_version())
        .into_iter()
        .filter(|token| !token.kind.is_trivia())
        .collect();
    let text_of = |index: usize| {
        tokens
            .get(index)
            .and_then(|token| token.range.slice(text))
            .unwrap_or_default()
    };

    let mut version_constraints = Vec::new();
    let mut index = 0;
    while index < tokens.len() {
        let is_version_pragma = tokens[index].kind == TokenKind::PragmaKeyword
            && tokens
                .get(index + 1)
                .is_some_and(|token| token.kind == TokenKind::Identifier)
            && text_of(index + 1) == "solidity";
        if !is_version_pragma {
            index += 1;
            continue;
        }

        let mut constraint = String::new();
        let mut previous_end = tokens[index + 1].range.end;
        index += 2;
        while let Some(token) = tokens.get(index) {
            if token.kind == TokenKind::Semicolon {
                break;
            }
            if !constraint.is_empty() && token.range.start != previous_end {
                constraint.push(' ');
            }
            constraint.push_str(text_of(index));
            previous_end = token.range.end;
            index += 1;
        }
        if !constraint.is_empty() {
            version_constraints.push(constraint);
        }
    }

    VersionPragmas { version_constraints }
}
