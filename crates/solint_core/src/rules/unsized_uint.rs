use solint_cst::{Query, QueryError, QueryMatch};

use crate::{Finding, Rule, RuleError, capture_token};

/// Flags the bare `uint` keyword, an alias of `uint256`.
#[derive(Debug)]
pub struct NoUnsizedUint {
    query: Query,
}

impl NoUnsizedUint {
    pub const ID: &'static str = "no-unsized-uint";
    pub const MESSAGE: &'static str = "Use uint256 directly.";

    const QUERY: &'static str = "@unsized_uint [UintKeyword]";
    const BINDING: &'static str = "unsized_uint";

    pub fn new() -> Result<Self, QueryError> {
        Ok(Self {
            query: Query::parse(Self::QUERY)?,
        })
    }
}

impl Rule for NoUnsizedUint {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn query(&self) -> &Query {
        &self.query
    }

    fn check(&self, found: &QueryMatch<'_>) -> Result<Option<Finding>, RuleError> {
        let token = capture_token(found, Self::ID, Self::BINDING)?;
        // Every uintN lexes as UintKeyword; only the unsized spelling is reported.
        if token.text != Some("uint") {
            return Ok(None);
        }
        Ok(Some(Finding::new(token.range, Self::MESSAGE)))
    }
}
