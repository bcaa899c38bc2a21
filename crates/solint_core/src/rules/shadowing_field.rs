use solint_cst::{Query, QueryError, QueryMatch};

use crate::{Finding, Rule, RuleError, capture_token};

/// Flags struct members named like the struct itself.
///
/// Names are compared case-sensitively: `struct Foo { uint foo; }` is fine.
#[derive(Debug)]
pub struct NoShadowingField {
    query: Query,
}

impl NoShadowingField {
    pub const ID: &'static str = "no-shadowing-field";
    pub const MESSAGE: &'static str =
        "Fields should have a different name than the parent struct.";

    // Both names are bound under the same StructDefinition root, so members
    // are never compared with another struct's name.
    const QUERY: &'static str = "[StructDefinition [name: @struct_name], ..., [StructMembers [StructMember [name: @field_name]]]]";

    pub fn new() -> Result<Self, QueryError> {
        Ok(Self {
            query: Query::parse(Self::QUERY)?,
        })
    }
}

impl Rule for NoShadowingField {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn query(&self) -> &Query {
        &self.query
    }

    fn check(&self, found: &QueryMatch<'_>) -> Result<Option<Finding>, RuleError> {
        let struct_name = capture_token(found, Self::ID, "struct_name")?;
        let field_name = capture_token(found, Self::ID, "field_name")?;

        if struct_name.text != field_name.text {
            return Ok(None);
        }
        Ok(Some(Finding::new(field_name.range, Self::MESSAGE)))
    }
}
