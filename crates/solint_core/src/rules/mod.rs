//! Built-in rules.

mod shadowing_field;
mod unsized_uint;

use std::sync::Arc;

use solint_cst::QueryError;

pub use shadowing_field::NoShadowingField;
pub use unsized_uint::NoUnsizedUint;

use crate::RuleSet;

/// Every built-in rule, at its default severity.
pub fn builtin_rules() -> Result<RuleSet, QueryError> {
    Ok(RuleSet::new()
        .with(Arc::new(NoUnsizedUint::new()?))
        .with(Arc::new(NoShadowingField::new()?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_rule_order() {
        let rules = builtin_rules().unwrap();
        assert_eq!(rules.ids(), [NoUnsizedUint::ID, NoShadowingField::ID]);
    }
}
