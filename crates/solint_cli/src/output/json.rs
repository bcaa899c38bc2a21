//! JSON output formatter

use miette::{IntoDiagnostic, Result};
use solint_core::LintResult;

pub fn output_json(results: &[LintResult]) -> Result<()> {
    println!("{}", render_json(results)?);
    Ok(())
}

fn render_json(results: &[LintResult]) -> Result<String> {
    let output: Vec<_> = results
        .iter()
        .map(|r| {
            serde_json::json!({
                "path": r.path.display().to_string(),
                "version": r.version.to_string(),
                "diagnostics": r.diagnostics,
                "failedRules": r.failed_rules,
            })
        })
        .collect();
    serde_json::to_string_pretty(&output).into_diagnostic()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use solint_core::{Diagnostic, Position, Range, TextRange};

    use super::*;

    #[test]
    fn test_render_json() {
        let result = LintResult {
            path: PathBuf::from("Foo.sol"),
            version: "0.8.0".parse().unwrap(),
            diagnostics: vec![Diagnostic::new(
                "no-unsized-uint",
                "Use uint256 directly.",
                TextRange::new(13, 17),
                Range::new(Position::new(0, 13), Position::new(0, 17)),
            )],
            failed_rules: 0,
        };

        let value: serde_json::Value =
            serde_json::from_str(&render_json(&[result]).unwrap()).unwrap();
        assert_eq!(value[0]["path"], "Foo.sol");
        assert_eq!(value[0]["version"], "0.8.0");
        assert_eq!(value[0]["diagnostics"][0]["rule_id"], "no-unsized-uint");
        assert_eq!(value[0]["diagnostics"][0]["severity"], "warning");
        assert_eq!(value[0]["failedRules"], 0);
    }
}
