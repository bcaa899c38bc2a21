//! Text output formatter

use std::fmt::Write;

use solint_core::{LintResult, Severity};

pub fn output_text(results: &[LintResult]) {
    print!("{}", render_text(results));
}

fn render_text(results: &[LintResult]) -> String {
    let mut out = String::new();

    for result in results {
        if result.diagnostics.is_empty() && result.failed_rules == 0 {
            continue;
        }

        let _ = writeln!(out, "\n{}:", result.path.display());
        for diag in &result.diagnostics {
            // Editor positions are zero-based; terminals expect one-based.
            let _ = writeln!(
                out,
                "  {}:{} {} [{}]: {}",
                diag.range.start.line + 1,
                diag.range.start.character + 1,
                diag.severity,
                diag.rule_id,
                diag.message
            );
        }
        if result.failed_rules > 0 {
            let _ = writeln!(out, "  {} rule(s) failed on this file", result.failed_rules);
        }
    }

    let total_files = results.len();
    let total_issues: usize = results.iter().map(|r| r.diagnostics.len()).sum();
    let errors: usize = results.iter().map(|r| r.count(Severity::Error)).sum();

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Checked {} files, found {} issues ({} errors)",
        total_files, total_issues, errors
    );
    out
}
