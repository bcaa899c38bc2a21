//! LSP type conversion utilities.

use tower_lsp::lsp_types::{
    Diagnostic as LspDiagnostic, DiagnosticSeverity, NumberOrString, Position as LspPosition,
    Range as LspRange,
};

use solint_core::{Diagnostic, Position, Range, Severity};

/// Converts a solint diagnostic to an LSP diagnostic.
pub fn to_lsp_diagnostic(diag: &Diagnostic) -> LspDiagnostic {
    LspDiagnostic {
        range: to_lsp_range(diag.range),
        severity: Some(to_lsp_severity(diag.severity)),
        code: Some(NumberOrString::String(diag.rule_id.clone())),
        source: Some("solint".to_string()),
        message: diag.message.clone(),
        ..Default::default()
    }
}

pub fn to_lsp_range(range: Range) -> LspRange {
    LspRange::new(to_lsp_position(range.start), to_lsp_position(range.end))
}

pub fn to_lsp_position(position: Position) -> LspPosition {
    LspPosition::new(position.line, position.character)
}

pub fn to_lsp_severity(severity: Severity) -> DiagnosticSeverity {
    match severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
        Severity::Information => DiagnosticSeverity::INFORMATION,
        Severity::Hint => DiagnosticSeverity::HINT,
    }
}
