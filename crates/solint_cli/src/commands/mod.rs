//! Subcommand implementations

mod lint;
mod lsp;

pub use lint::run_lint;
pub use lsp::run_lsp;
