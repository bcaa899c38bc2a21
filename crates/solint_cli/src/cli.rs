//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// solint - Solidity linter
#[derive(Parser)]
#[command(name = "solint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lint files
    Lint {
        /// Files, directories or glob patterns to lint
        #[arg(required = true)]
        patterns: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Start the LSP server on stdio
    Lsp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lint_defaults_to_text() {
        let cli = Cli::try_parse_from(["solint", "lint", "src"]).unwrap();
        match cli.command {
            Commands::Lint { patterns, format } => {
                assert_eq!(patterns, vec!["src".to_string()]);
                assert_eq!(format, OutputFormat::Text);
            }
            Commands::Lsp => panic!("expected lint"),
        }
        assert!(cli.config.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "solint",
            "lint",
            "--format",
            "json",
            "a.sol",
            "--config",
            "custom.json",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.json")));
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Lint {
                format: OutputFormat::Json,
                ..
            }
        ));
    }

    #[test]
    fn test_lint_requires_patterns() {
        assert!(Cli::try_parse_from(["solint", "lint"]).is_err());
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["solint", "lint", "a.sol", "--format", "sarif"]).is_err());
    }
}
