use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub mod global;

pub use global::{GlobalFlags, OutputFormat};

/// Top-level CLI parser for the `grant-tracker` binary.
#[derive(Debug, Parser)]
#[command(
    name = "grant-tracker",
    version,
    about = "Track grant applications, outcomes and reminders"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format for command reports: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub const fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
        }
    }
}

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP API until interrupted.
    Serve,
    /// Create the database schema and report how many grants it holds.
    Init,
    /// Import grant records from a JSON array.
    Import(ImportArgs),
    /// Report file rows without stored bytes and stored files without rows.
    CheckFiles,
}

#[derive(Clone, Debug, Args)]
pub struct ImportArgs {
    /// Path to a JSON file containing an array of grant records.
    pub file: PathBuf,
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["grant-tracker", "--format", "raw", "--verbose", "serve"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Serve));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["grant-tracker", "check-files", "--quiet"])
            .expect("cli should parse");

        assert!(cli.quiet);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::CheckFiles));
    }

    #[test]
    fn import_takes_a_path() {
        let cli = Cli::try_parse_from(["grant-tracker", "import", "data/grants.json"])
            .expect("cli should parse");

        match cli.command {
            Commands::Import(args) => assert_eq!(args.file.to_str(), Some("data/grants.json")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn import_requires_a_path() {
        assert!(Cli::try_parse_from(["grant-tracker", "import"]).is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["grant-tracker", "-q", "-v", "init"]).is_err());
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["grant-tracker", "--format", "table", "init"]).is_err());
    }
}
