//! Command-line interface for roster.
//!
//! This module provides the CLI structure, argument types and output
//! rendering for the `roster` binary.

mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, DeleteCommand, EditCommand, ListCommand, OutputFormat,
    SearchCommand, StatusCommand,
};

/// roster - Keep a register of student records
///
/// Register, list, search, edit and delete student records stored in a local
/// database.
#[derive(Debug, Parser)]
#[command(name = "roster")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the records database (overrides configuration)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a new student
    Add(AddCommand),

    /// List all student records
    List(ListCommand),

    /// Search records by any field
    Search(SearchCommand),

    /// Edit a student record
    Edit(EditCommand),

    /// Delete a student record
    Delete(DeleteCommand),

    /// Show storage status
    Status(StatusCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "roster");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        use crate::logging::Verbosity;

        assert_eq!(parse(&["roster", "-q", "list"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["roster", "list"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["roster", "-v", "list"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["roster", "-vv", "list"]).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_add() {
        let cli = parse(&[
            "roster",
            "add",
            "--name",
            "Ann Lee",
            "--id",
            "12345",
            "--email",
            "a@b.com",
            "--contact",
            "1234567890",
        ]);
        let Command::Add(cmd) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(cmd.name, "Ann Lee");
        assert_eq!(cmd.contact, "1234567890");
    }

    #[test]
    fn test_parse_add_missing_fields_default_empty() {
        let cli = parse(&["roster", "add", "-n", "Ann Lee"]);
        let Command::Add(cmd) = cli.command else {
            panic!("expected add");
        };
        assert!(cmd.id.is_empty());
        assert!(cmd.email.is_empty());
    }

    #[test]
    fn test_parse_list_format() {
        let cli = parse(&["roster", "list", "--format", "json"]);
        assert!(matches!(
            cli.command,
            Command::List(ListCommand {
                format: OutputFormat::Json
            })
        ));
    }

    #[test]
    fn test_parse_search() {
        let cli = parse(&["roster", "search", "lee"]);
        let Command::Search(cmd) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(cmd.query, "lee");
        assert_eq!(cmd.format, OutputFormat::Table);
    }

    #[test]
    fn test_parse_edit() {
        let cli = parse(&["roster", "edit", "2", "--email", "x@y.org"]);
        let Command::Edit(cmd) = cli.command else {
            panic!("expected edit");
        };
        assert_eq!(cmd.position, 2);
        assert_eq!(cmd.email.as_deref(), Some("x@y.org"));
        assert!(cmd.name.is_none());
    }

    #[test]
    fn test_parse_delete() {
        let cli = parse(&["roster", "delete", "3", "--yes"]);
        let Command::Delete(cmd) = cli.command else {
            panic!("expected delete");
        };
        assert_eq!(cmd.position, 3);
        assert!(cmd.yes);
    }

    #[test]
    fn test_position_zero_is_rejected() {
        assert!(Cli::try_parse_from(["roster", "delete", "0"]).is_err());
        assert!(Cli::try_parse_from(["roster", "edit", "0"]).is_err());
    }

    #[test]
    fn test_parse_with_config_and_database() {
        let cli = parse(&[
            "roster",
            "-c",
            "/custom/config.toml",
            "--database",
            "/tmp/r.db",
            "status",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/r.db")));
        assert!(matches!(cli.command, Command::Status(_)));
    }

    #[test]
    fn test_parse_config_show() {
        let cli = parse(&["roster", "config", "show", "--json"]);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Show { json: true })
        ));
    }
}
