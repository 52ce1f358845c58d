//! `roster` - CLI for the student record manager
//!
//! Each invocation opens the records database, runs one command and exits.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use roster::cli::output::{render_details, render_errors, render_records};
use roster::cli::{
    AddCommand, Cli, Command, ConfigCommand, DeleteCommand, EditCommand, SearchCommand,
};
use roster::{
    init_logging, Backend, Config, Error, RecordStore, Registry, SqliteBackend, SubmitOutcome,
    Validator,
};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let mut config = Config::load_from(cli.config.clone())?;
    if let Some(database) = cli.database.clone() {
        config.storage.database_path = Some(database);
    }

    match cli.command {
        Command::Add(cmd) => handle_add(&config, &cmd),
        Command::List(cmd) => {
            let registry = open_registry(&config)?;
            if registry.records().is_empty() {
                println!("No student records yet.");
            } else {
                print!("{}", render_records(&registry.search(""), cmd.format)?);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Search(cmd) => handle_search(&config, &cmd),
        Command::Edit(cmd) => handle_edit(&config, &cmd),
        Command::Delete(cmd) => handle_delete(&config, &cmd),
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_registry(config: &Config) -> anyhow::Result<Registry<SqliteBackend>> {
    let path = config.database_path();
    let backend = SqliteBackend::open(&path)
        .with_context(|| format!("could not open records database {}", path.display()))?;
    let store = RecordStore::open_with_key(backend, config.storage.key.as_str());
    let validator = Validator::new(config.validation.id_policy)?;
    Ok(Registry::new(store, validator))
}

/// Convert a 1-based position from the command line to a collection index.
fn index_from_position(position: usize) -> usize {
    position.saturating_sub(1)
}

/// Report a bad position in the user's 1-based terms.
fn explain_position(err: Error, position: usize) -> anyhow::Error {
    match err {
        Error::IndexOutOfRange { len, .. } => {
            anyhow::anyhow!("no record at position {position} (there are {len} records)")
        }
        other => other.into(),
    }
}

fn report_outcome(outcome: &SubmitOutcome) -> ExitCode {
    match outcome {
        SubmitOutcome::Registered { index } => {
            println!("Student registered successfully (No. {})", index + 1);
            ExitCode::SUCCESS
        }
        SubmitOutcome::Updated { index } => {
            println!("Student record updated successfully (No. {})", index + 1);
            ExitCode::SUCCESS
        }
        SubmitOutcome::Rejected(errors) => {
            eprintln!("Student record not saved:");
            eprint!("{}", render_errors(errors));
            ExitCode::FAILURE
        }
    }
}

fn handle_add(config: &Config, cmd: &AddCommand) -> anyhow::Result<ExitCode> {
    let mut registry = open_registry(config)?;
    let outcome = registry.submit(&cmd.candidate())?;
    Ok(report_outcome(&outcome))
}

fn handle_search(config: &Config, cmd: &SearchCommand) -> anyhow::Result<ExitCode> {
    let registry = open_registry(config)?;
    if registry.records().is_empty() {
        println!("No student records yet.");
        return Ok(ExitCode::SUCCESS);
    }

    let hits = registry.search(&cmd.query);
    if hits.is_empty() {
        println!("No matching records.");
    } else {
        print!("{}", render_records(&hits, cmd.format)?);
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_edit(config: &Config, cmd: &EditCommand) -> anyhow::Result<ExitCode> {
    let mut registry = open_registry(config)?;
    let prefill = registry
        .begin_edit(index_from_position(cmd.position))
        .map_err(|e| explain_position(e, cmd.position))?
        .clone();

    if !cmd.has_changes() {
        print!("{}", render_details(&prefill));
        println!("Nothing to change. Pass --name, --id, --email or --contact.");
        registry.cancel_edit();
        return Ok(ExitCode::SUCCESS);
    }

    let outcome = registry.submit(&cmd.apply(&prefill))?;
    Ok(report_outcome(&outcome))
}

fn handle_delete(config: &Config, cmd: &DeleteCommand) -> anyhow::Result<ExitCode> {
    let mut registry = open_registry(config)?;
    let record = registry
        .request_delete(index_from_position(cmd.position))
        .map_err(|e| explain_position(e, cmd.position))?;
    print!("{}", render_details(record));

    if !cmd.yes {
        println!("This will permanently delete the record above.");
        println!("Use --yes to confirm.");
        registry.cancel_delete();
        return Ok(ExitCode::SUCCESS);
    }

    registry.confirm_delete()?;
    println!("Successfully deleted.");
    Ok(ExitCode::SUCCESS)
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<ExitCode> {
    let registry = open_registry(config)?;
    let store = registry.store();
    let last_saved = store.backend().last_written(store.key())?;
    let policy = registry.validator().id_policy();

    if json {
        let status = serde_json::json!({
            "records": store.len(),
            "database_path": store.backend().location(),
            "database_size_bytes": store.backend().size_bytes(),
            "storage_key": store.key(),
            "last_saved": last_saved.map(|t| t.to_rfc3339()),
            "id_policy": policy,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("roster status");
        println!("-------------");
        println!("Records:       {}", store.len());
        println!("Database:      {}", store.backend().location());
        println!("Size:          {} bytes", store.backend().size_bytes());
        println!("Storage key:   {}", store.key());
        match last_saved {
            Some(at) => println!("Last saved:    {}", at.to_rfc3339()),
            None => println!("Last saved:    never"),
        }
        println!("ID policy:     {}", policy.describe());
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<ExitCode> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Key:                {}", config.storage.key);
                println!();
                println!("[Validation]");
                println!(
                    "  ID policy:          {}",
                    config.validation.id_policy.describe()
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => {
                    println!("Configuration error: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
