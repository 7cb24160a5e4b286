//! leadsync CLI - Reconcile lead snapshots from the command line
//!
//! Picks up the CSV dropped into the leads directory, applies it to the local
//! store and writes one audit file per outcome category.

mod cli;
mod commands;
mod config;
mod error;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::list::run_list;
use crate::commands::parse::run_parse;
use crate::config::{LeadsyncConfig, PathOverrides};
use crate::error::CliError;

fn main() {
    if let Err(error) = run() {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("leadsync=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = LeadsyncConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Parse {
            dir,
            logs_dir,
            no_logs,
            json,
        } => {
            let paths = config.resolve(PathOverrides {
                leads_dir: dir,
                logs_dir,
                db_path: cli.db_path,
            });
            let logs_dir = (!no_logs).then_some(paths.logs_dir.as_path());
            run_parse(&paths.leads_dir, logs_dir, &paths.db_path, json)?;
        }
        Commands::List {
            trashed,
            limit,
            json,
        } => {
            let paths = config.resolve(PathOverrides {
                db_path: cli.db_path,
                ..PathOverrides::default()
            });
            run_list(limit, trashed, json, &paths.db_path)?;
        }
    }

    Ok(())
}
