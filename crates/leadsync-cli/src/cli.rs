use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "leadsync")]
#[command(about = "Reconcile a CSV snapshot of leads against the local store")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the JSON config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile the snapshot found in the leads directory
    #[command(alias = "run")]
    Parse {
        /// Directory to look for the CSV snapshot in
        #[arg(long, value_name = "PATH")]
        dir: Option<PathBuf>,
        /// Directory for audit CSV files
        #[arg(long, value_name = "PATH")]
        logs_dir: Option<PathBuf>,
        /// Skip writing audit files
        #[arg(long)]
        no_logs: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List stored leads
    List {
        /// Include soft-deleted leads
        #[arg(long)]
        trashed: bool,
        /// Maximum number of leads to show
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
