//! CLI argument definitions using clap
//!
//! Commands:
//! - formkit init --config <path>
//! - formkit list --config <path>
//! - formkit show <id> --config <path>
//! - formkit import <file> --config <path>
//! - formkit delete <id> --config <path>
//! - formkit preview <id> --data <file> --config <path>
//! - formkit submit <id> --data <file> --config <path>

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = "./formkit.json";

/// formkit - form schemas with validation and derived fields
#[derive(Parser, Debug)]
#[command(name = "formkit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the data directory and an empty schema collection
    Init {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// List stored forms
    List {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// Print one stored form
    Show {
        /// Form id
        id: String,
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// Validate a form schema file and store it, replacing any form with the same id
    Import {
        /// Schema JSON file
        file: PathBuf,
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// Delete a stored form
    Delete {
        /// Form id
        id: String,
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// Show errors and derived values for a data record
    Preview {
        /// Form id
        id: String,
        /// Data record JSON file, or `-` for stdin
        #[arg(long)]
        data: PathBuf,
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// Submit a data record; fails if any field is invalid
    Submit {
        /// Form id
        id: String,
        /// Data record JSON file, or `-` for stdin
        #[arg(long)]
        data: PathBuf,
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },
}

impl Command {
    /// Configuration file for this invocation
    pub fn config_path(&self) -> &Path {
        match self {
            Command::Init { config }
            | Command::List { config }
            | Command::Show { config, .. }
            | Command::Import { config, .. }
            | Command::Delete { config, .. }
            | Command::Preview { config, .. }
            | Command::Submit { config, .. } => config,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
