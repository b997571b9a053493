//! CLI module for formkit
//!
//! Provides command-line interface for:
//! - init: Create the data directory and an empty collection
//! - list / show / import / delete: Manage stored forms
//! - preview: Evaluate a data record against a form
//! - submit: Evaluate a data record, failing on any error

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{delete, import, init, list, preview, run, run_command, show, submit};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_json, write_error, write_response};
