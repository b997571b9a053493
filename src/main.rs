//! formkit CLI entry point
//!
//! Parses arguments, dispatches to the CLI module, prints errors to stderr
//! and exits with non-zero on failure. All logic lives in `cli`.

use formkit::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
