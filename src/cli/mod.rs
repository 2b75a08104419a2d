//! Line-oriented shell over the ledger manager.

pub mod commands;
pub mod context;
pub mod output;
mod shell;

pub use context::{CliError, CliMode, CommandError, ShellContext};
pub use shell::{run_cli, run_script, SCRIPT_ENV};
