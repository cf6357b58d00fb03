//! CLI module for filedrop
//!
//! - serve: run the HTTP file service
//! - shell: interactive client for a running service

mod args;
mod client;
mod commands;
mod errors;
mod shell;

pub use args::{Cli, Command};
pub use client::{ApiClient, FileApi};
pub use commands::{run, run_command, serve, shell};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use shell::{Shell, ShellCommand};
